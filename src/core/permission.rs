//! 权限等级定义
//!
//! 提供固定的5级权限模型以及等级引用的解析

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::{PermissionError, PermissionResult};

/// 5级权限模型，按等级值从低到高排列
/// - Guest: 访客，没有任何特殊权限
/// - User: 普通用户
/// - Helper: 协助管理的用户
/// - Admin: 管理员
/// - Owner: 服务器所有者，同时也是控制台使用的等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionLevel {
    Guest = 0,
    User = 1,
    Helper = 2,
    Admin = 3,
    Owner = 4,
}

/// 等级引用
///
/// 所有接受权限等级的操作都可以传入名称、等级值或等级本身，
/// 统一通过 [`PermissionLevel::from_value`] 解析
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRef<'a> {
    Name(&'a str),
    Rank(i64),
    Level(PermissionLevel),
}

impl PermissionLevel {
    /// 所有等级，从低到高
    pub const ALL: [PermissionLevel; 5] = [
        PermissionLevel::Guest,
        PermissionLevel::User,
        PermissionLevel::Helper,
        PermissionLevel::Admin,
        PermissionLevel::Owner,
    ];

    /// 所有等级名称，顺序与 [`PermissionLevel::ALL`] 一致
    pub const NAMES: [&'static str; 5] = ["guest", "user", "helper", "admin", "owner"];

    pub const MINIMUM_LEVEL: PermissionLevel = PermissionLevel::Guest;
    pub const MAXIMUM_LEVEL: PermissionLevel = PermissionLevel::Owner;

    /// 控制台拥有的等级，固定为最高等级
    pub const CONSOLE_LEVEL: PermissionLevel = Self::MAXIMUM_LEVEL;

    /// 插件注册命令时默认要求的等级
    pub const PLUGIN_DEFAULT_PERMISSION: PermissionLevel = PermissionLevel::User;

    /// 等级值
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// 等级名称（小写）
    pub fn name(&self) -> &'static str {
        Self::NAMES[self.level() as usize]
    }

    /// 从等级值解析，超出范围返回 None
    pub fn from_rank(rank: i64) -> Option<Self> {
        if rank < Self::MINIMUM_LEVEL.level() as i64 || rank > Self::MAXIMUM_LEVEL.level() as i64 {
            return None;
        }
        Some(Self::ALL[rank as usize])
    }

    /// 从名称解析，忽略大小写
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|level| level.name() == lowered)
    }

    /// 解析等级引用
    ///
    /// 名称优先按等级名匹配，匹配失败时尝试按整数等级值解析
    pub fn from_value<'a>(value: impl Into<LevelRef<'a>>) -> PermissionResult<Self> {
        let value = value.into();
        let resolved = match value {
            LevelRef::Level(level) => Some(level),
            LevelRef::Rank(rank) => Self::from_rank(rank),
            LevelRef::Name(name) => Self::from_name(name)
                .or_else(|| name.trim().parse::<i64>().ok().and_then(Self::from_rank)),
        };
        resolved.ok_or_else(|| PermissionError::InvalidLevel(value.to_string()))
    }

    /// 与 [`PermissionLevel::from_value`] 相同，解析失败时返回 None
    pub fn get_level<'a>(value: impl Into<LevelRef<'a>>) -> Option<Self> {
        Self::from_value(value).ok()
    }

    /// 所有等级，从高到低
    pub fn descending() -> impl Iterator<Item = PermissionLevel> {
        Self::ALL.into_iter().rev()
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for PermissionLevel {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(s)
    }
}

impl Serialize for PermissionLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PermissionLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_value(name.as_str()).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for LevelRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelRef::Name(name) => write!(f, "{}", name),
            LevelRef::Rank(rank) => write!(f, "{}", rank),
            LevelRef::Level(level) => write!(f, "{}", level),
        }
    }
}

impl<'a> From<&'a str> for LevelRef<'a> {
    fn from(value: &'a str) -> Self {
        LevelRef::Name(value)
    }
}

impl<'a> From<&'a String> for LevelRef<'a> {
    fn from(value: &'a String) -> Self {
        LevelRef::Name(value.as_str())
    }
}

impl From<i64> for LevelRef<'_> {
    fn from(value: i64) -> Self {
        LevelRef::Rank(value)
    }
}

impl From<i32> for LevelRef<'_> {
    fn from(value: i32) -> Self {
        LevelRef::Rank(value as i64)
    }
}

impl From<u8> for LevelRef<'_> {
    fn from(value: u8) -> Self {
        LevelRef::Rank(value as i64)
    }
}

impl From<PermissionLevel> for LevelRef<'_> {
    fn from(value: PermissionLevel) -> Self {
        LevelRef::Level(value)
    }
}
