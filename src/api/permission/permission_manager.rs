use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::{Mapping, Value};

use crate::api::command_source::CommandSource;
use crate::config::{Config, DebugOptions};
use crate::core::error::{PermissionError, PermissionResult, RegistryResult, StorageError, StorageResult};
use crate::core::{LevelRef, PermissionLevel};
use crate::storage::yaml_storage::YamlDataStorage;
use crate::utils::translation::{BuiltinTranslator, Translator};

/// 权限文件的默认文件名
pub const PERMISSION_FILE: &str = "permission.yml";

/// 内置的默认权限数据，权限文件缺失或缺少键时使用
pub const DEFAULT_PERMISSION_RESOURCE: &str =
    include_str!("../../../resources/default_permission.yml");

/// 存放默认等级的键
pub const DEFAULT_LEVEL_KEY: &str = "default_level";

const LOG_TARGET: &str = "perm_registry::permission";

/// 权限管理器
///
/// 职责：
/// 1. 维护权限等级 -> 玩家列表的映射，并与权限文件保持同步
/// 2. 查询玩家的有效权限等级（同时属于多个等级时取最高）
/// 3. 添加、移除、修改玩家的权限等级
///
/// 注意：本结构不做任何同步，所有修改操作都需要 `&mut self`，
/// 多线程场景请使用 [`PermissionChecker`](super::PermissionChecker)
pub struct PermissionManager {
    storage: YamlDataStorage,
    /// 默认等级名称，保存文件中的原始值，使用时才校验
    default_level: String,
    /// 等级 -> 玩家列表，文件中为 null 的等级不在表中
    groups: HashMap<PermissionLevel, Vec<String>>,
    /// 文件中与权限无关的其他键，原样写回
    extra: Mapping,
    translator: Arc<dyn Translator>,
    debug: DebugOptions,
}

impl PermissionManager {
    /// 创建权限管理器，此时尚未读取权限文件
    pub fn new(
        file_path: impl Into<PathBuf>,
        translator: Arc<dyn Translator>,
        debug: DebugOptions,
    ) -> Self {
        Self {
            storage: YamlDataStorage::new(file_path, DEFAULT_PERMISSION_RESOURCE),
            default_level: PermissionLevel::User.name().to_string(),
            groups: HashMap::new(),
            extra: Mapping::new(),
            translator,
            debug,
        }
    }

    /// 创建权限管理器并立即读取权限文件
    pub fn open(
        file_path: impl Into<PathBuf>,
        translator: Arc<dyn Translator>,
        debug: DebugOptions,
        allowed_missing_file: bool,
    ) -> RegistryResult<Self> {
        let mut manager = Self::new(file_path, translator, debug);
        manager.load_permission_file(allowed_missing_file)?;
        Ok(manager)
    }

    /// 按应用配置创建并读取权限文件
    pub fn from_config(config: &Config) -> RegistryResult<Self> {
        Self::open(
            config.permission_file(),
            Arc::new(BuiltinTranslator::from_code(&config.language)),
            config.debug,
            config.permission.allow_missing_file,
        )
    }

    pub fn permission_file_path(&self) -> &Path {
        self.storage.file_path()
    }

    // ==================== 文件读写 ====================

    /// 读取权限文件
    ///
    /// 文件缺失且 `allowed_missing_file` 为 true 时使用内置默认数据并写出文件。
    /// 解析失败时内存中的数据保持不变
    pub fn load_permission_file(&mut self, allowed_missing_file: bool) -> RegistryResult<()> {
        let loaded = self.storage.load_data(allowed_missing_file)?;
        for key in &loaded.fixed_keys {
            log::warn!(
                target: LOG_TARGET,
                "{}",
                self.translator.tr("permission_manager.load.missing_key", &[key.as_str()])
            );
        }

        let (default_level, groups, extra) = parse_permission_data(loaded.data.clone())?;
        if PermissionLevel::get_level(default_level.as_str()).is_none() {
            log::warn!(target: LOG_TARGET, "权限文件中的默认等级 {} 无效", default_level);
        }
        self.default_level = default_level;
        self.groups = groups;
        self.extra = extra;

        if loaded.needs_save() {
            self.save()?;
        }
        log::info!(target: LOG_TARGET, "{}", self.translator.tr("permission_manager.load.done", &[]));
        Ok(())
    }

    /// 重新读取权限文件，允许文件缺失
    pub fn reload_permission_file(&mut self) -> RegistryResult<()> {
        self.load_permission_file(true)
    }

    /// 将当前数据整体写回权限文件
    pub fn save(&self) -> StorageResult<()> {
        self.storage.save(&self.to_mapping(), pre_save)
    }

    /// 转换为写入文件的映射：默认等级在前，各等级从高到低，其余键在后
    fn to_mapping(&self) -> Mapping {
        let mut data = Mapping::new();
        data.insert(
            Value::String(DEFAULT_LEVEL_KEY.to_string()),
            Value::String(self.default_level.clone()),
        );
        for level in PermissionLevel::descending() {
            let value = match self.groups.get(&level) {
                Some(group) => Value::Sequence(group.iter().cloned().map(Value::String).collect()),
                None => Value::Null,
            };
            data.insert(Value::String(level.name().to_string()), value);
        }
        for (key, value) in &self.extra {
            data.insert(key.clone(), value.clone());
        }
        data
    }

    // ==================== 默认等级 ====================

    /// 获取默认权限等级名称
    pub fn get_default_level(&self) -> &str {
        &self.default_level
    }

    /// 设置默认权限等级并写回文件
    pub fn set_default_level<'a>(&mut self, level: impl Into<LevelRef<'a>>) -> RegistryResult<()> {
        let level = PermissionLevel::from_value(level)?;
        self.default_level = level.name().to_string();
        self.save()?;
        log::info!(
            target: LOG_TARGET,
            "{}",
            self.translator
                .tr("permission_manager.set_default_permission_level.done", &[level.name()])
        );
        Ok(())
    }

    // ==================== 权限组 ====================

    /// 获取指定等级的玩家列表，列表不存在时创建空列表
    ///
    /// 返回的可变引用可直接修改，修改后需调用 [`PermissionManager::save`] 写回
    pub fn get_group<'a>(
        &mut self,
        level: impl Into<LevelRef<'a>>,
    ) -> PermissionResult<&mut Vec<String>> {
        let level = PermissionLevel::from_value(level)?;
        Ok(self.groups.entry(level).or_default())
    }

    /// 指定等级的玩家列表（只读）
    pub fn get_members<'a>(&self, level: impl Into<LevelRef<'a>>) -> PermissionResult<&[String]> {
        let level = PermissionLevel::from_value(level)?;
        Ok(self.groups.get(&level).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// 所有等级中出现过的玩家
    pub fn list_all_members(&self) -> BTreeSet<String> {
        self.groups.values().flatten().cloned().collect()
    }

    // ==================== 玩家管理 ====================

    /// 以指定等级添加玩家并写回文件，未指定等级时使用默认等级
    ///
    /// 不检查玩家是否已在其他等级中
    pub fn add_member(&mut self, player: &str, level_name: Option<&str>) -> RegistryResult<PermissionLevel> {
        let level = match level_name {
            Some(name) => PermissionLevel::from_value(name)?,
            None => PermissionLevel::from_value(self.default_level.as_str())?,
        };
        self.groups.entry(level).or_default().push(player.to_string());
        self.debug_log(format_args!("Added player {} with permission level {}", player, level));
        self.save()?;
        Ok(level)
    }

    /// 从所有等级中移除玩家并写回文件
    ///
    /// 玩家可能同时属于多个等级，需要循环直到任何等级都不包含该玩家
    pub fn remove_member(&mut self, player: &str) -> RegistryResult<()> {
        while let Some(level) = self.find_player_level(player) {
            if let Some(group) = self.groups.get_mut(&level) {
                group.retain(|member| member != player);
            }
        }
        self.debug_log(format_args!("Removed player {}", player));
        self.save()?;
        Ok(())
    }

    /// 修改玩家的权限等级：先移除再以新等级添加
    pub fn set_level<'a>(&mut self, player: &str, new_level: impl Into<LevelRef<'a>>) -> RegistryResult<()> {
        // 等级无效时不修改数据
        let new_level = PermissionLevel::from_value(new_level)?;
        self.remove_member(player)?;
        self.add_member(player, Some(new_level.name()))?;
        log::info!(
            target: LOG_TARGET,
            "{}",
            self.translator
                .tr("permission_manager.set_permission_level.done", &[player, new_level.name()])
        );
        Ok(())
    }

    /// 确保玩家拥有权限等级，不存在时以默认等级添加
    pub fn touch_member(&mut self, player: &str) -> RegistryResult<()> {
        self.get_player_level(player, true)?;
        Ok(())
    }

    // ==================== 权限查询 ====================

    /// 查询玩家的权限等级
    ///
    /// 从高到低扫描，返回第一个包含该玩家的等级。玩家不存在时，
    /// `auto_add` 为 true 则以默认等级添加并返回该等级，否则返回 None 且不修改数据
    pub fn get_player_level(&mut self, player: &str, auto_add: bool) -> RegistryResult<Option<PermissionLevel>> {
        if let Some(level) = self.find_player_level(player) {
            return Ok(Some(level));
        }
        if auto_add {
            self.add_member(player, None).map(Some)
        } else {
            Ok(None)
        }
    }

    /// 查询命令源的权限等级
    ///
    /// 控制台固定为 [`PermissionLevel::CONSOLE_LEVEL`]，玩家按玩家名查询（不存在时自动添加），
    /// 其他命令源返回 [`PermissionError::UnsupportedSource`]
    pub fn get_permission(&mut self, source: &CommandSource) -> RegistryResult<PermissionLevel> {
        match source {
            CommandSource::Console => Ok(PermissionLevel::CONSOLE_LEVEL),
            CommandSource::Player { name } => match self.get_player_level(name, true)? {
                Some(level) => Ok(level),
                None => self.add_member(name, None),
            },
            CommandSource::Plugin { .. } => Err(PermissionError::UnsupportedSource(format!(
                "Unknown type {} in get_permission",
                source.kind()
            ))
            .into()),
        }
    }

    /// 不修改数据的查询，从高到低扫描
    fn find_player_level(&self, player: &str) -> Option<PermissionLevel> {
        PermissionLevel::descending().find(|level| {
            self.groups
                .get(level)
                .map_or(false, |group| group.iter().any(|member| member == player))
        })
    }

    fn debug_log(&self, args: std::fmt::Arguments<'_>) {
        if self.debug.permission_enabled() {
            log::debug!(target: LOG_TARGET, "{}", args);
        }
    }
}

/// 写入前的整理
///
/// 1. 各等级的玩家列表去重，保留首次出现的顺序
/// 2. 空列表替换为 null，让文件更整洁
pub fn pre_save(data: &mut Mapping) {
    for name in PermissionLevel::NAMES {
        if let Some(Value::Sequence(group)) = data.get_mut(name) {
            unique_list(group);
        }
    }
    for name in PermissionLevel::NAMES {
        if let Some(value) = data.get_mut(name) {
            if matches!(value, Value::Sequence(group) if group.is_empty()) {
                *value = Value::Null;
            }
        }
    }
}

/// 原地去重，保留首次出现的顺序
fn unique_list<T: Eq + Hash + Clone>(items: &mut Vec<T>) {
    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|item| seen.insert(item.clone()));
}

type PermissionData = (String, HashMap<PermissionLevel, Vec<String>>, Mapping);

/// 从文件映射中解析默认等级、各等级玩家列表和其余键
fn parse_permission_data(data: Mapping) -> StorageResult<PermissionData> {
    let mut default_level = None;
    let mut groups = HashMap::new();
    let mut extra = Mapping::new();

    for (key, value) in data {
        let name = match key.as_str() {
            Some(name) => name.to_string(),
            None => {
                extra.insert(key, value);
                continue;
            }
        };

        if name == DEFAULT_LEVEL_KEY {
            match value {
                Value::String(level) => default_level = Some(level),
                // 未加引号的等级值
                Value::Number(rank) => default_level = Some(rank.to_string()),
                other => {
                    return Err(StorageError::InvalidData(format!(
                        "{} 应为字符串，实际为 {:?}",
                        DEFAULT_LEVEL_KEY, other
                    )))
                }
            }
        } else if let Some(level) = PermissionLevel::NAMES
            .iter()
            .position(|n| *n == name.as_str())
            .map(|i| PermissionLevel::ALL[i])
        {
            match value {
                Value::Null => {}
                Value::Sequence(items) => {
                    let members = items
                        .into_iter()
                        .map(|item| member_name(level, item))
                        .collect::<StorageResult<Vec<_>>>()?;
                    groups.insert(level, members);
                }
                other => {
                    return Err(StorageError::InvalidData(format!(
                        "权限等级 {} 应为列表或空，实际为 {:?}",
                        level, other
                    )))
                }
            }
        } else {
            extra.insert(key, value);
        }
    }

    let default_level = default_level
        .ok_or_else(|| StorageError::InvalidData(format!("缺少 {}", DEFAULT_LEVEL_KEY)))?;
    Ok((default_level, groups, extra))
}

/// 玩家名允许写成数字，统一转为字符串
fn member_name(level: PermissionLevel, item: Value) -> StorageResult<String> {
    match item {
        Value::String(name) => Ok(name),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(StorageError::InvalidData(format!(
            "权限等级 {} 中包含无效的玩家名: {:?}",
            level, other
        ))),
    }
}
