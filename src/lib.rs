//! perm-registry - 服务器管理工具的权限等级注册表
//!
//! 以 YAML 文件保存各权限等级下的玩家列表，提供玩家权限等级的查询、
//! 添加、移除与修改

pub mod api;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

pub use api::{CommandSource, PermissionChecker, PermissionManager};
pub use crate::core::{LevelRef, PermissionLevel, RegistryError, RegistryResult};
