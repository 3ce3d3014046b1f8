//! 权限管理模块
//!
//! 提供权限等级的持久化、查询与检查功能

pub mod permission_checker;
pub mod permission_manager;

pub use crate::core::{LevelRef, PermissionLevel};

pub use permission_checker::PermissionChecker;
pub use permission_manager::{pre_save, PermissionManager, DEFAULT_PERMISSION_RESOURCE, PERMISSION_FILE};
