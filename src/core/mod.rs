pub mod error;
pub mod permission;

// 错误和结果类型
pub use error::{
    ErrorCode, PermissionError, PermissionResult, RegistryError, RegistryResult, StorageError,
    StorageResult, ToPublicError,
};

// 权限等级
pub use permission::{LevelRef, PermissionLevel};
