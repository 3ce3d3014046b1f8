//! 统一错误处理
//!
//! - 各层错误使用独立的枚举，`#[from]` 自动转换为 `RegistryError`
//! - `RegistryResult<T>` 提供统一的返回类型，简化错误传播

use thiserror::Error;

pub mod codes;
pub mod permission;
pub mod storage;

pub use codes::{ErrorCategory, ErrorCode, ToPublicError};
pub use permission::{PermissionError, PermissionResult};
pub use storage::{StorageError, StorageResult};

/// 权限注册表的统一错误类型
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("权限错误: {0}")]
    Permission(#[from] PermissionError),
}

/// 统一的结果类型
pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    /// 是否为权限等级无法解析
    pub fn is_invalid_level(&self) -> bool {
        matches!(self, RegistryError::Permission(PermissionError::InvalidLevel(_)))
    }
}

impl ToPublicError for RegistryError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            RegistryError::Storage(se) => se.to_error_code(),
            RegistryError::Permission(pe) => pe.to_error_code(),
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            // IO 细节不对外暴露
            RegistryError::Storage(StorageError::IOError(_)) => {
                ErrorCode::IoError.default_message().to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Storage(err.into())
    }
}
