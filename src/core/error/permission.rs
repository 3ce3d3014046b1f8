//! 权限错误类型
//!
//! 涵盖权限等级解析与权限检查相关的错误

use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};

/// 权限操作结果类型别名
pub type PermissionResult<T> = Result<T, PermissionError>;

/// 权限相关错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("无效的权限等级: {0}")]
    InvalidLevel(String),

    #[error("不支持的命令源: {0}")]
    UnsupportedSource(String),

    #[error("权限不足: 需要 {required}, 当前为 {actual}")]
    InsufficientPermission { required: String, actual: String },
}

impl ToPublicError for PermissionError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            PermissionError::InvalidLevel(_) => ErrorCode::InvalidInput,
            PermissionError::UnsupportedSource(_) => ErrorCode::UnsupportedSource,
            PermissionError::InsufficientPermission { .. } => ErrorCode::PermissionDenied,
        }
    }

    fn to_public_message(&self) -> String {
        self.to_string()
    }
}
