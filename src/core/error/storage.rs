//! 存储层错误类型
//!
//! 涵盖数据文件的读取、解析与写回

use std::path::PathBuf;

use thiserror::Error;

use crate::core::error::codes::{ErrorCode, ToPublicError};

/// 存储层结果类型
pub type StorageResult<T> = Result<T, StorageError>;

/// 存储层错误类型
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("数据文件不存在: {}", .0.display())]
    FileMissing(PathBuf),
    #[error("解析错误: {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("数据格式错误: {0}")]
    InvalidData(String),
    #[error("序列化错误: {0}")]
    SerializeError(String),
    #[error("IO错误: {0}")]
    IOError(String),
}

impl StorageError {
    /// 是否属于加载阶段的错误
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            StorageError::FileMissing(_) | StorageError::Parse { .. } | StorageError::InvalidData(_)
        )
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::IOError(err.to_string())
    }
}

impl From<serde_yaml::Error> for StorageError {
    fn from(err: serde_yaml::Error) -> Self {
        StorageError::SerializeError(err.to_string())
    }
}

impl ToPublicError for StorageError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            StorageError::FileMissing(_) => ErrorCode::ResourceNotFound,
            StorageError::Parse { .. } | StorageError::InvalidData(_) => ErrorCode::ParseError,
            StorageError::SerializeError(_) | StorageError::IOError(_) => ErrorCode::IoError,
        }
    }

    fn to_public_message(&self) -> String {
        self.to_string()
    }
}
