//! 对外错误码定义
//!
//! 错误码用于命令行的退出状态以及宿主程序的错误展示
//!
//! 错误码格式: XXYY
//! - XX: 错误类别 (00=成功, 01=解析, 03=验证, 04=权限, 05=资源, 09=系统)
//! - YY: 具体错误

/// 对外错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success = 0,

    /// 权限文件无法解析
    ParseError = 101,

    /// 无效输入（如无法解析的权限等级）
    InvalidInput = 302,
    /// 不支持的命令源
    UnsupportedSource = 304,

    /// 权限不足
    PermissionDenied = 400,

    /// 权限文件不存在
    ResourceNotFound = 500,

    /// IO 错误
    IoError = 902,
}

impl ErrorCode {
    /// 获取错误码的 i32 值
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_i32() {
            0 => ErrorCategory::Success,
            100..=199 => ErrorCategory::Parse,
            300..=399 => ErrorCategory::Validation,
            400..=499 => ErrorCategory::Permission,
            500..=599 => ErrorCategory::Resource,
            _ => ErrorCategory::System,
        }
    }

    /// 获取默认的错误消息
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "成功",
            ErrorCode::ParseError => "解析错误",
            ErrorCode::InvalidInput => "无效输入",
            ErrorCode::UnsupportedSource => "不支持的命令源",
            ErrorCode::PermissionDenied => "权限不足",
            ErrorCode::ResourceNotFound => "资源未找到",
            ErrorCode::IoError => "IO操作失败",
        }
    }

    /// 进程退出码，按错误类别区分
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Success => 0,
            ErrorCategory::Parse => 3,
            ErrorCategory::Validation => 2,
            ErrorCategory::Permission => 4,
            ErrorCategory::Resource => 5,
            ErrorCategory::System => 1,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.default_message())
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Success,
    Parse,
    Validation,
    Permission,
    Resource,
    System,
}

/// 内部错误到对外错误的转换 trait
pub trait ToPublicError {
    /// 获取对外错误码
    fn to_error_code(&self) -> ErrorCode;

    /// 获取对外错误消息（过滤内部细节）
    fn to_public_message(&self) -> String;
}
