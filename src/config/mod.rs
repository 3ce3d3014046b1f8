use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 提示信息使用的语言，en_us 或 zh_cn
    pub language: String,
    pub permission: PermissionConfig,
    pub debug: DebugOptions,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en_us".to_string(),
            permission: PermissionConfig::default(),
            debug: DebugOptions::default(),
            log: LogConfig::default(),
        }
    }
}

/// 权限文件配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PermissionConfig {
    /// 权限文件路径
    pub file: String,
    /// 启动时是否允许权限文件缺失
    pub allow_missing_file: bool,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            file: "permission.yml".to_string(),
            allow_missing_file: true,
        }
    }
}

/// 调试日志分类开关
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DebugOptions {
    pub all: bool,
    pub permission: bool,
}

impl DebugOptions {
    /// 是否输出权限相关的调试日志
    pub fn permission_enabled(&self) -> bool {
        self.all || self.permission
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "perm-registry".to_string(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_files: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.permission.file = Config::resolve_relative(path, &config.permission.file);
        Ok(config)
    }

    /// 配置文件不存在时使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        if path.as_ref().is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn permission_file(&self) -> PathBuf {
        PathBuf::from(&self.permission.file)
    }

    /// 相对路径按配置文件所在目录解析
    fn resolve_relative(config_path: &Path, file: &str) -> String {
        let path = PathBuf::from(file);
        if path.is_absolute() {
            return file.to_string();
        }
        match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(path).to_string_lossy().into_owned(),
            _ => file.to_string(),
        }
    }
}
