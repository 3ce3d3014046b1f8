//! 集成测试共享工具模块

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use perm_registry::config::DebugOptions;
use perm_registry::utils::Translator;
use perm_registry::PermissionManager;
use tempfile::TempDir;

/// 记录所有翻译请求的翻译器，用于断言提示信息
#[derive(Default)]
pub struct RecordingTranslator {
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingTranslator {
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("锁已中毒").clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|(key, _)| key).collect()
    }
}

impl Translator for RecordingTranslator {
    fn tr(&self, key: &str, args: &[&str]) -> String {
        self.calls
            .lock()
            .expect("锁已中毒")
            .push((key.to_string(), args.iter().map(|a| a.to_string()).collect()));
        key.to_string()
    }
}

/// 测试用权限文件环境，临时目录在结束时自动清理
pub struct TestRegistry {
    dir: TempDir,
    pub translator: Arc<RecordingTranslator>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("创建临时目录失败"),
            translator: Arc::new(RecordingTranslator::default()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("permission.yml")
    }

    pub fn write(&self, content: &str) {
        std::fs::write(self.path(), content).expect("写入权限文件失败");
    }

    pub fn read(&self) -> serde_yaml::Mapping {
        read_mapping(&self.path())
    }

    /// 打开权限管理器，允许文件缺失
    pub fn open(&self) -> PermissionManager {
        PermissionManager::open(
            self.path(),
            self.translator.clone(),
            DebugOptions {
                permission: true,
                ..DebugOptions::default()
            },
            true,
        )
        .expect("打开权限管理器失败")
    }
}

pub fn read_mapping(path: &Path) -> serde_yaml::Mapping {
    let content = std::fs::read_to_string(path).expect("读取权限文件失败");
    serde_yaml::from_str(&content).expect("解析权限文件失败")
}

pub fn names(items: &[&str]) -> serde_yaml::Value {
    serde_yaml::Value::Sequence(
        items
            .iter()
            .map(|s| serde_yaml::Value::String(s.to_string()))
            .collect(),
    )
}
