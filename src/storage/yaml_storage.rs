//! YAML 数据文件存储
//!
//! 负责数据文件的读取、缺省项补全与整文件原子写回。
//! 具体的数据结构由上层决定，本层只处理顶层映射

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::core::error::{StorageError, StorageResult};

/// 一次加载的结果
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// 补全后的顶层映射
    pub data: Mapping,
    /// 从默认数据补全的键，按补全顺序排列
    pub fixed_keys: Vec<String>,
    /// 数据文件是否存在
    pub file_present: bool,
}

impl LoadedData {
    /// 加载结果与磁盘内容不一致，需要写回
    pub fn needs_save(&self) -> bool {
        !self.file_present || !self.fixed_keys.is_empty()
    }
}

/// 以 YAML 文件为后端的数据存储
#[derive(Debug, Clone)]
pub struct YamlDataStorage {
    file_path: PathBuf,
    default_content: &'static str,
}

impl YamlDataStorage {
    /// 创建存储
    ///
    /// `default_content` 为内置的默认数据，文件缺失或缺少键时使用
    pub fn new(file_path: impl Into<PathBuf>, default_content: &'static str) -> Self {
        Self {
            file_path: file_path.into(),
            default_content,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// 数据文件是否存在
    pub fn file_presents(&self) -> bool {
        self.file_path.is_file()
    }

    /// 解析内置默认数据
    pub fn load_default_data(&self) -> StorageResult<Mapping> {
        parse_mapping(self.default_content).map_err(|message| StorageError::Parse {
            path: PathBuf::from("<default>"),
            message,
        })
    }

    /// 读取数据文件
    ///
    /// 文件不存在时，`allowed_missing_file` 为 true 则使用默认数据，否则返回
    /// [`StorageError::FileMissing`]。默认数据中存在而文件中缺失的键会被补全
    pub fn load_data(&self, allowed_missing_file: bool) -> StorageResult<LoadedData> {
        let default_data = self.load_default_data()?;

        let file_present = self.file_presents();
        let mut data = if file_present {
            let content = fs::read_to_string(&self.file_path)?;
            parse_mapping(&content).map_err(|message| StorageError::Parse {
                path: self.file_path.clone(),
                message,
            })?
        } else if allowed_missing_file {
            Mapping::new()
        } else {
            return Err(StorageError::FileMissing(self.file_path.clone()));
        };

        let mut fixed_keys = Vec::new();
        for (key, value) in default_data {
            // 默认数据中有值的键在文件中为空时同样视为缺失
            let missing = match data.get(&key) {
                None => true,
                Some(Value::Null) => !value.is_null(),
                Some(_) => false,
            };
            if missing {
                if let Value::String(name) = &key {
                    fixed_keys.push(name.clone());
                }
                data.insert(key, value);
            }
        }

        Ok(LoadedData {
            data,
            fixed_keys: if file_present { fixed_keys } else { Vec::new() },
            file_present,
        })
    }

    /// 写回数据文件
    ///
    /// `pre_save` 作用于待写入的副本，不影响调用方持有的数据。
    /// 先写入同目录下的临时文件再重命名，保证整文件替换
    pub fn save(&self, data: &Mapping, pre_save: impl FnOnce(&mut Mapping)) -> StorageResult<()> {
        let mut snapshot = data.clone();
        pre_save(&mut snapshot);
        let content = serde_yaml::to_string(&Value::Mapping(snapshot))?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        if let Err(err) = write_synced(&tmp_path, content.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&tmp_path, &self.file_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

/// 写入并落盘，确保重命名前内容已到达磁盘
fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// 解析顶层映射，空文档视为空映射
fn parse_mapping(content: &str) -> Result<Mapping, String> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(format!("顶层应为映射，实际为 {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEFAULT: &str = "default_level: user\nowner:\nuser:\n";

    fn key(name: &str) -> Value {
        Value::String(name.to_string())
    }

    #[test]
    fn test_load_missing_file_allowed() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let storage = YamlDataStorage::new(dir.path().join("data.yml"), DEFAULT);

        let loaded = storage.load_data(true).expect("允许缺失时应加载默认数据");
        assert!(!loaded.file_present);
        assert!(loaded.needs_save());
        assert!(loaded.fixed_keys.is_empty());
        assert_eq!(loaded.data.get(key("default_level")), Some(&key("user")));
    }

    #[test]
    fn test_load_missing_file_rejected() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let storage = YamlDataStorage::new(dir.path().join("data.yml"), DEFAULT);

        let result = storage.load_data(false);
        assert!(matches!(result, Err(StorageError::FileMissing(_))));
    }

    #[test]
    fn test_load_fills_missing_keys() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let path = dir.path().join("data.yml");
        fs::write(&path, "default_level: admin\n").expect("写入测试文件失败");
        let storage = YamlDataStorage::new(&path, DEFAULT);

        let loaded = storage.load_data(false).expect("加载应成功");
        assert!(loaded.file_present);
        assert_eq!(loaded.fixed_keys, vec!["owner".to_string(), "user".to_string()]);
        // 已有的键保持文件中的值
        assert_eq!(loaded.data.get(key("default_level")), Some(&key("admin")));
        assert_eq!(loaded.data.get(key("owner")), Some(&Value::Null));
    }

    #[test]
    fn test_load_fills_null_keys_with_default_value() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let path = dir.path().join("data.yml");
        fs::write(&path, "default_level: ~\nowner:\nuser:\n").expect("写入测试文件失败");
        let storage = YamlDataStorage::new(&path, DEFAULT);

        let loaded = storage.load_data(false).expect("加载应成功");
        assert_eq!(loaded.fixed_keys, vec!["default_level".to_string()]);
        assert!(loaded.needs_save());
        assert_eq!(loaded.data.get(key("default_level")), Some(&key("user")));
        // 默认值本身为空的键不算缺失
        assert_eq!(loaded.data.get(key("owner")), Some(&Value::Null));
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let path = dir.path().join("data.yml");
        fs::write(&path, "default_level: admin\nstale: true\n").expect("写入测试文件失败");
        let storage = YamlDataStorage::new(&path, DEFAULT);

        let mut data = Mapping::new();
        data.insert(key("default_level"), key("guest"));
        storage.save(&data, |_| {}).expect("保存应成功");

        let reloaded = storage.load_data(false).expect("重新加载应成功");
        assert_eq!(reloaded.data.get(key("default_level")), Some(&key("guest")));
        assert!(!reloaded.data.contains_key(key("stale")));
        assert!(!dir.path().join("data.yml.tmp").exists());
    }

    #[test]
    fn test_load_unparsable_file() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let path = dir.path().join("data.yml");
        fs::write(&path, "owner: [unclosed\n").expect("写入测试文件失败");
        let storage = YamlDataStorage::new(&path, DEFAULT);

        assert!(matches!(storage.load_data(true), Err(StorageError::Parse { .. })));

        fs::write(&path, "- just\n- a list\n").expect("写入测试文件失败");
        assert!(matches!(storage.load_data(true), Err(StorageError::Parse { .. })));
    }

    #[test]
    fn test_save_applies_hook_to_copy() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let path = dir.path().join("nested").join("data.yml");
        let storage = YamlDataStorage::new(&path, DEFAULT);

        let mut data = Mapping::new();
        data.insert(key("default_level"), key("user"));
        storage
            .save(&data, |snapshot| {
                snapshot.insert(key("marker"), Value::Bool(true));
            })
            .expect("保存应成功");

        // 原数据不受钩子影响
        assert!(!data.contains_key(key("marker")));
        let written = fs::read_to_string(&path).expect("读取写入的文件失败");
        assert!(written.contains("marker: true"));
        assert!(!dir.path().join("nested").join("data.yml.tmp").exists());
    }
}
