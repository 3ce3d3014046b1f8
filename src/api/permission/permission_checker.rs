use parking_lot::Mutex;
use std::sync::Arc;

use crate::api::command_source::CommandSource;
use crate::api::permission::permission_manager::PermissionManager;
use crate::core::error::{PermissionError, RegistryResult};
use crate::core::{LevelRef, PermissionLevel};

/// 权限检查器
///
/// 包装共享的 [`PermissionManager`]，所有访问都经过同一把互斥锁，
/// 可以在多个线程之间克隆使用
#[derive(Clone)]
pub struct PermissionChecker {
    permission_manager: Arc<Mutex<PermissionManager>>,
}

impl PermissionChecker {
    pub fn new(permission_manager: PermissionManager) -> Self {
        Self {
            permission_manager: Arc::new(Mutex::new(permission_manager)),
        }
    }

    /// 查询命令源的权限等级
    pub fn get_permission(&self, source: &CommandSource) -> RegistryResult<PermissionLevel> {
        self.permission_manager.lock().get_permission(source)
    }

    /// 命令源的权限等级是否不低于 `level`
    pub fn has_permission<'a>(
        &self,
        source: &CommandSource,
        level: impl Into<LevelRef<'a>>,
    ) -> RegistryResult<bool> {
        let required = PermissionLevel::from_value(level)?;
        Ok(self.get_permission(source)? >= required)
    }

    /// 要求命令源的权限等级不低于 `level`
    pub fn require_permission<'a>(
        &self,
        source: &CommandSource,
        level: impl Into<LevelRef<'a>>,
    ) -> RegistryResult<()> {
        let required = PermissionLevel::from_value(level)?;
        let actual = self.get_permission(source)?;
        if actual >= required {
            Ok(())
        } else {
            Err(PermissionError::InsufficientPermission {
                required: required.to_string(),
                actual: actual.to_string(),
            }
            .into())
        }
    }

    /// 持有锁执行一组操作，期间其他线程无法访问权限数据
    pub fn with_manager<R>(&self, f: impl FnOnce(&mut PermissionManager) -> R) -> R {
        let mut manager = self.permission_manager.lock();
        f(&mut manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DebugOptions;
    use crate::core::error::RegistryError;
    use crate::utils::translation::BuiltinTranslator;
    use tempfile::TempDir;

    fn checker(dir: &TempDir) -> PermissionChecker {
        let pm = PermissionManager::open(
            dir.path().join("permission.yml"),
            Arc::new(BuiltinTranslator::default()),
            DebugOptions::default(),
            true,
        )
        .expect("打开权限管理器失败");
        PermissionChecker::new(pm)
    }

    #[test]
    fn test_has_permission() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let checker = checker(&dir);
        checker
            .with_manager(|pm| pm.set_level("Steve", "helper"))
            .expect("设置等级失败");

        let steve = CommandSource::player("Steve");
        assert!(checker.has_permission(&steve, "user").expect("检查失败"));
        assert!(checker.has_permission(&steve, PermissionLevel::Helper).expect("检查失败"));
        assert!(!checker.has_permission(&steve, "admin").expect("检查失败"));
        assert!(checker.has_permission(&CommandSource::Console, "owner").expect("检查失败"));
    }

    #[test]
    fn test_require_permission() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let checker = checker(&dir);

        let alex = CommandSource::player("Alex");
        assert!(checker.require_permission(&alex, "user").is_ok());
        let err = checker.require_permission(&alex, "admin").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Permission(PermissionError::InsufficientPermission { .. })
        ));
        assert!(checker.require_permission(&alex, "nope").unwrap_err().is_invalid_level());
    }

    #[test]
    fn test_shared_across_threads() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let checker = checker(&dir);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let checker = checker.clone();
                std::thread::spawn(move || {
                    let source = CommandSource::player(format!("player{}", i));
                    checker.get_permission(&source).expect("查询失败")
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("线程异常"), PermissionLevel::User);
        }

        let members = checker.with_manager(|pm| pm.list_all_members());
        assert_eq!(members.len(), 4);
    }
}
