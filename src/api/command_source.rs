//! 命令源
//!
//! 发起命令的一方。权限注册表只认识控制台与玩家两类，
//! 其余命令源自行决定权限，交给注册表查询属于调用错误

use std::fmt;

/// 命令源
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandSource {
    /// 服务器控制台
    Console,
    /// 已识别身份的玩家
    Player { name: String },
    /// 插件直接执行命令
    Plugin { plugin_id: String },
}

impl CommandSource {
    pub fn player(name: impl Into<String>) -> Self {
        CommandSource::Player { name: name.into() }
    }

    pub fn plugin(plugin_id: impl Into<String>) -> Self {
        CommandSource::Plugin {
            plugin_id: plugin_id.into(),
        }
    }

    pub fn is_console(&self) -> bool {
        matches!(self, CommandSource::Console)
    }

    pub fn is_player(&self) -> bool {
        matches!(self, CommandSource::Player { .. })
    }

    /// 玩家名，非玩家返回 None
    pub fn player_name(&self) -> Option<&str> {
        match self {
            CommandSource::Player { name } => Some(name),
            _ => None,
        }
    }

    /// 命令源类别名称
    pub fn kind(&self) -> &'static str {
        match self {
            CommandSource::Console => "console",
            CommandSource::Player { .. } => "player",
            CommandSource::Plugin { .. } => "plugin",
        }
    }
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSource::Console => write!(f, "Console"),
            CommandSource::Player { name } => write!(f, "Player[{}]", name),
            CommandSource::Plugin { plugin_id } => write!(f, "Plugin[{}]", plugin_id),
        }
    }
}
