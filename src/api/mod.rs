pub mod command_source;
pub mod permission;

pub use command_source::CommandSource;
pub use permission::{PermissionChecker, PermissionManager};
