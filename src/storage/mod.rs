pub mod yaml_storage;

pub use yaml_storage::{LoadedData, YamlDataStorage};

pub use crate::core::StorageError;
