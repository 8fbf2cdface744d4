//! turnmark-infrastructure: storage backends, paths, configuration and
//! logging setup.

pub mod config_service;
pub mod json_file_store;
pub mod logging;
pub mod memory_store;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::json_file_store::JsonFileKeyValueStore;
pub use crate::memory_store::MemoryKeyValueStore;
pub use crate::paths::TurnmarkPaths;
