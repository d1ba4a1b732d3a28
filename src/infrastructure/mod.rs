//! Infrastructure layer - external adapters (filesystem, memory, config).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod local_storage;
pub mod memory_storage;
pub mod storage;

pub use config::{ensure_config_exists, load_config, load_config_from_file, resolve_config_path};
pub use local_storage::LocalStorage;
pub use memory_storage::MemoryStorage;
pub use storage::BatchStorage;
