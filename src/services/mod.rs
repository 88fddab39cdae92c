//! Service layer.
//!
//! Configuration resolution and persistence, decoupled from the storage
//! backend so the engine can run against files or memory.

pub mod config_service;
pub mod storage;

pub use config_service::ConfigService;
pub use storage::{ConfigStore, FileStore, MemoryStore};
