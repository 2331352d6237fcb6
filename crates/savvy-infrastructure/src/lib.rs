//! File-backed infrastructure for savvy: paths, config, secrets, session flag.

pub mod paths;
pub mod secret_service;
pub mod settings;
pub mod storage;

pub use paths::SavvyPaths;
pub use secret_service::SecretServiceImpl;
pub use settings::{load_catalog, load_config};
pub use storage::{ConfigStorage, FileSessionFlagStore, SecretStorage, StorageError};
