//! Configuration management
//!
//! Layered TOML files plus `QUILL_*` environment variable overrides,
//! deserialized into typed [`Settings`] and validated before use.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{DatabaseBackend, DatabaseConfig, ServerConfig, Settings};
