//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - Redacted rendering for `check-config`

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
