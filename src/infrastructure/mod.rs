//! Infrastructure layer module
//!
//! - Configuration management (figment, YAML files plus `USLUGI_*` environment)
//! - Logging infrastructure (tracing subscriber, secret scrubbing)

pub mod config;
pub mod logging;
