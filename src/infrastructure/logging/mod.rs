//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty stdout formatting
//! - `RUST_LOG` overrides on top of the configured level
//! - Secret scrubbing for upstream error text

pub mod logger;
pub mod secret_scrubbing;

pub use logger::LoggerImpl;
pub use secret_scrubbing::{scrub, SecretScrubber};
