//! Domain layer for the conversation engine
//!
//! This module contains core business logic, domain models and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
