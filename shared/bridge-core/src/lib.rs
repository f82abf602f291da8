//! Bridge Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Call history and lead domain types
//! - Standard service trait and runtime for bridge binaries
//! - Error handling utilities
//! - Configuration helpers

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::{env_or, parse_value, ServiceConfig};
pub use domain::*;
pub use error::{BridgeError, Result};
pub use service::{
    BridgeService, DependencyStatus, HealthStatus, ReadinessStatus, ServiceRuntime, SHUTDOWN_GRACE,
};
