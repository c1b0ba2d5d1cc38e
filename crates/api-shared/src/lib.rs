//! # API Shared
//!
//! Shared wire definitions for the RDV APIs.
//!
//! Contains:
//! - Request/response body types (`wire` module)
//! - Shared services like `HealthService`
//! - Staff API key validation
//!
//! Used by `api-rest` and the service binary for common functionality.

pub mod auth;
pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
