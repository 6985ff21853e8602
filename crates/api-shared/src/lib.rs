//! # API Shared
//!
//! Shared definitions for the Biopanel APIs.
//!
//! Contains:
//! - Wire types (`wire` module) with the exact JSON shape the web client consumes
//! - Shared services like `HealthService`
//!
//! Used by `biopanel-core` to render records and by `api-rest` for responses and OpenAPI schemas.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
