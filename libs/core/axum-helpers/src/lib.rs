//! # Axum Helpers
//!
//! Shared HTTP plumbing for the users service.
//!
//! - **[`errors`]**: `AppError`, error codes and the JSON error body
//! - **[`extractors`]**: validated JSON, positive id paths, query params
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, QueryParams, ValidatedJson};
pub use http::{cors_from_env, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
