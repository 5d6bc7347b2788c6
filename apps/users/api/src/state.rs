//! Shared application state passed to the route builders.

use crate::events::NatsNotifier;

/// Cloned into each router (cheap: the pool and the NATS client are handles)
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Present when `NATS_URL` is set and reachable
    pub events: Option<NatsNotifier>,
}
