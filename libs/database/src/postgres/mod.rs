//! PostgreSQL connector and helpers
//!
//! Connection management with retry, schema scripts and health checks.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{
    apply_sql_script, connect_from_config, connect_from_config_with_retry, connect_with_options,
    split_sql_statements,
};
pub use health::check_health;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
