/// Error type for connection management and maintenance tasks.
///
/// Query failures inside repositories are mapped to domain errors by the
/// repositories themselves; this type only covers the plumbing around them.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Schema script failed at statement {index}: {message}")]
    Script { index: usize, message: String },
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
