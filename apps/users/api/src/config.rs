use core_config::{AppInfo, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Events are only logged when unset
    pub nats_url: Option<String>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            nats_url: env_optional("NATS_URL"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_requires_database_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_from_env_reads_optional_nats() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://u:p@localhost/users")),
                ("NATS_URL", Some("nats://localhost:4222")),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "users_api");
                assert_eq!(config.nats_url.as_deref(), Some("nats://localhost:4222"));
                assert!(config.environment.is_production());
            },
        );

        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://u:p@localhost/users")),
                ("NATS_URL", None),
            ],
            || {
                assert!(Config::from_env().unwrap().nats_url.is_none());
            },
        );
    }
}
