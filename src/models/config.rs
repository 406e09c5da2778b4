//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_horizon_days() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by the HTTP server and the maintenance binaries.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Days ahead of today in which a pending adjustment counts as imminent.
    #[serde(default = "default_horizon_days")]
    pub reajuste_horizon_days: u64,
    /// Largest accepted CSV upload, in bytes.
    pub max_upload_size: Option<usize>,
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Reads `config/default.yaml`, then `config/{APP_ENV}.yaml` when present,
    /// then `APP_*` environment variables. `APP_ENV` defaults to `local`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
