use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub service: ServiceConfig,
    pub readiness: ReadinessConfig,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    pub timeout_ms: u64,
    pub required_env: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub service_role_key: Option<String>,
    pub probe_path: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1500,
            required_env: vec![SUPABASE_URL_VAR.to_string(), SUPABASE_KEY_VAR.to_string()],
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_role_key: None,
            probe_path: "/auth/v1/health".to_string(),
            request_timeout_ms: 1000,
        }
    }
}

impl ReadinessConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SupabaseConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl AppConfig {
    /// Defaults, then `config.toml` if present, then `APP__*` variables. The
    /// Supabase connection settings also come from their conventional variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("readiness.required_env")
                    .try_parsing(true),
            )
            .set_override_option("supabase.url", std::env::var(SUPABASE_URL_VAR).ok())?
            .set_override_option(
                "supabase.service_role_key",
                std::env::var(SUPABASE_KEY_VAR).ok(),
            )?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.readiness.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Readiness timeout must be greater than 0".to_string(),
            ));
        }

        if self.supabase.request_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Supabase request timeout must be greater than 0".to_string(),
            ));
        }

        if self.readiness.required_env.iter().any(|key| key.trim().is_empty()) {
            return Err(ConfigError::Message(
                "Required env var names cannot be blank".to_string(),
            ));
        }

        if self.supabase.request_timeout_ms > self.readiness.timeout_ms {
            tracing::warn!(
                "Supabase request timeout ({}ms) exceeds readiness timeout ({}ms)",
                self.supabase.request_timeout_ms,
                self.readiness.timeout_ms
            );
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
