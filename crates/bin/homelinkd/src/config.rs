//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homelink.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener settings.
    pub server: ServerConfig,
    /// Sensor simulation settings.
    pub simulator: SimulatorConfig,
    /// Property directory settings.
    pub properties: PropertiesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Listener configuration for both transports.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// WebSocket TCP port.
    pub ws_port: u16,
    /// HTTP API TCP port.
    pub http_port: u16,
}

/// Sensor simulation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Perturbation period in milliseconds.
    pub tick_interval_ms: u64,
}

/// Property directory configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PropertiesConfig {
    /// Path to the property directory JSON file.
    pub path: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `homelink.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homelink.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HOMELINK_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("HOMELINK_WS_PORT") {
            if let Ok(port) = val.parse() {
                self.server.ws_port = port;
            }
        }
        if let Ok(val) = std::env::var("HOMELINK_HTTP_PORT") {
            if let Ok(port) = val.parse() {
                self.server.http_port = port;
            }
        }
        if let Ok(val) = std::env::var("HOMELINK_TICK_MS") {
            if let Ok(millis) = val.parse() {
                self.simulator.tick_interval_ms = millis;
            }
        }
        if let Ok(val) = std::env::var("HOMELINK_PROPERTIES") {
            self.properties.path = val;
        }
        if let Ok(val) = std::env::var("HOMELINK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.ws_port == 0 || self.server.http_port == 0 {
            return Err(ConfigError::Validation(
                "ports must be non-zero".to_string(),
            ));
        }
        if self.server.ws_port == self.server.http_port {
            return Err(ConfigError::Validation(
                "ws_port and http_port must differ".to_string(),
            ));
        }
        if self.simulator.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick_interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address for the WebSocket listener.
    #[must_use]
    pub fn ws_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.ws_port)
    }

    /// Return the `host:port` bind address for the HTTP API listener.
    #[must_use]
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            ws_port: 8080,
            http_port: 3001,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 3000,
        }
    }
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            path: "properties.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homelinkd=info,homelink=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
