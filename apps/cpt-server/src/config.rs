//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, YAML file, `CPT__*`
//! environment variables, CLI overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cpt_engine::CptEngineConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment prefix; nesting uses `__`, e.g. `CPT__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "CPT__";

pub const MOCK_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub cpt: CptEngineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Per-request deadline, e.g. `30s` or `1m 30s`.
    #[serde(with = "humantime_duration")]
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_owned(),
            port: 8087,
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
            cors_enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// DSN with any password replaced by `***`, safe to log or print.
    #[must_use]
    pub fn redacted_dsn(&self) -> String {
        redact_credentials_in_dsn(&self.dsn)
    }
}

/// Redact the password of a URL-style DSN.
#[must_use]
pub fn redact_credentials_in_dsn(dsn: &str) -> String {
    if !dsn.contains('@') {
        return dsn.to_owned();
    }
    let Ok(mut parsed) = url::Url::parse(dsn) else {
        return "***".to_owned();
    };
    if parsed.password().is_some() && parsed.set_password(Some("***")).is_err() {
        return "***".to_owned();
    }
    parsed.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: MOCK_DSN.to_owned(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
}

impl AppConfig {
    /// Load defaults, then the YAML file (if any), then the environment.
    ///
    /// # Errors
    /// Returns an error when a source cannot be read or the merged document
    /// does not match the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)
            .extract()
            .context("invalid configuration")
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        match cli.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
        if cli.mock {
            MOCK_DSN.clone_into(&mut self.database.dsn);
        }
    }

    /// `bind_addr:port` as a socket address string.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    /// Render as YAML with database credentials redacted.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_yaml(&self) -> Result<String> {
        let mut shown = self.clone();
        shown.database.dsn = self.database.redacted_dsn();
        serde_saphyr::to_string(&shown).context("failed to render configuration as YAML")
    }
}

/// Serde adapter for `Duration` fields written in humantime notation.
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    #[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
