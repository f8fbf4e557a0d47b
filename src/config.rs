use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::proxy::UpstreamUrl;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub upstream: UpstreamSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    /// Local port to accept HTTP connections. Required: there is no sane
    /// default port to squat on.
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    /// The fixed upstream every request is forwarded to. Required; the
    /// scheme must be `http` or `https`.
    pub url: UpstreamUrl,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Diagnostic log level for the `tracing` subscriber.
    pub level: String,
    /// Traffic log destination. Standard output when unset.
    pub file: Option<PathBuf>,
}

/// Startup overrides from the command line, applied on top of the file and
/// environment sources.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub upstream: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn load(cli: &CliOverrides) -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("logging.level", "info")?
            // Add configuration files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("TAPWIRE").separator("__"))
            // Command-line flags win over every other source
            .set_override_option("application.port", cli.port.map(i64::from))?
            .set_override_option("upstream.url", cli.upstream.clone())?
            .set_override_option(
                "logging.file",
                cli.log_file.as_ref().map(|p| p.display().to_string()),
            )?
            .build()?;

        config.try_deserialize()
    }
}
