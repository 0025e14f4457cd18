use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_DATABASE_PATH, DEFAULT_FORECAST_PATH, ENV_PREFIX,
};
use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Resolved runtime settings.
///
/// Sources, lowest precedence first: built-in defaults, an optional TOML file,
/// `SENSOR_DASHBOARD_*` environment variables, then command-line overrides.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub database_path: String,

    #[validate(length(min = 1))]
    pub forecast_path: String,

    pub bind_address: SocketAddr,
}

/// Values supplied on the command line; `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub database_path: Option<PathBuf>,
    pub forecast_path: Option<PathBuf>,
    pub bind_address: Option<String>,
}

impl Settings {
    pub fn load(config_file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("forecast_path", DEFAULT_FORECAST_PATH)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option(
                "database_path",
                overrides
                    .database_path
                    .as_ref()
                    .map(|p| p.display().to_string()),
            )?
            .set_override_option(
                "forecast_path",
                overrides
                    .forecast_path
                    .as_ref()
                    .map(|p| p.display().to_string()),
            )?
            .set_override_option("bind_address", overrides.bind_address.clone())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn database_path(&self) -> &Path {
        Path::new(&self.database_path)
    }

    pub fn forecast_path(&self) -> &Path {
        Path::new(&self.forecast_path)
    }
}
