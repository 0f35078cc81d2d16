use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::ConfigError;

const DEFAULT_PORT: u16 = 8080;

/// Runtime settings, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub base_url: String,
    pub store: StoreConfig,
    pub template_dir: Option<PathBuf>,
    pub reload_templates: bool,
}

/// Where quotes are kept.
#[derive(Clone, Debug)]
pub enum StoreConfig {
    Postgres { connection_string: String },
    InMemory,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let store = if get_flag("QUOTES_IN_MEMORY") {
            StoreConfig::InMemory
        } else {
            StoreConfig::Postgres {
                connection_string: get_variable("QUOTES_DB_CONNECTION_STRING")?,
            }
        };

        Ok(Config {
            port: get_parsed_or("QUOTES_PORT", DEFAULT_PORT)?,
            base_url: get_variable("QUOTES_BASE_URL")?,
            store,
            template_dir: env::var("QUOTES_TEMPLATE_DIR").ok().map(PathBuf::from),
            reload_templates: get_flag("QUOTES_TEMPLATE_RELOAD"),
        })
    }
}

/// Returns the value of the named environment variable.
pub fn get_variable(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn get_parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn get_flag(name: &str) -> bool {
    env::var(name).map(|value| value == "1").unwrap_or(false)
}
