use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self {
            port: try_load("THISORTHAT_PORT", "3000"),
            data_dir: PathBuf::from(try_load::<String>("THISORTHAT_DATA_DIR", "data")),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
