use std::{env, fs::File};

use anyhow::{Context, Result};
use aula_client::Endpoints;
use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

/// User configuration, read from `$XDG_CONFIG_HOME/aula/config.json`.
/// Any of the endpoints can be overridden from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Load the config file if there is one, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match BaseDirectories::with_prefix("aula")?.find_config_file("config.json")
        {
            Some(path) => {
                let file = File::open(&path).context("error opening config file")?;
                serde_json::from_reader(&file).context("error deserialising config file")?
            }
            None => Config::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());

        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let targets = [
            ("AULA_GATEWAY", &mut self.endpoints.gateway),
            ("AULA_ISSUER", &mut self.endpoints.issuer),
            ("AULA_CLIENT_ID", &mut self.endpoints.client_id),
        ];

        for (key, target) in targets {
            if let Some(value) = var(key).filter(|v| !v.trim().is_empty()) {
                *target = value;
            }
        }
    }
}
