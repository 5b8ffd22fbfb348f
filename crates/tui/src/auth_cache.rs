use std::fs::{self, File};

use anyhow::{anyhow, Context, Result};
use aula_client::{AuthState, Client, Credentials, Endpoints};
use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

/// What the login prompt collects
#[derive(Debug, Clone)]
pub struct LoginDetails {
    pub creds: Credentials,

    /// If we should write our credentials and tokens to disk on exit
    pub remember: bool,
}

/// Caches credentials and tokens between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCache {
    creds: Credentials,
    auth_state: AuthState,
}

impl AuthCache {
    pub fn from_client(client: &Client) -> Self {
        Self {
            auth_state: client.auth_state(),
            creds: client.creds.clone(),
        }
    }

    pub fn into_client(self, endpoints: Endpoints) -> Client {
        Client::with_auth_state(endpoints, self.creds, self.auth_state)
    }

    pub fn load() -> Result<Self> {
        let path = BaseDirectories::with_prefix("aula")?
            .find_cache_file("auth_cache.json")
            .ok_or_else(|| anyhow!("auth cache does not exist"))?;

        let file = File::open(path).context("error opening auth cache")?;
        let cache = serde_json::from_reader(&file).context("error deserialising auth cache")?;

        Ok(cache)
    }

    pub fn save(&self) -> Result<()> {
        let path = BaseDirectories::with_prefix("aula")?.place_cache_file("auth_cache.json")?;

        let mut file = File::create(path).context("error creating auth cache")?;
        serde_json::to_writer(&mut file, &self).context("error serialising auth cache")?;

        Ok(())
    }

    /// Forget any saved login, eg after logging out
    pub fn clear() -> Result<()> {
        if let Some(path) = BaseDirectories::with_prefix("aula")?.find_cache_file("auth_cache.json")
        {
            fs::remove_file(path).context("error removing auth cache")?;
        }

        Ok(())
    }
}
