//! Service configuration.
//!
//! Read from `config.toml` in the platform config folder:
//! - macOS: ~/Library/Application Support/org.layer-atlas.layer-atlas/
//! - Windows: %APPDATA%/layer-atlas/config/
//! - Linux: ~/.config/layer-atlas/
//!
//! A missing file means defaults. The `JWT_SECRET` environment variable
//! overrides `[auth] secret`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use layer_auth::{AuthGuard, InMemoryRevocationStore, TokenKey};

use crate::error::{Result, ServiceError};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "layer-atlas";
const APP_NAME: &str = "layer-atlas";
const CONFIG_FILENAME: &str = "config.toml";
const SNAPSHOT_FILENAME: &str = "layers.json";

/// Environment variable holding the token secret.
pub const SECRET_ENV: &str = "JWT_SECRET";

const DAY_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub auth: AuthConfig,
    pub store: StoreConfig,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 secret.
    pub secret: Option<String>,
    /// Lifetime of issued tokens.
    pub token_ttl_secs: u64,
    /// How long a revocation is remembered. Should be at least `token_ttl_secs`.
    pub revocation_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_ttl_secs: DAY_SECS,
            revocation_ttl_secs: DAY_SECS,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("revocation_ttl_secs", &self.revocation_ttl_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Where the hierarchy snapshot lives. Defaults to the platform data folder.
    pub snapshot_path: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

impl ServiceConfig {
    /// Default config file location, if the platform has one.
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Load from the default location with environment overrides applied.
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => {
                tracing::warn!("could not determine config path, using defaults");
                Self::default()
            }
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Load from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content).map_err(|e| ServiceError::Config {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
                tracing::info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ServiceError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Apply environment overrides using `lookup` to read variables.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(secret) = lookup(SECRET_ENV).filter(|s| !s.trim().is_empty()) {
            tracing::debug!("token secret taken from {SECRET_ENV}");
            self.auth.secret = Some(secret);
        }
        self
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        i64::try_from(self.auth.token_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn revocation_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.revocation_ttl_secs)
    }

    /// Configured snapshot path, else `layers.json` in the platform data folder.
    pub fn snapshot_path(&self) -> PathBuf {
        self.store.snapshot_path.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join(SNAPSHOT_FILENAME))
                .unwrap_or_else(|| PathBuf::from(SNAPSHOT_FILENAME))
        })
    }

    pub fn token_key(&self) -> Result<TokenKey> {
        let secret = self
            .auth
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ServiceError::MissingSecret)?;
        Ok(TokenKey::new(secret)?)
    }

    /// Build an auth guard backed by an in-memory revocation store.
    pub fn build_guard(&self) -> Result<AuthGuard> {
        if self.auth.revocation_ttl_secs < self.auth.token_ttl_secs {
            tracing::warn!(
                token_ttl_secs = self.auth.token_ttl_secs,
                revocation_ttl_secs = self.auth.revocation_ttl_secs,
                "revocations expire before tokens do; revoked tokens may become valid again"
            );
        }
        let revocations = InMemoryRevocationStore::new(self.revocation_ttl());
        Ok(AuthGuard::new(self.token_key()?, Arc::new(revocations)))
    }
}
