use std::time::Duration;
use std::{fs, path::PathBuf};

use common::crypto::{HybridCipher, PlaintextPolicy};
use common::identity::{FileKeyStore, KeyManager, KeyPair, KeyStoreError};
use serde::{Deserialize, Serialize};
use walrus::{WalrusConfig, DEFAULT_AGGREGATOR_URL, DEFAULT_EPOCHS, DEFAULT_PUBLISHER_URL};

pub const APP_NAME: &str = "blobseal";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEY_FILE_NAME: &str = "key.pem";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Walrus publisher, used for writes
    #[serde(default = "default_publisher_url")]
    pub publisher_url: String,
    /// Walrus aggregator, used for reads and reference resolution
    #[serde(default = "default_aggregator_url")]
    pub aggregator_url: String,
    /// Storage epochs requested per upload
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    /// Per-request timeout in seconds (no timeout when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// How decrypt treats input without the envelope marker
    #[serde(default)]
    pub plaintext: PlaintextPolicy,
}

fn default_publisher_url() -> String {
    DEFAULT_PUBLISHER_URL.to_string()
}

fn default_aggregator_url() -> String {
    DEFAULT_AGGREGATOR_URL.to_string()
}

fn default_epochs() -> u32 {
    DEFAULT_EPOCHS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            publisher_url: default_publisher_url(),
            aggregator_url: default_aggregator_url(),
            epochs: default_epochs(),
            timeout_secs: None,
            plaintext: PlaintextPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn walrus_config(&self) -> WalrusConfig {
        WalrusConfig::new(&self.publisher_url, &self.aggregator_url)
            .with_epochs(self.epochs)
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
    }

    pub fn cipher(&self) -> HybridCipher {
        HybridCipher::new(self.plaintext)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the blobseal directory (~/.blobseal)
    pub app_dir: PathBuf,
    /// Path to the identity PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the blobseal directory path (custom or default ~/.blobseal)
    pub fn app_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory and create the identity
    ///
    /// On failure nothing is left behind, so `init` can simply be rerun.
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<(Self, KeyPair), StateError> {
        let app_dir = Self::app_dir(custom_path)?;
        Self::init_at(app_dir, config.unwrap_or_default(), |state| {
            Ok(state.key_manager().create_or_load_identity()?)
        })
    }

    fn init_at<F>(
        app_dir: PathBuf,
        config: AppConfig,
        create_identity: F,
    ) -> Result<(Self, KeyPair), StateError>
    where
        F: FnOnce(&Self) -> Result<KeyPair, StateError>,
    {
        if app_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config_toml = toml::to_string_pretty(&config)?;
        fs::create_dir_all(&app_dir)?;

        let state = Self {
            key_path: app_dir.join(KEY_FILE_NAME),
            config_path: app_dir.join(CONFIG_FILE_NAME),
            app_dir,
            config,
        };

        let result = fs::write(&state.config_path, config_toml)
            .map_err(StateError::from)
            .and_then(|()| create_identity(&state));

        match result {
            Ok(identity) => Ok((state, identity)),
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&state.app_dir) {
                    tracing::warn!(
                        "failed to remove partial state at {}: {}",
                        state.app_dir.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// Load existing state from the blobseal directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if !app_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let key_path = app_dir.join(KEY_FILE_NAME);
        let config_path = app_dir.join(CONFIG_FILE_NAME);

        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            app_dir,
            key_path,
            config_path,
            config,
        })
    }

    pub fn key_manager(&self) -> KeyManager<FileKeyStore> {
        KeyManager::new(FileKeyStore::new(&self.key_path))
    }

    /// Load the persisted identity without creating one
    pub fn identity(&self) -> Result<KeyPair, StateError> {
        self.key_manager()
            .load_identity()?
            .ok_or_else(|| StateError::MissingFile(KEY_FILE_NAME.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("blobseal directory not initialized. Run 'blobseal init' first")]
    NotInitialized,

    #[error("blobseal directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("key store error: {0}")]
    KeyStore(#[from] KeyStoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
