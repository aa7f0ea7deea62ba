use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use common::crypto::HybridCipher;
use common::identity::KeyPair;
use common::store::BlobStore;
use walrus::{WalrusClient, WalrusError};

use crate::state::{AppConfig, AppState, StateError};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to load state: {0}")]
    State(#[from] StateError),
    #[error("failed to create storage client: {0}")]
    Walrus(#[from] WalrusError),
}

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Storage client (always initialized, from config or defaults)
    pub store: Arc<dyn BlobStore>,
    /// Cipher configured with the plaintext policy
    pub cipher: HybridCipher,
    /// Loaded state, `None` before `init`
    pub state: Option<AppState>,
    /// Optional custom config path (defaults to ~/.blobseal)
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    /// Create context from the config directory, falling back to
    /// defaults when it has not been initialized yet
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ContextError> {
        let state = match AppState::load(config_path.clone()) {
            Ok(state) => Some(state),
            Err(StateError::NotInitialized) => None,
            Err(e) => return Err(e.into()),
        };

        let config = state
            .as_ref()
            .map(|state| state.config.clone())
            .unwrap_or_else(AppConfig::default);

        Ok(Self {
            store: Arc::new(WalrusClient::new(&config.walrus_config())?),
            cipher: config.cipher(),
            state,
            config_path,
        })
    }

    pub fn state(&self) -> Result<&AppState, StateError> {
        self.state.as_ref().ok_or(StateError::NotInitialized)
    }

    /// The local identity, which must already exist
    pub fn identity(&self) -> Result<KeyPair, StateError> {
        self.state()?.identity()
    }

    /// Context with a freshly initialized state directory over the
    /// given store
    #[cfg(test)]
    pub fn for_test(dir: PathBuf, store: impl BlobStore + 'static) -> Self {
        let (state, _) = AppState::init(Some(dir.clone()), None).unwrap();
        Self {
            store: Arc::new(store),
            cipher: state.config.cipher(),
            state: Some(state),
            config_path: Some(dir),
        }
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
