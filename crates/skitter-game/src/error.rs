/// Errors raised while building or growing game objects.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load actor model '{model}': {reason}")]
    AssetLoad { model: String, reason: String },

    #[error("actor model '{0}' reports no bounds")]
    MissingBounds(String),
}
