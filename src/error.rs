use thiserror::Error;

/// Failures of the remote sentiment provider. These never leave the
/// classifier; each one selects the keyword fallback.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider credentials are not configured")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("provider returned no documents")]
    EmptyResponse,
}
