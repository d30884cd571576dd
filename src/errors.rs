use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A node the engine cannot run without is absent from the surface.
    #[error("required node missing from surface: {0}")]
    MissingNode(String),

    #[error("stat provider returned status {0}")]
    UpstreamStatus(u16),

    #[error("stat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
