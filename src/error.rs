use thiserror::Error;

/// Failure at a network boundary. Non-success statuses are not retried; only
/// a pending (202) job status keeps the poller going.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Body(String),
}

/// Payload failed to decode into a scene graph. Carries the loader's message.
#[derive(Debug, Clone, Error)]
#[error("model decode failed: {message}")]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("no model has been loaded yet")]
    NoModel,

    #[error("cannot export while an error is displayed")]
    ErrorActive,
}

/// Everything the selection pipeline can surface through the error banner.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("selection '{0}' has no navigation parameters")]
    Selection(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("translation failed: {0}")]
    ServerReported(String),

    #[error(transparent)]
    Export(#[from] ExportError),
}
