use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("Invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    #[error("{0}")]
    WebRtc(String),
    #[error("No local description")]
    MissingLocalDescription,
    #[error("Invalid screen selection: {0:?}")]
    InvalidScreen(String),
    #[error("A session is already being negotiated")]
    Busy,
    #[error("A session is already active")]
    AlreadyActive,
    #[error("No active session")]
    NotActive,
    #[error("Viewer is shut down")]
    Closed,
}

pub type Result<T> = std::result::Result<T, ViewerError>;
