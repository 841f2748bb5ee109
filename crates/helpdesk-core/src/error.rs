use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("event stream is not connected")]
    NotConnected,
    #[error("message text required")]
    MessageTextRequired,
    #[error("access denied")]
    AccessDenied,
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}
