use thiserror::Error;

/// Failures surfaced by the reservation page client.
///
/// Both `Application` and `Transport` display as the bare message so that
/// callers can prefix them uniformly (`"Error: {err}"`).
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered with a JSON payload carrying an `error` field.
    #[error("{0}")]
    Application(String),

    /// Network failure, non-JSON body or a payload that failed to decode.
    #[error("{0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ClientError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ClientError::Transport(Box::new(err))
    }

    /// A transport-level failure described only by a message, e.g. a payload
    /// that decoded but lacks a required field.
    pub fn decode(message: impl Into<String>) -> Self {
        let message: String = message.into();
        ClientError::Transport(message.into())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
