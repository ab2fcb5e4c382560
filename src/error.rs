use thiserror::Error;

/// Errors raised by a `quote` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// The caller supplied a missing, malformed or out-of-range parameter.
    /// Raised before any request is built.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The carrier answered, but reported a fault or an unsuccessful estimate.
    #[error("{carrier} error: {message}")]
    Carrier { carrier: String, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QuoteError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn carrier(carrier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Carrier {
            carrier: carrier.into(),
            message: message.into(),
        }
    }

    /// True for errors the caller can fix by correcting its parameters.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuoteError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            QuoteError::Transport(format!("Connection failed: {}", err))
        } else {
            QuoteError::Transport(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<quick_xml::Error> for QuoteError {
    fn from(err: quick_xml::Error) -> Self {
        QuoteError::MalformedResponse(err.to_string())
    }
}

impl From<quick_xml::DeError> for QuoteError {
    fn from(err: quick_xml::DeError) -> Self {
        QuoteError::MalformedResponse(err.to_string())
    }
}

impl From<quick_xml::SeError> for QuoteError {
    fn from(err: quick_xml::SeError) -> Self {
        QuoteError::Serialization(err.to_string())
    }
}

pub type QuoteResult<T> = Result<T, QuoteError>;
