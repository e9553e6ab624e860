use crate::transport::TransportError;
use micro_route::RouteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The url could not be resolved; nothing was sent.
    #[error("route error: {source}")]
    Route {
        #[from]
        source: RouteError,
    },

    /// Error returned by the transport, untouched.
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: TransportError,
    },

    #[error("failed to encode json body: {source}")]
    EncodeJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode form body: {source}")]
    EncodeForm {
        #[from]
        source: serde_urlencoded::ser::Error,
    },

    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },
}

impl ClientError {
    pub fn transport(source: TransportError) -> Self {
        Self::Transport { source }
    }

    pub fn encode_json(source: serde_json::Error) -> Self {
        Self::EncodeJson { source }
    }

    pub fn decode(source: serde_json::Error) -> Self {
        Self::Decode { source }
    }

    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidHeader { name: name.into(), reason: reason.to_string() }
    }

    /// Returns the transport error, if this error came from the transport.
    pub fn into_transport_error(self) -> Option<TransportError> {
        match self {
            Self::Transport { source } => Some(source),
            _ => None,
        }
    }
}
