use thiserror::Error;

/// Errors raised while resolving a route's url from its parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A placeholder of the path template has no truthy value in the parameter map.
    #[error("missing path parameter: {name}")]
    MissingPathParameter { name: String },

    /// A params or query shape serialized to something that is not a key/value map.
    #[error("{shape} must serialize to a map, got {kind}")]
    NotAMap { shape: &'static str, kind: &'static str },

    #[error("failed to serialize {shape}: {reason}")]
    Serialize { shape: &'static str, reason: String },
}

impl RouteError {
    pub fn missing_path_parameter(name: impl Into<String>) -> Self {
        Self::MissingPathParameter { name: name.into() }
    }

    pub fn not_a_map(shape: &'static str, kind: &'static str) -> Self {
        Self::NotAMap { shape, kind }
    }

    pub fn serialize(shape: &'static str, reason: impl ToString) -> Self {
        Self::Serialize { shape, reason: reason.to_string() }
    }
}
