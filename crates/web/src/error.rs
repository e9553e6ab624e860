use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    /// The registrar refused the route, usually because it conflicts with an existing one.
    #[error("failed to register route `{path}`: {source}")]
    Register {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("invalid path params: {source}")]
    Params {
        #[source]
        source: serde_urlencoded::de::Error,
    },

    #[error("invalid query string: {source}")]
    Query {
        #[source]
        source: serde_qs::Error,
    },

    #[error("invalid json body: {source}")]
    Body {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode reply: {source}")]
    Reply {
        #[source]
        source: serde_json::Error,
    },
}

impl WebError {
    pub fn register(path: impl Into<String>, source: matchit::InsertError) -> Self {
        Self::Register { path: path.into(), source }
    }

    pub fn params(source: serde_urlencoded::de::Error) -> Self {
        Self::Params { source }
    }

    pub fn query(source: serde_qs::Error) -> Self {
        Self::Query { source }
    }

    pub fn body(source: serde_json::Error) -> Self {
        Self::Body { source }
    }

    pub fn reply(source: serde_json::Error) -> Self {
        Self::Reply { source }
    }
}
