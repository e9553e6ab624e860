//! The single resolution step shared by every client entry point.

use crate::path::substitute;
use crate::query::{QueryEncoding, append_query, serialize_with};
use crate::{ParamMap, RouteError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options controlling url resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    pub query_encoding: QueryEncoding,
}

/// A resolved url and what is left of the parameter map.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub url: String,
    /// `None` when no parameter map was given, otherwise the unconsumed parameters.
    pub params: Option<ParamMap>,
}

/// Resolves a templated url against its params and query.
///
/// When `params` is given, the template placeholders are substituted and `params` is replaced by
/// the remainder. When `query` is given and not empty, it is serialized and appended.
pub fn resolve(
    url: &str,
    params: Option<&ParamMap>,
    query: Option<&ParamMap>,
    options: &ResolveOptions,
) -> Result<Resolved, RouteError> {
    let (mut resolved_url, params) = match params {
        Some(params) => {
            let (url, remainder) = substitute(url, params)?.into_parts();
            (url, Some(remainder))
        }
        None => (url.to_owned(), None),
    };

    if let Some(query) = query {
        append_query(&mut resolved_url, &serialize_with(query, options.query_encoding));
    }

    debug!(template = url, url = %resolved_url, "resolved request url");
    Ok(Resolved { url: resolved_url, params })
}
