//! Query string serialization.

use crate::ParamMap;
use crate::value::stringify;
use serde::{Deserialize, Serialize};

/// How keys and values are written into a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryEncoding {
    /// Keys and values are written as plain strings, nothing is escaped.
    #[default]
    Raw,
    /// Keys and values are percent-encoded.
    Percent,
}

/// Serializes `query` as `k1=v1&k2=v2` in map order, without escaping.
///
/// An empty map produces an empty string.
pub fn serialize(query: &ParamMap) -> String {
    serialize_with(query, QueryEncoding::Raw)
}

pub fn serialize_with(query: &ParamMap, encoding: QueryEncoding) -> String {
    let mut out = String::new();
    for (key, value) in query {
        if !out.is_empty() {
            out.push('&');
        }
        let value = stringify(value);
        match encoding {
            QueryEncoding::Raw => {
                out.push_str(key);
                out.push('=');
                out.push_str(&value);
            }
            QueryEncoding::Percent => {
                out.push_str(&urlencoding::encode(key));
                out.push('=');
                out.push_str(&urlencoding::encode(&value));
            }
        }
    }
    out
}

/// Appends a serialized query string to `url`.
///
/// Nothing is appended for an empty query string. The separator is `?`, or `&` when the url
/// already carries a query.
pub fn append_query(url: &mut String, query_string: &str) {
    if query_string.is_empty() {
        return;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(query_string);
}
