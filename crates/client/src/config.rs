//! Per-call request configuration and client level options.

use crate::error::ClientError;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use micro_route::{ParamMap, QueryEncoding, ResolveOptions};
use mime::Mime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Everything describing one request, before and after url resolution.
///
/// A client keeps one as its defaults; each call's config is merged over it, the call winning.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Url or path template, relative to `base_url` unless absolute
    pub url: Option<String>,
    pub method: Option<Method>,
    pub base_url: Option<String>,
    /// Path params; after resolution only the unconsumed ones remain
    pub params: Option<ParamMap>,
    /// Query params, always serialized onto the url
    pub query: Option<ParamMap>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_params(mut self, params: ParamMap) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.get_or_insert_with(ParamMap::new).insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, query: ParamMap) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.get_or_insert_with(ParamMap::new).insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the body and, unless one is already present, the content type.
    pub(crate) fn with_typed_body(mut self, body: impl Into<Bytes>, content_type: &Mime) -> Result<Self, ClientError> {
        if !self.headers.contains_key(CONTENT_TYPE) {
            let value = HeaderValue::from_str(content_type.as_ref())
                .map_err(|e| ClientError::invalid_header(CONTENT_TYPE.as_str(), e))?;
            self.headers.insert(CONTENT_TYPE, value);
        }
        Ok(self.with_body(body))
    }

    /// Merges `call` over `self`: every field set in `call` wins, headers are combined with the
    /// ones of `call` replacing same-named ones.
    pub fn merged_with(&self, call: RequestConfig) -> RequestConfig {
        let mut headers = self.headers.clone();
        for name in call.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &call.headers {
            headers.append(name.clone(), value.clone());
        }

        RequestConfig {
            url: call.url.or_else(|| self.url.clone()),
            method: call.method.or_else(|| self.method.clone()),
            base_url: call.base_url.or_else(|| self.base_url.clone()),
            params: call.params.or_else(|| self.params.clone()),
            query: call.query.or_else(|| self.query.clone()),
            headers,
            body: call.body.or_else(|| self.body.clone()),
            timeout: call.timeout.or(self.timeout),
        }
    }

    /// The url joined to `base_url`, unless it is already absolute.
    pub fn full_url(&self) -> Option<String> {
        let url = self.url.as_deref()?;
        if url.starts_with("http://") || url.starts_with("https://") {
            return Some(url.to_owned());
        }

        match self.base_url.as_deref() {
            Some(base) if url.is_empty() => Some(base.to_owned()),
            Some(base) => Some(format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))),
            None => Some(url.to_owned()),
        }
    }
}

/// Client level options, loadable from any serde format.
///
/// ```
/// use micro_route_client::ClientOptions;
///
/// let options: ClientOptions = serde_json::from_str(
///     r#"{ "base_url": "http://localhost:8080", "timeout_ms": 500, "query_encoding": "percent" }"#,
/// ).unwrap();
/// assert_eq!(options.base_url.as_deref(), Some("http://localhost:8080"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub query_encoding: QueryEncoding,
    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl ClientOptions {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions { query_encoding: self.query_encoding }
    }

    /// Builds the default request config these options describe.
    pub fn base_config(&self) -> Result<RequestConfig, ClientError> {
        let mut config = RequestConfig::new();
        config.base_url = self.base_url.clone();
        config.timeout = self.timeout_ms.map(Duration::from_millis);

        for (name, value) in &self.headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| ClientError::invalid_header(name, e))?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| ClientError::invalid_header(name, e))?;
            config.headers.insert(header_name, header_value);
        }

        Ok(config)
    }
}
