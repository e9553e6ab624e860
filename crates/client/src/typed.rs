//! Route typed requests and responses.

use crate::config::RequestConfig;
use crate::error::ClientError;
use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use micro_route::{ParamMap, PathTemplate, Route, to_param_map};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// A request on route `R`, carrying the shapes the route declares.
pub struct TypedRequest<R: Route> {
    pub params: R::Params,
    pub query: R::Query,
    pub body: R::Body,
    /// Extra transport options; its url and method are overridden by the route
    pub config: RequestConfig,
}

impl<R: Route> TypedRequest<R> {
    pub fn new(params: R::Params, query: R::Query, body: R::Body) -> Self {
        Self { params, query, body, config: RequestConfig::new() }
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn into_config(self) -> Result<RequestConfig, ClientError> {
        let mut config = self.config.with_url(R::PATH).with_method(R::method());

        config.params = to_param_map("params", &self.params)?;
        if config.params.is_none() && PathTemplate::parse(R::PATH).has_placeholders() {
            // still substitute, so the missing placeholder is reported before anything is sent
            config.params = Some(ParamMap::new());
        }
        config.query = to_param_map("query", &self.query)?;

        json_body(config, &self.body)
    }
}

impl<R> Default for TypedRequest<R>
where
    R: Route,
    R::Params: Default,
    R::Query: Default,
    R::Body: Default,
{
    fn default() -> Self {
        Self::new(R::Params::default(), R::Query::default(), R::Body::default())
    }
}

impl<R: Route> fmt::Debug for TypedRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRequest").field("path", &R::PATH).field("config", &self.config).finish_non_exhaustive()
    }
}

/// The transport's response to a request on route `R`.
///
/// The underlying response is kept as received; [`data`](TypedResponse::data) decodes the body as
/// the route's response shape.
pub struct TypedResponse<R> {
    response: Response<Bytes>,
    _route: PhantomData<fn() -> R>,
}

impl<R: Route> TypedResponse<R> {
    pub(crate) fn new(response: Response<Bytes>) -> Self {
        Self { response, _route: PhantomData }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    pub fn response(&self) -> &Response<Bytes> {
        &self.response
    }

    pub fn into_inner(self) -> Response<Bytes> {
        self.response
    }

    /// Decodes the body as json. An empty body decodes as `null`.
    pub fn data(&self) -> Result<R::Response, ClientError> {
        let body = self.response.body();
        let bytes: &[u8] = if body.is_empty() { b"null" } else { body };
        serde_json::from_slice(bytes).map_err(ClientError::decode)
    }
}

impl<R: Route> fmt::Debug for TypedResponse<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedResponse").field("path", &R::PATH).field("response", &self.response).finish()
    }
}

/// Encodes `data` as the json body of `config`; data serializing to `null` leaves the body unset.
pub(crate) fn json_body<D: Serialize + ?Sized>(config: RequestConfig, data: &D) -> Result<RequestConfig, ClientError> {
    match serde_json::to_value(data).map_err(ClientError::encode_json)? {
        Value::Null => Ok(config),
        value => {
            let bytes = serde_json::to_vec(&value).map_err(ClientError::encode_json)?;
            config.with_typed_body(bytes, &mime::APPLICATION_JSON)
        }
    }
}

/// Encodes `data` as an `application/x-www-form-urlencoded` body of `config`.
pub(crate) fn form_body<D: Serialize + ?Sized>(config: RequestConfig, data: &D) -> Result<RequestConfig, ClientError> {
    let encoded = serde_urlencoded::to_string(data)?;
    config.with_typed_body(encoded, &mime::APPLICATION_WWW_FORM_URLENCODED)
}
