use crate::config::{ClientOptions, RequestConfig};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::typed::{TypedRequest, TypedResponse, form_body, json_body};
use bytes::Bytes;
use http::{Method, Response};
use micro_route::method::{Delete, Get, Head, Options, Patch, Post, Put};
use micro_route::{ApiSchema, ResolveOptions, Route, resolve};
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Http client for the api `A`, sending through the transport `T`.
///
/// Every entry point funnels into [`request`](TypedClient::request), which resolves the url
/// before delegating to the transport:
/// 1. if `params` is set, placeholders of the url are substituted and `params` is replaced by
///    the unconsumed parameters
/// 2. if `query` is set and not empty, it is serialized and appended to the url
///
/// A missing path parameter fails the call before the transport is involved. Anything the
/// transport returns, success or error, is passed back unchanged.
pub struct TypedClient<A, T> {
    transport: T,
    defaults: RequestConfig,
    options: ResolveOptions,
    _api: PhantomData<fn() -> A>,
}

macro_rules! url_config_method {
    ($method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Sends a ", stringify!($upper_case_method), " request to `url`.")]
        pub async fn $method(
            &self,
            url: impl Into<String>,
            config: RequestConfig,
        ) -> Result<Response<Bytes>, ClientError> {
            self.request(config.with_url(url).with_method(Method::$upper_case_method)).await
        }
    };
}

macro_rules! url_data_config_method {
    ($method:ident, $form_method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Sends a ", stringify!($upper_case_method), " request to `url` with `data` as json body.")]
        pub async fn $method<D: Serialize + ?Sized>(
            &self,
            url: impl Into<String>,
            data: &D,
            config: RequestConfig,
        ) -> Result<Response<Bytes>, ClientError> {
            let config = json_body(config, data)?;
            self.request(config.with_url(url).with_method(Method::$upper_case_method)).await
        }

        #[doc = concat!("Sends a ", stringify!($upper_case_method), " request to `url` with `data` as form body.")]
        pub async fn $form_method<D: Serialize + ?Sized>(
            &self,
            url: impl Into<String>,
            data: &D,
            config: RequestConfig,
        ) -> Result<Response<Bytes>, ClientError> {
            let config = form_body(config, data)?;
            self.request(config.with_url(url).with_method(Method::$upper_case_method)).await
        }
    };
}

macro_rules! route_method {
    ($method:ident, $marker:ident) => {
        #[doc = concat!("Sends a request on a `", stringify!($marker), "` route of the api.")]
        pub async fn $method<R>(&self, request: TypedRequest<R>) -> Result<TypedResponse<R>, ClientError>
        where
            R: Route<Api = A, Method = $marker>,
        {
            self.call(request).await
        }
    };
}

impl<A: ApiSchema, T: Transport> TypedClient<A, T> {
    pub fn new(transport: T) -> Self {
        Self::instance(transport, RequestConfig::new(), ResolveOptions::default())
    }

    /// Creates a client whose defaults come from `options`.
    pub fn with_options(transport: T, options: &ClientOptions) -> Result<Self, ClientError> {
        Ok(Self::instance(transport, options.base_config()?, options.resolve_options()))
    }

    // every client, including the ones from `create`, is built here
    fn instance(transport: T, defaults: RequestConfig, options: ResolveOptions) -> Self {
        Self { transport, defaults, options, _api: PhantomData }
    }

    /// Creates an independent client sharing this one's transport, with `base` merged over this
    /// client's defaults.
    pub fn create(&self, base: RequestConfig) -> Self
    where
        T: Clone,
    {
        Self::instance(self.transport.clone(), self.defaults.merged_with(base), self.options)
    }

    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    pub fn resolve_options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `config` after resolving its url.
    pub async fn request(&self, config: RequestConfig) -> Result<Response<Bytes>, ClientError> {
        let config = self.intercept(config)?;
        self.transport.request(config).await.map_err(ClientError::transport)
    }

    fn intercept(&self, config: RequestConfig) -> Result<RequestConfig, ClientError> {
        let mut config = self.defaults.merged_with(config);
        let url = config.url.take().unwrap_or_default();
        let query = config.query.take();

        let resolved = resolve(&url, config.params.as_ref(), query.as_ref(), &self.options)?;
        debug!(method = ?config.method, url = %resolved.url, "sending request");

        config.url = Some(resolved.url);
        config.params = resolved.params;
        Ok(config)
    }

    url_config_method!(get, GET);
    url_config_method!(delete, DELETE);
    url_config_method!(head, HEAD);
    url_config_method!(options, OPTIONS);

    url_data_config_method!(post, post_form, POST);
    url_data_config_method!(put, put_form, PUT);
    url_data_config_method!(patch, patch_form, PATCH);

    /// Sends a request on any route of the api.
    pub async fn call<R>(&self, request: TypedRequest<R>) -> Result<TypedResponse<R>, ClientError>
    where
        R: Route<Api = A>,
    {
        let config = request.into_config()?;
        let response = self.request(config).await?;
        Ok(TypedResponse::new(response))
    }

    route_method!(get_route, Get);
    route_method!(post_route, Post);
    route_method!(put_route, Put);
    route_method!(patch_route, Patch);
    route_method!(delete_route, Delete);
    route_method!(head_route, Head);
    route_method!(options_route, Options);
}

impl<A, T: Clone> Clone for TypedClient<A, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            defaults: self.defaults.clone(),
            options: self.options,
            _api: PhantomData,
        }
    }
}

impl<A, T> fmt::Debug for TypedClient<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedClient")
            .field("defaults", &self.defaults)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use micro_route::RouteError;
    use std::io;

    struct TestApi;
    impl ApiSchema for TestApi {}

    #[tokio::test]
    async fn test_transport_error_is_returned_unchanged() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into()));

        let client = TypedClient::<TestApi, _>::new(transport);
        let error = client.get("/hello", RequestConfig::new()).await.unwrap_err();

        let source = error.into_transport_error().unwrap();
        let io_error = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_error.kind(), io::ErrorKind::ConnectionRefused);
    }

    #[tokio::test]
    async fn test_missing_param_never_reaches_transport() {
        let mut transport = MockTransport::new();
        transport.expect_request().never();

        let client = TypedClient::<TestApi, _>::new(transport);
        let config = RequestConfig::new().with_param("x", "1");
        let error = client.delete("/a/:x/:y", config).await.unwrap_err();

        assert!(matches!(error, ClientError::Route { source } if source == RouteError::missing_path_parameter("y")));
    }

    #[tokio::test]
    async fn test_response_is_returned_unchanged() {
        let mut transport = MockTransport::new();
        transport.expect_request().withf(|config| config.url.as_deref() == Some("/teapot")).returning(|_| {
            let mut response = Response::new(Bytes::from_static(b"short and stout"));
            *response.status_mut() = http::StatusCode::IM_A_TEAPOT;
            Ok(response)
        });

        let client = TypedClient::<TestApi, _>::new(transport);
        let response = client.post("/teapot", &(), RequestConfig::new()).await.unwrap();

        assert_eq!(response.status(), http::StatusCode::IM_A_TEAPOT);
        assert_eq!(response.body().as_ref(), b"short and stout");
    }
}
