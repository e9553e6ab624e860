use crate::config::RequestConfig;
use async_trait::async_trait;
use bytes::Bytes;
use http::Response;
use std::error::Error;
use std::sync::Arc;

pub type TransportError = Box<dyn Error + Send + Sync>;

/// The component that actually performs http requests.
///
/// It receives a [`RequestConfig`] whose url is already resolved and whose `params` holds only the
/// parameters the path template did not consume; how those leftovers are sent is up to the
/// transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, config: RequestConfig) -> Result<Response<Bytes>, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, config: RequestConfig) -> Result<Response<Bytes>, TransportError> {
        (**self).request(config).await
    }
}
