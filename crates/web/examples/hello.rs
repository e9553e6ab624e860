//! Serves a small api with an in-process app and calls it through the typed client.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Response};
use micro_route::{ApiSchema, Route, route};
use micro_route_client::{ClientError, RequestConfig, Transport, TransportError, TypedClient, TypedResponse};
use micro_route_web::{App, MiddlewareArg, Next, TypedRequest, TypedRouter, middleware_fn, server};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug)]
pub struct HelloApi;
impl ApiSchema for HelloApi {}

#[derive(Serialize, Deserialize, Debug)]
pub struct Greeting {
    greeting: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NameBody {
    name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NameParams {
    name: String,
}

route! {
    pub struct HelloGet => Get "/hello" for HelloApi {
        response: Greeting,
    }
}

route! {
    pub struct HelloPost => Post "/hello" for HelloApi {
        body: Option<NameBody>,
        response: Greeting,
    }
}

route! {
    pub struct HelloNamePost => Post "/hello/:name" for HelloApi {
        params: NameParams,
        response: Greeting,
    }
}

struct InProcess {
    app: Arc<App>,
}

#[async_trait]
impl Transport for InProcess {
    async fn request(&self, config: RequestConfig) -> Result<Response<Bytes>, TransportError> {
        let url = config.full_url().ok_or("request has no url")?;
        let mut builder = http::Request::builder().method(config.method.unwrap_or(Method::GET)).uri(url);
        for (name, value) in &config.headers {
            builder = builder.header(name, value);
        }
        self.app.dispatch(builder.body(config.body.unwrap_or_default())?).await
    }
}

fn hello(name: &str) -> Greeting {
    Greeting { greeting: format!("Hello {name}!") }
}

fn router() -> TypedRouter<HelloApi> {
    let access_log = middleware_fn(|req: http::Request<Bytes>, next: Next| async move {
        info!(method = %req.method(), uri = %req.uri(), "request");
        next.run(req).await
    });

    let mut router: TypedRouter<HelloApi> = server(App::new());
    router
        .get(|_req: TypedRequest<HelloGet>| async { Ok(hello("World")) }, vec![])
        .unwrap()
        .post(
            |req: TypedRequest<HelloPost>| async move {
                let body = req.body()?;
                Ok(hello(body.as_ref().map_or("World", |body| body.name.as_str())))
            },
            vec![MiddlewareArg::one(access_log)],
        )
        .unwrap()
        .post(
            |req: TypedRequest<HelloNamePost>| async move {
                let params = req.params()?;
                Ok(hello(&params.name))
            },
            vec![],
        )
        .unwrap();
    router
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let client = TypedClient::<HelloApi, _>::new(InProcess { app: Arc::new(router().into_inner()) });

    report(client.get_route(micro_route_client::TypedRequest::<HelloGet>::new((), (), ())).await);
    report(client.post_route(micro_route_client::TypedRequest::<HelloPost>::new((), (), None)).await);

    let body = Some(NameBody { name: "Jane".into() });
    report(client.post_route(micro_route_client::TypedRequest::<HelloPost>::new((), (), body)).await);

    let params = NameParams { name: "brave new World".into() };
    report(client.post_route(micro_route_client::TypedRequest::<HelloNamePost>::new(params, (), ())).await);
}

fn report<R: Route<Response = Greeting>>(result: Result<TypedResponse<R>, ClientError>) {
    match result.and_then(|response| response.data()) {
        Ok(greeting) => info!(path = R::PATH, greeting = %greeting.greeting, "received"),
        Err(e) => error!(path = R::PATH, cause = %e, "call failed"),
    }
}
