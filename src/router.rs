//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup, plus an ordered list of
//! [`Middleware`] wrapped around every request. The router owns the shared
//! state `S` and hands each handler an `Arc<S>`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use matchit::Router as MatchitRouter;
use tracing::{info, warn};

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::{BodyError, BoxError, MAX_BODY_BYTES, Request};
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain.
pub struct Router<S = ()> {
    state: Arc<S>,
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    middleware: Vec<Arc<dyn Middleware>>,
    body_limit: usize,
}

impl Router<()> {
    /// A router without shared state.
    pub fn new() -> Self {
        Self::with_state(Arc::new(()))
    }
}

impl Default for Router<()> {
    fn default() -> Self { Self::new() }
}

impl<S: Send + Sync + 'static> Router<S> {
    /// A router whose handlers all receive a clone of `state`.
    pub fn with_state(state: Arc<S>) -> Self {
        Self {
            state,
            routes: HashMap::new(),
            middleware: Vec::new(),
            body_limit: MAX_BODY_BYTES,
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use address_book::{Method, Request, Response, Router};
    /// # async fn list(_: Arc<()>, _: Request) -> Response { Response::text("") }
    /// # async fn remove(_: Arc<()>, _: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,    "/address",      list)
    ///     .on(Method::Delete, "/address/{id}", remove);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_insert_with(MatchitRouter::new)
            .insert(path, Arc::new(handler) as BoxedHandler<S>)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append a middleware. See [`Middleware`] for ordering.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Largest request body buffered before answering `413`.
    /// Defaults to [`MAX_BODY_BYTES`].
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Runs one request through middleware and routing.
    ///
    /// Never fails: oversized bodies become `413`, unreadable ones `400`,
    /// unknown methods `405`, unknown paths `404`. Emits one access-log line
    /// per call.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        let mut response = match Request::from_http(req, self.body_limit).await {
            Ok(request) => self.route(request).await,
            Err(BodyError::TooLarge) => {
                warn!(%method, %path, limit = self.body_limit, "request body too large");
                Response::status(Status::ContentTooLarge)
            }
            Err(BodyError::Read(e)) => {
                warn!(%method, %path, "failed to read request body: {e}");
                Response::status(Status::BadRequest)
            }
        };

        for mw in self.middleware.iter().rev() {
            mw.after(&mut response);
        }

        info!(
            %method,
            %path,
            status = response.status_code(),
            bytes = response.body().len(),
            latency_us = started.elapsed().as_micros() as u64,
            "request",
        );
        response.into_http()
    }

    async fn route(&self, mut request: Request) -> Response {
        if let Some(early) = self.middleware.iter().find_map(|mw| mw.before(&request)) {
            return early;
        }

        let Ok(method) = request.method().parse::<Method>() else {
            return Response::status(Status::MethodNotAllowed);
        };

        match self.lookup(method, request.path()) {
            Some((handler, params)) => {
                request.params = params;
                handler.call(Arc::clone(&self.state), request).await
            }
            None => Response::status(Status::NotFound),
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http_body_util::BodyExt;

    use super::*;

    async fn echo_id(_state: Arc<()>, req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    async fn body_len(_state: Arc<()>, req: Request) -> String {
        req.body().len().to_string()
    }

    async fn count(state: Arc<AtomicUsize>, _req: Request) -> String {
        (state.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn get(path: &str) -> http::Request<Full<Bytes>> {
        http::Request::get(path).body(Full::new(Bytes::new())).unwrap()
    }

    fn post(path: &str, body: Vec<u8>) -> http::Request<Full<Bytes>> {
        http::Request::post(path).body(Full::new(Bytes::from(body))).unwrap()
    }

    async fn body_text(res: http::Response<Full<Bytes>>) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    struct Tag;

    impl Middleware for Tag {
        fn after(&self, res: &mut Response) {
            res.set_header("x-tag", "1");
        }
    }

    #[tokio::test]
    async fn routes_by_method_and_extracts_params() {
        let router = Router::new().on(Method::Get, "/things/{id}", echo_id);

        let res = router.handle(get("/things/42")).await;
        assert_eq!(res.status(), http::StatusCode::OK);
        assert_eq!(body_text(res).await, "42");

        let res = router.handle(get("/things")).await;
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);

        let res = router.handle(post("/things/42", Vec::new())).await;
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn handlers_share_the_router_state() {
        let router = Router::with_state(Arc::new(AtomicUsize::new(0)))
            .on(Method::Get, "/count", count);

        router.handle(get("/count")).await;
        assert_eq!(body_text(router.handle(get("/count")).await).await, "2");
    }

    #[tokio::test]
    async fn unknown_method_is_405() {
        let router = Router::new().on(Method::Get, "/", echo_id);
        let req = http::Request::builder()
            .method("PURGE")
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert_eq!(router.handle(req).await.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn after_hooks_see_unrouted_responses() {
        let router = Router::new().layer(Tag);
        let res = router.handle(get("/missing")).await;
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(res.headers()["x-tag"], "1");
    }

    #[tokio::test]
    async fn oversized_body_is_413_and_never_reaches_the_handler() {
        let router = Router::new().on(Method::Post, "/echo", body_len).layer(Tag);

        let res = router.handle(post("/echo", vec![b'a'; MAX_BODY_BYTES + 1])).await;
        assert_eq!(res.status(), http::StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(res.headers()["x-tag"], "1");
        assert!(body_text(res).await.is_empty());

        let res = router.handle(post("/echo", vec![b'a'; MAX_BODY_BYTES])).await;
        assert_eq!(res.status(), http::StatusCode::OK);
        assert_eq!(body_text(res).await, MAX_BODY_BYTES.to_string());
    }

    #[tokio::test]
    async fn body_limit_is_configurable() {
        let router = Router::new().on(Method::Post, "/echo", body_len).body_limit(4);
        let res = router.handle(post("/echo", b"hello".to_vec())).await;
        assert_eq!(res.status(), http::StatusCode::PAYLOAD_TOO_LARGE);
    }
}
