//! Route handlers.
//!
//! A handler is any `Fn(Arc<S>, Request)` returning a future whose output
//! converts into a [`Response`]. `S` is the router's shared state, so a plain
//! `async fn` can reach the store without capturing anything:
//!
//! ```text
//! async fn create_address(state: Arc<AppState>, req: Request) -> Result<Response, ApiError>
//!        ↓ Router::on(Method::Post, "/address", create_address)
//! Arc<dyn Handler<AppState>>                       ← one per route
//!        ↓ per request
//! handler.call(Arc::clone(&state), req)            ← BoxFuture
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

pub(crate) type BoxedHandler<S> = Arc<dyn Handler<S>>;

/// Something that can answer a request given the router state `S`.
///
/// Implemented for every `Fn(Arc<S>, Request) -> impl Future<Output = impl IntoResponse>`.
/// Handlers that ignore state can stay generic over it:
///
/// ```rust
/// # use std::sync::Arc;
/// # use address_book::{Request, Response};
/// async fn ping<S>(_state: Arc<S>, _req: Request) -> Response {
///     Response::text("pong")
/// }
/// ```
pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture;
}

impl<S, F, Fut, R> Handler<S> for F
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture {
        let fut = self(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
