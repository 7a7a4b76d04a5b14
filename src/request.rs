//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a request body could not be buffered.
#[derive(Debug)]
pub(crate) enum BodyError {
    TooLarge,
    Read(BoxError),
}

impl From<BoxError> for BodyError {
    fn from(e: BoxError) -> Self {
        if e.is::<LengthLimitError>() { Self::TooLarge } else { Self::Read(e) }
    }
}

/// An incoming HTTP request with its body fully buffered.
///
/// Bodies are small JSON documents, so handlers get the whole thing as one
/// contiguous slice rather than a stream.
#[derive(Debug)]
pub struct Request {
    method: http::Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Buffers `req`'s body, up to [`MAX_BODY_BYTES`]. Path parameters are
    /// filled in after routing.
    pub(crate) async fn from_http<B>(req: http::Request<B>, limit: usize) -> Result<Self, BodyError>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let body = Limited::new(body, limit).collect().await?.to_bytes();
        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers: parts.headers,
            body,
            params: HashMap::new(),
        })
    }

    pub fn method(&self) -> &str { self.method.as_str() }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII read
    /// as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/address/{id}`, `req.param("id")` on `/address/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
