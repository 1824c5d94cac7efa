//! Request and response values seen by the cache controller.
//!
//! A [`Response`] body can be read exactly once. Anything that wants to both
//! return a response and store it must call [`Response::try_clone`] first.

use bytes::Bytes;
use http::{header::AsHeaderName, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("response body already consumed")]
    AlreadyConsumed,

    #[error("response body is not valid UTF-8")]
    NotUtf8,
}

// == Request ==
/// An outgoing request from a page client.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Fragments never reach the network, so they are dropped here.
    pub fn new(method: Method, mut url: Url) -> Self {
        url.set_fragment(None);
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Parses `url` and builds a GET request.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::get(Url::parse(url)?))
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Only GET responses may be stored or served from a cache generation.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::GET
    }

    /// Key under which a response to this request is stored.
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}

// == Response ==
/// How the response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Ordinary same-origin response
    Basic,
    /// Network-level failure surfaced as a response
    Error,
}

/// Immutable copy of a response as held inside a cache generation.
#[derive(Debug, Clone)]
pub(crate) struct StoredResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Bytes,
}

impl StoredResponse {
    /// Materializes a fresh, unread response.
    pub(crate) fn to_response(&self) -> Response {
        Response {
            status: self.status,
            headers: self.headers.clone(),
            body: Some(self.body.clone()),
        }
    }
}

#[derive(Debug)]
pub struct Response {
    /// `None` for a network-error response
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::from_parts(status, HeaderMap::new(), body)
    }

    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status: Some(status),
            headers,
            body: Some(body.into()),
        }
    }

    /// A network-error response: no status, empty body.
    pub fn error() -> Self {
        Self {
            status: None,
            headers: HeaderMap::new(),
            body: Some(Bytes::new()),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn kind(&self) -> ResponseKind {
        match self.status {
            Some(_) => ResponseKind::Basic,
            None => ResponseKind::Error,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// 2xx status.
    pub fn is_ok(&self) -> bool {
        self.status.is_some_and(|s| s.is_success())
    }

    /// Whether a static-asset fetch may be stored: exactly 200 and not an error.
    pub fn is_cacheable(&self) -> bool {
        self.status == Some(StatusCode::OK)
    }

    pub fn body_used(&self) -> bool {
        self.body.is_none()
    }

    /// Duplicates this response into an independent, unread copy.
    pub fn try_clone(&self) -> Result<Response, BodyError> {
        let body = self.body.clone().ok_or(BodyError::AlreadyConsumed)?;
        Ok(Self {
            status: self.status,
            headers: self.headers.clone(),
            body: Some(body),
        })
    }

    /// Reads the body. A second read fails.
    pub fn bytes(&mut self) -> Result<Bytes, BodyError> {
        self.body.take().ok_or(BodyError::AlreadyConsumed)
    }

    pub fn text(&mut self) -> Result<String, BodyError> {
        let bytes = self.bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| BodyError::NotUtf8)
    }

    /// Consumes the response into its stored form.
    pub(crate) fn into_stored(mut self) -> Result<StoredResponse, BodyError> {
        let body = self.bytes()?;
        Ok(StoredResponse {
            status: self.status,
            headers: self.headers,
            body,
        })
    }
}
