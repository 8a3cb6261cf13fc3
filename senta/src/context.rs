//! Per-request state handed to every processing unit.
//!
//! A `Context` owns the request and response handles for one request, the
//! parsed URL, the query mapping and the route params. Its writing operations
//! never touch a response that is already complete.
//!
//! ```rust
//! use senta::{Context, HttpRequest, HttpResponse};
//!
//! let mut ctx = Context::new(HttpRequest::get("/search?q=rust&q=senta"), HttpResponse::new()).unwrap();
//! assert_eq!(ctx.pathname, "/search");
//! assert_eq!(ctx.query.get("q").map(String::as_str), Some("senta"));
//!
//! ctx.status(201).set("X-Powered-By", "senta");
//! ctx.send(vec![1, 2, 3].iter().sum::<i32>()).unwrap();
//! assert_eq!(ctx.response.text(), "6");
//! assert_eq!(ctx.response.status(), 201);
//! ```

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::SentaError;
use crate::http_helpers::{HttpRequest, HttpResponse, SendValue, format_float};
use crate::router::{Params, RoutePattern};

/// Diagnostic record of the route pattern that populated `params`
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDiagnostics {
    pub pattern: String,
    pub path: String,
    pub params: Vec<String>,
}

#[derive(Debug)]
pub struct Context {
    pub request: HttpRequest,
    pub response: HttpResponse,
    pub url: Url,
    pub pathname: String,
    /// Query string mapping; the last value wins for repeated keys
    pub query: FxHashMap<String, String>,
    pub params: Params,
    /// Present in debug builds once a route pattern has been applied
    pub dev: Option<RouteDiagnostics>,
}

impl Context {
    /// Parse the request URL once and build the per-request state
    pub fn new(request: HttpRequest, response: HttpResponse) -> Result<Self, SentaError> {
        let url = parse_url(&request)?;
        let pathname = url.path().to_string();
        let query = url.query_pairs().into_owned().collect();

        Ok(Self {
            request,
            response,
            url,
            pathname,
            query,
            params: Params::default(),
            dev: None,
        })
    }

    /// Build a context and populate params from a route pattern
    pub fn with_route(
        request: HttpRequest,
        response: HttpResponse,
        route: &RoutePattern,
    ) -> Result<Self, SentaError> {
        let mut ctx = Self::new(request, response)?;
        ctx.apply_route(route)?;
        Ok(ctx)
    }

    /// Replace `params` with the captures of `route` against this request's path
    pub fn apply_route(&mut self, route: &RoutePattern) -> Result<(), SentaError> {
        self.params = route.extract(&self.pathname)?;

        if cfg!(debug_assertions) {
            self.dev = Some(RouteDiagnostics {
                pattern: route.pattern().as_str().to_string(),
                path: route.path().to_string(),
                params: route.params().to_vec(),
            });
        }

        Ok(())
    }

    /// Value of a route param, `None` when missing or absent
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(|value| value.as_deref())
    }

    /// Deserialize the query string into a typed struct
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, SentaError> {
        Ok(serde_urlencoded::from_str(self.url.query().unwrap_or(""))?)
    }

    /// Request header by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    pub fn is_finished(&self) -> bool {
        self.response.is_finished()
    }

    pub fn send(&mut self, value: impl Into<SendValue>) -> Result<(), SentaError> {
        self.send_with_status(value, None)
    }

    /// Normalize `value` and complete the response with it.
    ///
    /// A no-op once the response is complete. Sending [`SendValue::Absent`]
    /// leaves the response open and returns [`SentaError::AbsentBody`].
    pub fn send_with_status(
        &mut self,
        value: impl Into<SendValue>,
        status: Option<u16>,
    ) -> Result<(), SentaError> {
        if self.response.is_finished() {
            return Ok(());
        }

        if let Some(status) = status {
            self.response.set_status(status);
        }

        let body = match value.into() {
            SendValue::Envelope(envelope) => {
                self.headers(envelope.headers().iter().cloned());
                return self.send(envelope.format());
            }
            SendValue::Text(text) => text.into_bytes(),
            SendValue::Integer(number) => number.to_string().into_bytes(),
            SendValue::Float(number) => format_float(number).into_bytes(),
            SendValue::Bool(flag) => flag.to_string().into_bytes(),
            SendValue::Bytes(bytes) => bytes,
            SendValue::Structured(value) => serde_json::to_vec(&value)?,
            SendValue::Absent => {
                tracing::warn!(
                    path = %self.pathname,
                    "absent value is not a valid response body"
                );
                return Err(SentaError::AbsentBody);
            }
        };

        self.response.end(body);
        Ok(())
    }

    pub fn html(&mut self, body: impl Into<String>) -> Result<(), SentaError> {
        let body: String = body.into();
        self.response.set_header("Content-Type", "text/html");
        self.send(body)
    }

    pub fn json<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<(), SentaError> {
        let value = SendValue::json(body)?;
        self.response.set_header("Content-Type", "application/json");
        self.send(value)
    }

    pub fn text(&mut self, body: impl Into<String>) -> Result<(), SentaError> {
        let body: String = body.into();
        self.response.set_header("Content-Type", "text/plain");
        self.send(body)
    }

    pub fn redirect(&mut self, url: &str) {
        self.redirect_with_status(url, 302);
    }

    /// Set Location and status, then complete the response with an empty body
    pub fn redirect_with_status(&mut self, url: &str, status: u16) {
        if self.response.is_finished() {
            return;
        }
        self.response.set_header("Location", url);
        self.response.set_status(status);
        self.response.end(Vec::new());
    }

    /// Set a single response header
    ///
    /// ```rust
    /// # use senta::{Context, HttpRequest, HttpResponse};
    /// # let mut ctx = Context::new(HttpRequest::get("/"), HttpResponse::new()).unwrap();
    /// ctx.set("Content-Type", "text/plain").set("Cache-Control", "no-store");
    /// ```
    pub fn set(&mut self, field: &str, value: &str) -> &mut Self {
        self.response.set_header(field, value);
        self
    }

    /// Set every entry of a header mapping
    pub fn headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in headers {
            self.response.set_header(key, value);
        }
    }

    pub fn status(&mut self, status: u16) -> &mut Self {
        self.response.set_status(status);
        self
    }

    /// Hand the response handle back to the listener
    pub fn into_response(self) -> HttpResponse {
        self.response
    }
}

fn parse_url(request: &HttpRequest) -> Result<Url, SentaError> {
    let invalid = |source| SentaError::InvalidUrl {
        url: request.uri.clone(),
        source,
    };

    let base = Url::parse(&format!("http://{}", request.host())).map_err(invalid)?;
    base.join(&request.uri).map_err(invalid)
}
