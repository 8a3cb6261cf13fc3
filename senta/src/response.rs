//! Typed, declarative response bodies.
//!
//! ```rust
//! use senta::ResponseEnvelope;
//! use serde_json::json;
//!
//! let response = ResponseEnvelope::new("json", json!({ "id": 10 })).unwrap();
//! assert_eq!(response.format(), r#"{"id":10}"#);
//! assert_eq!(response.header("Content-Type"), Some("application/json"));
//!
//! assert!(ResponseEnvelope::new("xml", json!("<a/>")).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::SentaError;

/// The closed set of envelope content categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    Json,
    Plain,
    Text,
    Html,
    Css,
    Javascript,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Json => "json",
            ResponseType::Plain => "plain",
            ResponseType::Text => "text",
            ResponseType::Html => "html",
            ResponseType::Css => "css",
            ResponseType::Javascript => "javascript",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ResponseType::Json => "application/json",
            ResponseType::Plain | ResponseType::Text => "text/plain",
            ResponseType::Html => "text/html",
            ResponseType::Css => "text/css",
            ResponseType::Javascript => "text/javascript",
        }
    }
}

impl FromStr for ResponseType {
    type Err = SentaError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "json" => Ok(ResponseType::Json),
            "plain" => Ok(ResponseType::Plain),
            "text" => Ok(ResponseType::Text),
            "html" => Ok(ResponseType::Html),
            "css" => Ok(ResponseType::Css),
            "javascript" => Ok(ResponseType::Javascript),
            other => Err(SentaError::InvalidResponseType(other.to_string())),
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    response_type: ResponseType,
    body: Value,
    headers: Vec<(String, String)>,
}

impl ResponseEnvelope {
    /// Build an envelope from a raw type tag, failing for tags outside the set
    pub fn new(type_tag: &str, body: impl Into<Value>) -> Result<Self, SentaError> {
        Ok(Self::typed(type_tag.parse()?, body))
    }

    pub fn typed(response_type: ResponseType, body: impl Into<Value>) -> Self {
        Self {
            response_type,
            body: body.into(),
            headers: vec![("Content-Type".to_string(), response_type.mime().to_string())],
        }
    }

    pub fn json<T: Serialize + ?Sized>(body: &T) -> Result<Self, SentaError> {
        Ok(Self::typed(ResponseType::Json, serde_json::to_value(body)?))
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::typed(ResponseType::Text, body.into())
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::typed(ResponseType::Html, body.into())
    }

    /// Add a header. The Content-Type derived from the type tag always wins.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if !name.eq_ignore_ascii_case("content-type") {
            self.headers.push((name, value.into()));
        }
        self
    }

    pub fn with_headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |envelope, (k, v)| envelope.with_header(k, v))
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serialize the body: JSON text for `json`, the plain string form otherwise
    pub fn format(&self) -> String {
        match (self.response_type, &self.body) {
            (ResponseType::Json, body) => body.to_string(),
            (_, Value::String(text)) => text.clone(),
            (_, Value::Null) => String::new(),
            (_, other) => other.to_string(),
        }
    }
}
