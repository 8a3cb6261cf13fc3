//! Outbound-call capability used by `App::fetch`.
//!
//! The toolkit never performs HTTP calls on its own: a [`Fetch`] implementation
//! is injected through `SentaConfig::fetch`. With the `reqwest` feature enabled,
//! [`ReqwestFetch`] provides one backed by a `reqwest::Client`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::BoxError;

/// Request options for a fetch call
#[derive(Debug, Clone, Default)]
pub struct FetchInit {
    /// Defaults to `GET`
    pub method: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl FetchInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Buffered response of a fetch call
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str, init: FetchInit) -> Result<FetchResponse, BoxError>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_fetch::ReqwestFetch;

#[cfg(feature = "reqwest")]
mod reqwest_fetch {
    use super::*;

    /// [`Fetch`] backed by a shared `reqwest::Client`
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestFetch {
        client: reqwest::Client,
    }

    impl ReqwestFetch {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl Fetch for ReqwestFetch {
        async fn fetch(&self, url: &str, init: FetchInit) -> Result<FetchResponse, BoxError> {
            let method = match init.method.as_deref() {
                Some(method) => reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes())?,
                None => reqwest::Method::GET,
            };

            let mut request = self.client.request(method, url);
            for (name, value) in init.headers {
                request = request.header(name, value);
            }
            if let Some(body) = init.body {
                request = request.body(body);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            Ok(FetchResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_response_accessors() {
        let response = FetchResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: br#"{"id":10}"#.to_vec(),
        };

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.text(), r#"{"id":10}"#);
        assert_eq!(response.json::<Value>().unwrap()["id"], 10);
    }

    #[test]
    fn test_init_builder() {
        let init = FetchInit::new()
            .method("POST")
            .header("Accept", "text/plain")
            .body("hi");

        assert_eq!(init.method.as_deref(), Some("POST"));
        assert_eq!(init.headers.len(), 1);
        assert_eq!(init.body.as_deref(), Some(&b"hi"[..]));
    }
}
