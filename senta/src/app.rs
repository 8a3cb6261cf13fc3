//! The application: middleware registration, the per-request entry point,
//! listening and the injected fetch capability.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use senta::{BoxError, ResponseEnvelope, page, senta};
//!
//! # async fn run() -> Result<(), senta::SentaError> {
//! let mut app = senta();
//! app.use_middleware(page(|_ctx| {
//!     Box::pin(async move { Ok::<_, BoxError>(Some(ResponseEnvelope::text("Hello World!"))) })
//! }));
//!
//! let server = Arc::new(app).listen().await?;
//! println!("listening on {}", server.local_addr());
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::adapter::{AxumAdapter, HttpAdapter};
use crate::config::SentaConfig;
use crate::context::Context;
use crate::error::SentaError;
use crate::fetch::{FetchInit, FetchResponse};
use crate::http_helpers::{HttpRequest, HttpResponse};
use crate::middleware::{IntoMiddlewareList, MiddlewareChain};

const LOCALHOST: &str = "http://localhost/";

pub struct App {
    config: SentaConfig,
    middlewares: MiddlewareChain,
    local_addr: OnceLock<SocketAddr>,
}

impl App {
    pub fn new(config: SentaConfig) -> Self {
        Self {
            config,
            middlewares: MiddlewareChain::new(),
            local_addr: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &SentaConfig {
        &self.config
    }

    pub fn middlewares(&self) -> &MiddlewareChain {
        &self.middlewares
    }

    /// Append one unit or an ordered list of units to the chain
    pub fn use_middleware(&mut self, units: impl IntoMiddlewareList) -> &mut Self {
        for unit in units.into_middleware_list() {
            self.middlewares.use_middleware(unit);
        }
        self
    }

    /// Run one request through the chain and return the response handle.
    ///
    /// The returned response is left incomplete when no unit answered; the
    /// listener decides how to finish it.
    pub async fn handle_request(&self, request: HttpRequest) -> HttpResponse {
        let method = request.method.clone();
        let mut ctx = match Context::new(request, HttpResponse::new()) {
            Ok(ctx) => ctx,
            Err(err) => {
                tracing::warn!(error = %err, "rejecting request");
                let mut response = HttpResponse::new();
                fail(&mut response, 400, "Bad Request");
                return response;
            }
        };

        tracing::debug!(%method, path = %ctx.pathname, "request");

        if let Err(err) = self.middlewares.dispatch(&mut ctx).await {
            tracing::error!(%method, path = %ctx.pathname, error = %err, "unhandled error in middleware chain");
            fail(&mut ctx.response, 500, "Internal Server Error");
        }

        ctx.into_response()
    }

    /// Bind the configured address and start serving in the background
    pub async fn listen(self: Arc<Self>) -> Result<ServerHandle, SentaError> {
        if let Some(addr) = self.local_addr.get() {
            return Err(SentaError::AlreadyListening(*addr));
        }

        let listener = TcpListener::bind(self.config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        self.local_addr
            .set(local_addr)
            .map_err(SentaError::AlreadyListening)?;

        let adapter: Arc<dyn HttpAdapter> = match &self.config.create_server {
            Some(adapter) => adapter.clone(),
            None => Arc::new(AxumAdapter::new()),
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let shutdown = Box::pin(async move {
            let _ = shutdown_rx.await;
        });

        tracing::info!(address = %local_addr, "listening");

        let app = self.clone();
        let task = tokio::spawn(async move {
            if let Err(err) = adapter.serve(listener, app, shutdown).await {
                tracing::error!(error = %err, "server stopped with an error");
            }
        });

        Ok(ServerHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }

    /// Address the listener is bound to, once `listen` succeeded
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// Perform an outbound call with the injected fetch capability.
    ///
    /// `http://localhost/...` is rewritten to the port this App listens on.
    pub async fn fetch(&self, url: &str, init: FetchInit) -> Result<FetchResponse, SentaError> {
        let fetch = self
            .config
            .fetch
            .as_ref()
            .ok_or(SentaError::FetchUnavailable)?;

        let url = match url.strip_prefix(LOCALHOST) {
            Some(rest) => {
                let addr = self.local_addr().ok_or(SentaError::NotListening)?;
                format!("http://localhost:{}/{rest}", addr.port())
            }
            None => url.to_string(),
        };

        tracing::debug!(%url, "fetch");
        fetch.fetch(&url, init).await.map_err(SentaError::Fetch)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(SentaConfig::default())
    }
}

/// Create an App with the default configuration
pub fn senta() -> App {
    App::default()
}

/// Handle to a running listener
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(self) -> Result<(), SentaError> {
        let _ = self.shutdown.send(());
        self.task.await.map_err(std::io::Error::other)?;
        tracing::info!(address = %self.local_addr, "server stopped");
        Ok(())
    }
}

fn fail(response: &mut HttpResponse, status: u16, message: &str) {
    if response.is_finished() {
        return;
    }
    response.set_status(status);
    response.set_header("Content-Type", "text/plain");
    response.end(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::fetch::Fetch;
    use crate::middleware::{Middleware, middleware_fn, page};
    use crate::response::ResponseEnvelope;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_handle_request_runs_chain() {
        let mut app = senta();
        app.use_middleware(middleware_fn(|ctx, _next| {
            Box::pin(async move {
                ctx.json(&json!({ "id": 10 }))?;
                Ok::<_, BoxError>(())
            })
        }));

        let res = app.handle_request(HttpRequest::get("/")).await;

        assert_eq!(res.status(), 200);
        assert_eq!(res.text(), r#"{"id":10}"#);
    }

    #[tokio::test]
    async fn test_use_middleware_accepts_lists_in_order() {
        let header = |name: &'static str| -> Arc<dyn Middleware> {
            Arc::new(middleware_fn(move |ctx, next| {
                Box::pin(async move {
                    let seen = ctx.response.header("X-Order").unwrap_or("").to_string();
                    ctx.set("X-Order", &format!("{seen}{name}"));
                    next.run(ctx).await
                })
            }))
        };

        let mut app = senta();
        app.use_middleware(vec![header("a"), header("b")])
            .use_middleware(header("c"));

        let res = app.handle_request(HttpRequest::get("/")).await;

        assert_eq!(app.middlewares().len(), 3);
        assert_eq!(res.header("X-Order"), Some("abc"));
        assert!(!res.is_finished());
    }

    #[tokio::test]
    async fn test_page_envelope_is_sent() {
        let mut app = senta();
        app.use_middleware(page(|ctx| {
            Box::pin(async move {
                let envelope = match ctx.pathname.as_str() {
                    "/skip" => None,
                    _ => Some(ResponseEnvelope::json(&json!({ "name": "Hello World!" }))?),
                };
                Ok::<_, BoxError>(envelope)
            })
        }));

        let res = app.handle_request(HttpRequest::get("/")).await;
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.text(), r#"{"name":"Hello World!"}"#);

        let res = app.handle_request(HttpRequest::get("/skip")).await;
        assert!(!res.is_finished());
    }

    #[tokio::test]
    async fn test_unhandled_error_becomes_500() {
        let mut app = senta();
        app.use_middleware(middleware_fn(|ctx, _next| {
            Box::pin(async move {
                ctx.send(())?;
                Ok::<_, BoxError>(())
            })
        }));

        let res = app.handle_request(HttpRequest::get("/")).await;

        assert_eq!(res.status(), 500);
        assert_eq!(res.text(), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_error_after_response_keeps_response() {
        let mut app = senta();
        app.use_middleware(middleware_fn(|ctx, _next| {
            Box::pin(async move {
                ctx.text("done")?;
                Err::<(), BoxError>("late failure".into())
            })
        }));

        let res = app.handle_request(HttpRequest::get("/")).await;

        assert_eq!(res.status(), 200);
        assert_eq!(res.text(), "done");
    }

    #[tokio::test]
    async fn test_invalid_url_becomes_400() {
        let app = senta();
        let req = HttpRequest::get("/").with_header("Host", "bad host");

        let res = app.handle_request(req).await;

        assert_eq!(res.status(), 400);
        assert_eq!(res.text(), "Bad Request");
    }

    #[tokio::test]
    async fn test_fetch_without_capability() {
        let app = senta();
        let err = app.fetch(LOCALHOST, FetchInit::default()).await.unwrap_err();

        assert!(matches!(err, SentaError::FetchUnavailable));
        assert!(err.to_string().contains("SentaConfig::fetch"));
    }

    #[derive(Default)]
    struct RecordingFetch {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetch for RecordingFetch {
        async fn fetch(&self, url: &str, _init: FetchInit) -> Result<FetchResponse, BoxError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(FetchResponse {
                status: 204,
                headers: Vec::new(),
                body: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_rewrites_localhost_to_bound_port() {
        let recorder = Arc::new(RecordingFetch::default());
        let config = SentaConfig::new()
            .with_port(0)
            .with_fetch(recorder.clone());
        let app = Arc::new(App::new(config));

        let err = app.fetch("http://localhost/a", FetchInit::default()).await.unwrap_err();
        assert!(matches!(err, SentaError::NotListening));

        let server = app.clone().listen().await.unwrap();
        let port = server.local_addr().port();

        let res = app.fetch("http://localhost/a?b=1", FetchInit::default()).await.unwrap();
        app.fetch("http://example.com/", FetchInit::default()).await.unwrap();

        assert_eq!(res.status, 204);
        assert_eq!(
            *recorder.urls.lock().unwrap(),
            [format!("http://localhost:{port}/a?b=1"), "http://example.com/".to_string()]
        );

        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_listen_twice_is_an_error() {
        let app = Arc::new(App::new(SentaConfig::new().with_port(0)));

        let server = app.clone().listen().await.unwrap();
        let err = app.clone().listen().await.unwrap_err();

        assert!(matches!(err, SentaError::AlreadyListening(addr) if addr == server.local_addr()));
        assert_eq!(app.local_addr(), Some(server.local_addr()));

        server.shutdown().await.unwrap();
    }
}
