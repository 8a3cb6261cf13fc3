use anyhow::{Context as _, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::net::TcpListener;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
};

use crate::app::App;
use crate::middleware::BoxFuture;

use super::{AxumRouteAdapter, HttpAdapter, RouteAdapter};

/// Default listener: every request goes through a single axum fallback
/// handler into the App's middleware chain.
#[derive(Clone, Debug, Default)]
pub struct AxumAdapter;

impl AxumAdapter {
    pub fn new() -> Self {
        Self
    }

    fn router(app: Arc<App>) -> Router {
        Router::new().fallback(move |req: Request<Body>| {
            let app = app.clone();
            async move {
                match AxumRouteAdapter::handle_request(req, app).await {
                    Ok(res) => res,
                    Err(err) => {
                        tracing::error!(error = %err, "failed to adapt request");
                        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
                    }
                }
            }
        })
    }
}

#[async_trait]
impl HttpAdapter for AxumAdapter {
    async fn serve(
        &self,
        listener: TcpListener,
        app: Arc<App>,
        shutdown: BoxFuture<'static, ()>,
    ) -> Result<()> {
        axum::serve(listener, Self::router(app))
            .with_graceful_shutdown(shutdown)
            .await
            .context("Axum server encountered an error")?;
        Ok(())
    }
}
