use std::sync::Arc;

use anyhow::Result;

use crate::app::App;
use crate::http_helpers::{HttpRequest, HttpResponse};

/// Converts between a listener's native request/response types and the
/// toolkit's handles.
pub trait RouteAdapter {
    type Request: Send;
    type Response;

    fn adapt_request(request: Self::Request) -> impl Future<Output = Result<HttpRequest>> + Send;

    fn adapt_response(response: HttpResponse) -> Result<Self::Response>;

    fn handle_request(
        request: Self::Request,
        app: Arc<App>,
    ) -> impl Future<Output = Result<Self::Response>> + Send {
        async move {
            let http_request = Self::adapt_request(request).await?;
            let http_response = app.handle_request(http_request).await;
            Self::adapt_response(http_response)
        }
    }
}
