use async_trait::async_trait;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;

use crate::app::App;
use crate::middleware::BoxFuture;

/// Listener capability.
///
/// `serve` accepts connections on the already bound `listener`, hands every
/// request to `App::handle_request`, and returns once `shutdown` resolves and
/// in-flight requests have drained.
#[async_trait]
pub trait HttpAdapter: Send + Sync {
    async fn serve(
        &self,
        listener: TcpListener,
        app: Arc<App>,
        shutdown: BoxFuture<'static, ()>,
    ) -> Result<()>;
}
