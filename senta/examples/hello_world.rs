//! Serves `{"name":"Hello World!"}` on port 3000 (or `SENTA_PORT`).
//!
//! ```sh
//! cargo run --example hello_world
//! curl http://127.0.0.1:3000/
//! curl http://127.0.0.1:3000/users/ada
//! ```

use std::sync::Arc;
use std::time::Instant;

use senta::{
    App, BoxError, Context, Middleware, MiddlewareResult, Next, ResponseEnvelope, Route,
    SentaConfig, ServerConfig, async_trait, logging, middleware_fn, page,
};
use serde_json::json;

/// Logs method, path, status and elapsed time once the rest of the chain returns
struct LoggerMiddleware;

#[async_trait]
impl Middleware for LoggerMiddleware {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> MiddlewareResult {
        let start = Instant::now();
        let result = next.run(ctx).await;

        tracing::info!(
            method = %ctx.request.method,
            path = %ctx.pathname,
            status = ctx.response.status(),
            elapsed = ?start.elapsed(),
            "handled"
        );
        result
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = logging::init_tracing();

    let config = SentaConfig {
        server: ServerConfig::from_env()?,
        ..SentaConfig::default()
    };
    let mut app = App::new(config);

    app.use_middleware(LoggerMiddleware);

    app.use_middleware(Route::new(
        "/users/:name",
        middleware_fn(|ctx, _next| {
            Box::pin(async move {
                let name = ctx.param("name").unwrap_or("stranger").to_string();
                ctx.json(&json!({ "name": name }))?;
                Ok::<_, BoxError>(())
            })
        }),
    )?);

    app.use_middleware(page(|_ctx| {
        Box::pin(async move {
            let envelope = ResponseEnvelope::new("json", json!({ "name": "Hello World!" }))?;
            Ok::<_, BoxError>(Some(envelope))
        })
    }));

    let server = Arc::new(app).listen().await?;
    tracing::info!("listening on http://{}", server.local_addr());

    tokio::signal::ctrl_c().await?;
    server.shutdown().await?;
    Ok(())
}
