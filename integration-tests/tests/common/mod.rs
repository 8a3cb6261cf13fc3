use std::sync::Arc;

use senta::{App, ReqwestFetch, SentaConfig, ServerHandle};

/// Config bound to a free port with the reqwest-backed fetch injected
pub fn test_config() -> SentaConfig {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build reqwest client");

    SentaConfig::new()
        .with_port(0)
        .with_fetch(Arc::new(ReqwestFetch::with_client(client)))
}

pub async fn start(app: App) -> (Arc<App>, ServerHandle) {
    let app = Arc::new(app);
    let server = app.clone().listen().await.expect("Failed to start server");
    (app, server)
}
