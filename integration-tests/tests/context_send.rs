//! End-to-end checks of the Context response helpers over a real listener.

mod common;

use senta::{App, BoxError, FetchInit, ResponseEnvelope, middleware_fn, page};
use serde::Deserialize;
use serde_json::json;

#[tokio::test]
async fn test_context_json() {
    let mut app = App::new(common::test_config());
    app.use_middleware(middleware_fn(|ctx, _next| {
        Box::pin(async move {
            ctx.json(&json!({ "id": 10 }))?;
            Ok::<_, BoxError>(())
        })
    }));
    let (app, server) = common::start(app).await;

    let res = app
        .fetch("http://localhost/", FetchInit::default())
        .await
        .expect("Failed to fetch");

    assert_eq!(res.status, 200);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_eq!(res.json::<serde_json::Value>().unwrap(), json!({ "id": 10 }));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_envelope_from_page() {
    let mut app = App::new(common::test_config());
    app.use_middleware(page(|_ctx| {
        Box::pin(async move {
            let envelope = ResponseEnvelope::new("html", "<h1>Hello World!</h1>")?
                .with_header("Cache-Control", "no-store");
            Ok::<_, BoxError>(Some(envelope))
        })
    }));
    let (app, server) = common::start(app).await;

    let res = app
        .fetch("http://localhost/anything", FetchInit::default())
        .await
        .unwrap();

    assert_eq!(res.status, 200);
    assert_eq!(res.header("content-type"), Some("text/html"));
    assert_eq!(res.header("cache-control"), Some("no-store"));
    assert_eq!(res.text(), "<h1>Hello World!</h1>");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_headers_and_query() {
    #[derive(Deserialize)]
    struct Greeting {
        name: String,
    }

    let mut app = App::new(common::test_config());
    app.use_middleware(middleware_fn(|ctx, _next| {
        Box::pin(async move {
            let greeting: Greeting = ctx.query_as()?;
            ctx.status(201).set("X-Powered-By", "senta");
            ctx.text(format!("hello {}", greeting.name))?;
            Ok::<_, BoxError>(())
        })
    }));
    let (app, server) = common::start(app).await;

    let res = app
        .fetch("http://localhost/greet?name=ada", FetchInit::default())
        .await
        .unwrap();

    assert_eq!(res.status, 201);
    assert_eq!(res.header("x-powered-by"), Some("senta"));
    assert_eq!(res.text(), "hello ada");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_redirect() {
    let mut app = App::new(common::test_config());
    app.use_middleware(middleware_fn(|ctx, _next| {
        Box::pin(async move {
            ctx.redirect("/new");
            Ok::<_, BoxError>(())
        })
    }));
    let (app, server) = common::start(app).await;

    let res = app
        .fetch("http://localhost/old", FetchInit::default())
        .await
        .unwrap();

    assert_eq!(res.status, 302);
    assert_eq!(res.header("location"), Some("/new"));
    assert!(res.body.is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_request_body_is_available() {
    let mut app = App::new(common::test_config());
    app.use_middleware(middleware_fn(|ctx, _next| {
        Box::pin(async move {
            let body: serde_json::Value = ctx.request.json()?;
            let method = ctx.request.method.clone();
            ctx.json(&json!({ "method": method, "echo": body }))?;
            Ok::<_, BoxError>(())
        })
    }));
    let (app, server) = common::start(app).await;

    let init = FetchInit::new()
        .method("POST")
        .header("Content-Type", "application/json")
        .body(r#"{"id":7}"#);
    let res = app.fetch("http://localhost/echo", init).await.unwrap();

    assert_eq!(
        res.json::<serde_json::Value>().unwrap(),
        json!({ "method": "POST", "echo": { "id": 7 } })
    );

    server.shutdown().await.unwrap();
}
