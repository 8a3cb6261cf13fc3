use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::BoxError;
use crate::middleware::Next;
use crate::response::ResponseEnvelope;

/// Result type for middleware chain execution
pub type MiddlewareResult = Result<(), BoxError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Core middleware trait
///
/// A unit either completes the response through `ctx`, or hands control to
/// the rest of the chain with `next.run(ctx).await`. Code after the awaited
/// continuation runs once every later unit has returned.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> MiddlewareResult;
}

/// Functional middleware - simpler alternative using closures
pub type MiddlewareFn = Arc<
    dyn for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, MiddlewareResult> + Send + Sync,
>;

/// Wrapper to convert functional middleware to trait
pub struct FunctionalMiddleware {
    handler: MiddlewareFn,
}

impl FunctionalMiddleware {
    pub fn new(handler: MiddlewareFn) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl Middleware for FunctionalMiddleware {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> MiddlewareResult {
        (self.handler)(ctx, next).await
    }
}

/// Build a unit from a closure
///
/// ```rust
/// use senta::middleware_fn;
///
/// let powered_by = middleware_fn(|ctx, next| {
///     Box::pin(async move {
///         ctx.set("X-Powered-By", "senta");
///         next.run(ctx).await
///     })
/// });
/// ```
pub fn middleware_fn<F>(handler: F) -> FunctionalMiddleware
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, MiddlewareResult>
        + Send
        + Sync
        + 'static,
{
    FunctionalMiddleware::new(Arc::new(handler))
}

pub type PageFn = Arc<
    dyn for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<Option<ResponseEnvelope>, BoxError>>
        + Send
        + Sync,
>;

/// A unit that answers with an envelope, or passes when it has nothing to say
pub struct Page {
    handler: PageFn,
}

#[async_trait]
impl Middleware for Page {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> MiddlewareResult {
        match (self.handler)(ctx).await? {
            Some(envelope) => Ok(ctx.send(envelope)?),
            None => next.run(ctx).await,
        }
    }
}

pub fn page<F>(handler: F) -> Page
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<Option<ResponseEnvelope>, BoxError>>
        + Send
        + Sync
        + 'static,
{
    Page {
        handler: Arc::new(handler),
    }
}

/// Anything `App::use_middleware` accepts: one unit or an ordered list
pub trait IntoMiddlewareList {
    fn into_middleware_list(self) -> Vec<Arc<dyn Middleware>>;
}

impl<M: Middleware + 'static> IntoMiddlewareList for M {
    fn into_middleware_list(self) -> Vec<Arc<dyn Middleware>> {
        vec![Arc::new(self)]
    }
}

impl IntoMiddlewareList for Arc<dyn Middleware> {
    fn into_middleware_list(self) -> Vec<Arc<dyn Middleware>> {
        vec![self]
    }
}

impl IntoMiddlewareList for Vec<Arc<dyn Middleware>> {
    fn into_middleware_list(self) -> Vec<Arc<dyn Middleware>> {
        self
    }
}
