use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::context::Context;
use crate::traits_helpers::middleware::{BoxFuture, Middleware, MiddlewareResult};

/// Continuation handed to each unit.
///
/// Every `Next` of one traversal shares a cursor, so calling `run` always
/// resumes at the next unit not yet started, no matter which unit calls it.
/// A mounted chain's continuation carries the enclosing one as `parent` and
/// hands over to it when its own units run out.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    units: &'a [Arc<dyn Middleware>],
    cursor: &'a AtomicUsize,
    parent: Option<&'a Next<'a>>,
}

impl<'a> Next<'a> {
    /// Invoke the next unit, or do nothing once the response is complete
    /// or the outermost chain has run off its end.
    pub fn run<'c>(self, ctx: &'c mut Context) -> BoxFuture<'c, MiddlewareResult>
    where
        'a: 'c,
    {
        Box::pin(async move {
            if ctx.is_finished() {
                return Ok(());
            }

            let index = self.cursor.load(Ordering::SeqCst);
            let Some(unit) = self.units.get(index) else {
                return match self.parent {
                    Some(parent) => parent.run(ctx).await,
                    None => Ok(()),
                };
            };

            self.cursor.store(index + 1, Ordering::SeqCst);
            unit.handle(ctx, self).await
        })
    }
}

/// Ordered list of units traversed once per request
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    units: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_middleware(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.units.push(middleware);
        self
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Run the chain for one request, starting at the first unit.
    ///
    /// Resolves once the first unit's future resolves. Errors from any unit
    /// propagate out unless an earlier unit handles them.
    pub async fn dispatch(&self, ctx: &mut Context) -> MiddlewareResult {
        if self.units.is_empty() {
            tracing::debug!(path = %ctx.pathname, "no units registered");
            return Ok(());
        }

        tracing::debug!(path = %ctx.pathname, units = self.units.len(), "dispatching");
        self.traverse(ctx, None).await?;
        tracing::debug!(
            path = %ctx.pathname,
            finished = ctx.is_finished(),
            "dispatch complete"
        );
        Ok(())
    }

    /// Traverse with a fresh cursor, continuing into `parent` past the last unit
    async fn traverse(&self, ctx: &mut Context, parent: Option<&Next<'_>>) -> MiddlewareResult {
        let cursor = AtomicUsize::new(0);

        Next {
            units: &self.units,
            cursor: &cursor,
            parent,
        }
        .run(ctx)
        .await
    }
}

impl FromIterator<Arc<dyn Middleware>> for MiddlewareChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Middleware>>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

/// A mounted chain runs its own units; the outer chain resumes inside the
/// continuation of its last unit, so outer units finish before any mounted
/// unit's post-continuation code runs.
#[async_trait]
impl Middleware for MiddlewareChain {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> MiddlewareResult {
        self.traverse(ctx, Some(&next)).await
    }
}
