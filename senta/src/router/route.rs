use async_trait::async_trait;
use std::sync::Arc;

use crate::context::Context;
use crate::error::SentaError;
use crate::middleware::{IntoMiddlewareList, Middleware, MiddlewareChain, MiddlewareResult, Next};

use super::RoutePattern;

/// Runs a unit only for request paths its pattern matches.
///
/// On a match the Context params are replaced with the captures before the
/// unit runs; otherwise the request moves on to the next unit.
pub struct Route {
    pattern: RoutePattern,
    unit: Arc<dyn Middleware>,
}

impl Route {
    /// Strict route: the whole path must match
    pub fn new(path: &str, unit: impl IntoMiddlewareList) -> Result<Self, SentaError> {
        Ok(Self::with_pattern(RoutePattern::compile(path, false)?, unit))
    }

    /// Loose route: matches `prefix` and anything below it
    pub fn mount(prefix: &str, unit: impl IntoMiddlewareList) -> Result<Self, SentaError> {
        Ok(Self::with_pattern(RoutePattern::compile(prefix, true)?, unit))
    }

    /// Strict route from a filename-style path such as `users/[id]`
    pub fn from_file(filename: &str, unit: impl IntoMiddlewareList) -> Result<Self, SentaError> {
        Ok(Self::with_pattern(
            RoutePattern::from_filename(filename, false)?,
            unit,
        ))
    }

    pub fn with_pattern(pattern: RoutePattern, unit: impl IntoMiddlewareList) -> Self {
        let mut units = unit.into_middleware_list();
        let unit = if units.len() == 1 {
            units.remove(0)
        } else {
            Arc::new(units.into_iter().collect::<MiddlewareChain>())
        };

        Self { pattern, unit }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

#[async_trait]
impl Middleware for Route {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> MiddlewareResult {
        if !self.pattern.matches(&ctx.pathname) {
            return next.run(ctx).await;
        }

        ctx.apply_route(&self.pattern)?;
        tracing::debug!(
            route = %self.pattern.path(),
            path = %ctx.pathname,
            "route matched"
        );

        self.unit.handle(ctx, next).await
    }
}
