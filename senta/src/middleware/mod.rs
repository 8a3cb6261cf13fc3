mod chain;
pub use chain::{MiddlewareChain, Next};

pub use crate::traits_helpers::middleware::{
    BoxFuture, FunctionalMiddleware, IntoMiddlewareList, Middleware, MiddlewareFn,
    MiddlewareResult, Page, PageFn, middleware_fn, page,
};
