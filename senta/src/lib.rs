//! Minimal HTTP server toolkit: file-path route patterns compiled to matchers,
//! a per-request context, typed response envelopes and a cooperative
//! middleware chain.

pub mod adapter;
mod app;
pub mod config;
mod context;
mod error;
pub mod fetch;
pub mod http_helpers;
pub mod logging;
pub mod middleware;
mod response;
pub mod router;
mod traits_helpers;

pub use adapter::{AxumAdapter, HttpAdapter, RouteAdapter};
pub use app::{App, ServerHandle, senta};
pub use config::{SentaConfig, ServerConfig};
pub use context::{Context, RouteDiagnostics};
pub use error::{BoxError, SentaError};
pub use fetch::{Fetch, FetchInit, FetchResponse};
pub use http_helpers::{HttpRequest, HttpResponse, SendValue};
pub use middleware::{
    BoxFuture, IntoMiddlewareList, Middleware, MiddlewareChain, MiddlewareResult, Next,
    middleware_fn, page,
};
pub use response::{ResponseEnvelope, ResponseType};
pub use router::{Params, Route, RoutePattern};

#[cfg(feature = "reqwest")]
pub use fetch::ReqwestFetch;

// Re-export dependencies used by unit implementations
pub use async_trait::async_trait;
pub use rustc_hash::FxHashMap;
