//! Interceptors on the dispatch path.
//!
//! Middleware observes, transforms, defers or suppresses actions before
//! they reach the store's raw dispatch. `apply_middleware` turns an
//! ordered chain of middleware into a store enhancer; the first-supplied
//! middleware is outermost.

mod apply;
mod logging;

pub use apply::{apply_middleware, Middleware, MiddlewareApi};
pub use logging::LoggingMiddleware;
