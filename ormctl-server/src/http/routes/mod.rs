//! Route handlers organized by resource

pub mod demo;
pub mod health;
pub mod items;
pub mod requests;
pub mod stream;
pub mod trainings;

use axum::routing::MethodRouter;
use axum::Router;

/// Serve `path` with and without a trailing slash.
fn route_both<S>(router: Router<S>, path: &str, method_router: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}
