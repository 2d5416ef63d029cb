use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{self, AppContext, AppState};
use crate::store::traits::FigureStore;

pub fn create_router<S: FigureStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route(
            "/v1/healthcheck",
            get(handlers::health_check::<S>).fallback(handlers::method_not_allowed),
        )
        // Figures
        .route(
            "/v1/figures",
            post(handlers::create_figure::<S>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/v1/figures/:id",
            get(handlers::show_figure::<S>)
                .put(handlers::update_figure::<S>)
                .delete(handlers::delete_figure::<S>)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
}

/// Router with state and request body limit applied, ready to serve.
pub fn build_app<S: FigureStore + 'static>(
    store: Arc<S>,
    environment: &str,
    max_body_bytes: usize,
) -> Router {
    let state: AppState<S> = Arc::new(AppContext::new(store, environment));

    create_router::<S>()
        // Enforced by the Json extractor, so oversized bodies surface as ApiError
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
