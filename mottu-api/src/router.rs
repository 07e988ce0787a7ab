//! Route table

use axum::{middleware::from_fn_with_state, response::Redirect, routing::get, Router};

use crate::{
    handlers::{auth, collection},
    health::{health, readiness},
    middleware::JwtAuth,
    models::{Address, Person, Vehicle},
    state::AppState,
};

/// All application routes, without the server middleware stack
///
/// Probes and `/api/auth/*` are open; entity collections need a bearer
/// token. Unmatched paths fall through to axum's empty 404.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(collection::routes::<Vehicle>())
        .merge(collection::routes::<Person>())
        .merge(collection::routes::<Address>())
        .route_layer(from_fn_with_state(
            state.jwt_auth().clone(),
            JwtAuth::middleware,
        ));

    Router::new()
        .route("/", get(|| async { Redirect::temporary("/health") }))
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .merge(auth::routes())
        .merge(protected)
        .with_state(state)
}
