use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use cardoctor_auth_types::identity::require_token;
use cardoctor_core::health::healthz;
use cardoctor_core::middleware::{log_request, request_id_layer};

use crate::handlers::{
    booking::{create_booking, delete_booking, list_bookings, update_booking},
    index, readyz,
    service::{get_service, list_services},
    session::{login, logout},
    user::{create_user, get_user, list_users},
};
use crate::state::AppState;

/// Request pipeline, outermost first: request id, trace, request log, then the
/// auth gate on gated routes only.
pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/bookings", get(list_bookings))
        .route_layer(middleware::from_fn_with_state(
            state.auth_gate(),
            require_token,
        ));

    Router::new()
        .route("/", get(index))
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/jwt", post(login))
        .route("/logout", post(logout))
        // Services
        .route("/services", get(list_services))
        .route("/services/{id}", get(get_service))
        // Bookings
        .merge(gated)
        .route("/bookings", post(create_booking))
        .route("/bookings/{id}", patch(update_booking).delete(delete_booking))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
