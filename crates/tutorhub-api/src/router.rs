//! Route definitions for the TutorHub HTTP API.
//!
//! Routes are grouped by side. The sessions side mounts availability,
//! catalog, and the internal RPC surface; the bookings side mounts the
//! student and tutor booking routes. A combined process mounts both.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the router for the configured role.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().merge(health_routes());

    if state.sessions.is_some() {
        router = router
            .merge(availability_routes())
            .merge(catalog_routes())
            .merge(internal_routes());
    }
    if state.bookings.is_some() {
        router = router.merge(booking_routes()).merge(tutor_routes());
    }

    router.with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Tutor availability management
fn availability_routes() -> Router<AppState> {
    use handlers::availability as h;
    Router::new()
        .route("/availability", get(h::overview))
        .route("/availability/slots", post(h::add_slot))
        .route("/availability/slots/{id}", put(h::update_slot).delete(h::delete_slot))
        .route("/availability/slots/{id}/publish", post(h::publish_slot))
        .route("/availability/publish-all", post(h::publish_all))
        .route(
            "/availability/bulk-delete-unpublished",
            delete(h::bulk_delete_unpublished),
        )
        .route("/availability/exceptions", post(h::add_exception))
        .route("/availability/exceptions/{id}", delete(h::remove_exception))
        .route("/availability/policy", put(h::set_policy))
}

/// Student catalog
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/browse", get(handlers::sessions::browse))
        .route("/sessions/{id}", get(handlers::sessions::get_session))
}

/// Sessions RPC consumed by the bookings side
fn internal_routes() -> Router<AppState> {
    use handlers::internal as h;
    Router::new()
        .route("/internal/enroll/{id}", post(h::enroll))
        .route("/internal/unenroll/{id}", post(h::unenroll))
        .route("/internal/slots/{id}", get(h::get_slot))
        .route("/internal/slots/{id}/book", put(h::book_slot))
        .route("/internal/slots/{id}/unbook", put(h::unbook_slot))
        .route("/internal/{id}", get(h::snapshot))
}

/// Student bookings
fn booking_routes() -> Router<AppState> {
    use handlers::bookings as h;
    Router::new()
        .route("/bookings", post(h::create_booking).get(h::list_my_bookings))
        .route("/bookings/{id}", get(h::get_booking))
        .route("/bookings/{id}/cancel", post(h::cancel_booking))
}

/// Tutor booking decisions and stats
fn tutor_routes() -> Router<AppState> {
    use handlers::tutor as h;
    Router::new()
        .route("/tutor/bookings", get(h::list_bookings))
        .route("/tutor/bookings/{id}/confirm", post(h::confirm_booking))
        .route("/tutor/bookings/{id}/reject", post(h::reject_booking))
        .route("/tutor/bookings/{id}/cancel", post(h::cancel_booking))
        .route("/tutor/bookings/{id}/complete", post(h::complete_booking))
        .route("/tutor/stats", get(h::stats))
}
