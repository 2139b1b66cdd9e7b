//! API routes

use axum::{routing::get, Router};

use crate::extractors::AppState;
use crate::handlers::users;

/// Create the complete API router
pub fn router(state: AppState) -> Router {
    Router::new().nest("/users", users_router()).with_state(state)
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
