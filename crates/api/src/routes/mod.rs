//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod beneficiaries;
pub mod categories;
pub mod distributions;
pub mod donors;
pub mod health;
pub mod programs;
pub mod receipts;
pub mod reports;
pub mod users;

/// Creates the API router; everything except health and token issuance
/// sits behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(donors::routes())
        .merge(categories::routes())
        .merge(beneficiaries::routes())
        .merge(programs::routes())
        .merge(receipts::routes())
        .merge(distributions::routes())
        .merge(reports::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
