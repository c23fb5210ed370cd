//! HTTP route handlers for the assistant service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                - Liveness (lives in main)
//! GET  /health/ready                          - Readiness (lives in main)
//!
//! # Chat sessions
//! POST /api/session                           - Start a session, returns the greeting
//! POST /api/session/{id}/message              - Send a user message, returns bot replies
//! GET  /api/session/{id}/cart                 - Cart contents
//! POST /api/session/{id}/cart/add             - Add a menu item to the cart
//! POST /api/session/{id}/cart/remove          - Remove a cart line by index
//! POST /api/session/{id}/checkout             - Start checkout (widget button path)
//!
//! # Customer profiles
//! GET  /api/profile/{device}                  - Stored profile for a device
//! POST /api/profile/{device}/favorites/toggle - Star or unstar a menu item
//! POST /api/profile/{device}/preferences      - Widget sound/welcome flags
//!
//! # Address directory (admin form autofill)
//! GET  /api/address/cep/{cep}                 - ViaCEP lookup by CEP
//! GET  /api/address/search                    - Street search (uf, city, street)
//! ```

pub mod address;
pub mod profile;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the chat-session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(session::start))
        .route("/{id}/message", post(session::message))
        .route("/{id}/cart", get(session::show_cart))
        .route("/{id}/cart/add", post(session::add_to_cart))
        .route("/{id}/cart/remove", post(session::remove_from_cart))
        .route("/{id}/checkout", post(session::begin_checkout))
}

/// Create the customer-profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/{device}", get(profile::show))
        .route("/{device}/favorites/toggle", post(profile::toggle_favorite))
        .route("/{device}/preferences", post(profile::update_preferences))
}

/// Create the address directory routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/cep/{cep}", get(address::by_cep))
        .route("/search", get(address::search))
}

/// Create all API routes for the assistant.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/session", session_routes())
        .nest("/api/profile", profile_routes())
        .nest("/api/address", address_routes())
}
