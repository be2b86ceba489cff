pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Auth routes
        .nest("/auth", auth_routes())

        // Public routes (no session needed)
        .nest("/public", public_routes())

        // Signed-in routes
        .nest("/api", api_routes(app_state.clone()))

        // Admin routes
        .nest("/admin", admin_routes(app_state.clone()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/signup", post(handlers::auth::signup))
        .route("/demo", post(handlers::auth::demo))
        .route("/logout", post(handlers::auth::logout))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/mentorships", get(handlers::public::mentorships))
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::dashboard::me))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .nest("/clubs", club_routes())
        .nest("/events", event_routes())
        .route("/assistant/ask", post(handlers::assistant::ask))
        .route("/assistant/describe", post(handlers::assistant::describe))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn club_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::clubs::list))
        .route("/", post(handlers::clubs::propose))
        .route("/categories", get(handlers::clubs::categories))
        .route("/:id", get(handlers::clubs::get))
        .route("/:id/description", put(handlers::clubs::update_description))
        .route("/:id/join", post(handlers::clubs::join))
        .route("/:id/roster", get(handlers::clubs::roster))
        .route("/:id/members/:user_id/approve", post(handlers::clubs::approve_member))
        .route("/:id/members/:user_id/reject", post(handlers::clubs::reject_member))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::events::list))
        .route("/", post(handlers::events::create))
        .route("/:id", get(handlers::events::get))
        .route("/:id/register", post(handlers::events::register))
        .route("/:id/attendees", get(handlers::events::attendees))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/clubs", post(handlers::admin::create_club))
        .route("/clubs/pending", get(handlers::admin::pending_clubs))
        .route("/clubs/:id/approve", post(handlers::admin::approve_club))
        .route("/clubs/:id", delete(handlers::admin::reject_club))
        .route("/users", get(handlers::admin::users))
        .route("/announcements", post(handlers::admin::announce))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
