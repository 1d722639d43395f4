use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::require_auth;
use crate::state::AppState;

/// Multipart framing on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the full HTTP application
pub fn app(state: AppState) -> Router {
    let body_limit = state
        .config
        .api
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Stored images
        .nest_service("/uploads", uploads)
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{comments, goals, likes, todos};

    Router::new()
        // Todos
        .route("/api/todos", get(todos::list).post(todos::create))
        .route("/api/todos/feed", get(todos::feed))
        .route("/api/todos/:id", patch(todos::update).delete(todos::delete))
        // Likes and comments hang off a todo
        .route("/api/todos/:id/like", post(likes::toggle))
        .route("/api/todos/:id/likes", get(likes::status))
        .route("/api/todos/:id/comments", get(comments::list).post(comments::create))
        .route("/api/comments/:id", delete(comments::delete))
        // Goals
        .route("/api/goals", get(goals::list).post(goals::create))
        .route("/api/goals/:id/complete", patch(goals::complete))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = state
        .config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}
