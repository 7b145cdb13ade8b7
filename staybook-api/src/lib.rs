use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod places;
pub mod state;
pub mod uploads;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    // Credentialed CORS: the session cookie must travel with requests from
    // the listed front-end origins.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    Router::new()
        .route("/", get(|| async { "Server running..." }))
        .route("/api/test", get(|| async { Json("test ok") }))
        .merge(auth::routes())
        .merge(places::routes())
        .merge(bookings::routes())
        .merge(uploads::routes())
        .nest_service("/uploads", ServeDir::new(&state.uploads.dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
