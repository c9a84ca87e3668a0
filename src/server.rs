use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::config::Config;
use crate::db::MongoRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<MongoRepository>,
}

impl AppState {
    pub fn new(config: Config, db: Arc<MongoRepository>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let movie_routes = Router::new()
        .route("/movies", get(api::movies::list_movies))
        .route("/movies/top-rated", get(api::movies::top_rated))
        .route("/movies/latest", get(api::movies::latest))
        .route("/movies/genres", get(api::movies::genres))
        .route("/movies/filter", get(api::movies::filter_movies))
        .route("/movies/add", post(api::movies::add_movie))
        .route("/movies/my-collection", get(api::movies::my_collection))
        .route(
            "/movies/my-collection/:id",
            delete(api::movies::delete_from_collection),
        )
        .route("/movies/update/:id", patch(api::movies::update_movie))
        .route("/movie/:id", get(api::movies::get_movie));

    let watchlist_routes = Router::new()
        .route(
            "/movies/watchlist",
            post(api::watchlist::add_entry).get(api::watchlist::list_entries),
        )
        .route("/movies/watchlist/:id", delete(api::watchlist::delete_entry));

    Router::new()
        .route("/", get(api::system::banner))
        .route("/health", get(api::system::health))
        .merge(movie_routes)
        .merge(watchlist_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow-list CORS with credentials; the catalog frontend sends cookies, so
/// wildcard origins are off the table.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    // CORS preflight for unknown paths still deserves a 200; headers are
    // attached by the CorsLayer.
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
