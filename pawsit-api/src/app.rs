/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use pawsit_api::{app::{build_router, AppState}, config::Config};
/// use pawsit_shared::{db::pool::create_pool, services::Services};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database).await?;
/// let services = Services::postgres(pool.clone(), &config.jwt.secret);
///
/// let app = build_router(AppState::new(services, config, Some(pool)));
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::{
        rate_limit::{rate_limit_layer, RateLimiter},
        security::SecurityHeadersLayer,
    },
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use pawsit_shared::{auth::middleware::jwt_auth_middleware, services::Services};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,

    pub config: Arc<Config>,

    pub rate_limiter: Arc<RateLimiter>,

    /// Only used by the health check; `None` when running on in-memory storage
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn new(services: Services, config: Config, db: Option<PgPool>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Self {
            services,
            config: Arc::new(config),
            rate_limiter,
            db,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health
/// └── /api
///     ├── /auth               register/owner, register/sitter, login (public)
///     ├── /pets               CRUD
///     ├── /owners/:id         pets, bookings
///     ├── /bookings           create, read, confirm, cancel, complete, review
///     ├── /reviews            CRUD
///     ├── /services           CRUD, search
///     ├── /sitters/:id        profile, services, reviews, rating, bookings
///     └── /admin              moderation
/// ```
///
/// Path parameters sharing a prefix share a name (`:id`), which the router
/// requires.
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. CORS
/// 3. Request tracing and timeout
/// 4. Rate limiting (per remote address)
/// 5. JWT authentication (every `/api` path except `/api/auth/*`)
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register/owner", post(routes::auth::register_owner))
        .route("/register/sitter", post(routes::auth::register_sitter))
        .route("/login", post(routes::auth::login));

    let pet_routes = Router::new()
        .route("/", post(routes::pets::create_pet))
        .route(
            "/:id",
            get(routes::pets::get_pet)
                .put(routes::pets::update_pet)
                .delete(routes::pets::delete_pet),
        );

    let owner_routes = Router::new()
        .route("/:id/pets", get(routes::pets::list_owner_pets))
        .route("/:id/bookings", get(routes::bookings::list_owner_bookings));

    let booking_routes = Router::new()
        .route("/", post(routes::bookings::create_booking))
        .route("/:id", get(routes::bookings::get_booking))
        .route("/:id/confirm", post(routes::bookings::confirm_booking))
        .route("/:id/cancel", post(routes::bookings::cancel_booking))
        .route("/:id/complete", post(routes::bookings::complete_booking))
        .route("/:id/review", get(routes::reviews::get_booking_review));

    let review_routes = Router::new()
        .route("/", post(routes::reviews::create_review))
        .route(
            "/:id",
            get(routes::reviews::get_review)
                .put(routes::reviews::update_review)
                .delete(routes::reviews::delete_review),
        );

    let offering_routes = Router::new()
        .route("/", post(routes::offerings::create_offering))
        .route("/search", get(routes::offerings::search_offerings))
        .route(
            "/:id",
            get(routes::offerings::get_offering)
                .put(routes::offerings::update_offering)
                .delete(routes::offerings::delete_offering),
        );

    let sitter_routes = Router::new()
        .route("/:id", get(routes::sitters::get_sitter))
        .route("/:id/services", get(routes::offerings::list_sitter_offerings))
        .route("/:id/reviews", get(routes::reviews::list_sitter_reviews))
        .route("/:id/rating", get(routes::reviews::sitter_rating))
        .route("/:id/bookings", get(routes::bookings::list_sitter_bookings));

    let admin_routes = Router::new()
        .route("/sitters/pending", get(routes::admin::pending_sitters))
        .route("/sitters/:id", get(routes::admin::sitter_details))
        .route("/sitters/:id/approve", post(routes::admin::approve_sitter))
        .route("/sitters/:id/reject", post(routes::admin::reject_sitter))
        .route("/users", get(routes::admin::list_users))
        .route(
            "/users/:id",
            get(routes::admin::get_user).delete(routes::admin::delete_user),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/pets", pet_routes)
        .nest("/owners", owner_routes)
        .nest("/bookings", booking_routes)
        .nest("/reviews", review_routes)
        .nest("/services", offering_routes)
        .nest("/sitters", sitter_routes)
        .nest("/admin", admin_routes);

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_secret().to_string(),
            jwt_auth_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_layer,
        ))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

/// Permissive when the origin list contains `*`
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
