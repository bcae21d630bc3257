use axum::{middleware::from_fn, routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod resource;
pub mod state;
pub mod store;

use state::AppState;

/// Assemble the full application router around an injected gateway.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router<AppState> {
    use handlers::{auth, dashboard};
    use resource::handlers as crud;

    Router::new()
        // Own-account management
        .route("/api/auth/profile", get(auth::profile_get).put(auth::profile_put))
        .route("/api/auth/change-password", post(auth::change_password))
        // Read-only dashboard aggregation
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/recent-appointments", get(dashboard::recent_appointments))
        .route("/api/dashboard/revenue-chart", get(dashboard::revenue_chart))
        .route("/api/dashboard/patient-growth", get(dashboard::patient_growth))
        // Generic resource engine; static segments above win over :resource
        .route("/api/:resource", get(crud::list).post(crud::create))
        .route(
            "/api/:resource/:id",
            get(crud::get).put(crud::update).delete(crud::delete),
        )
        // Access guard runs before any handler or persistence side effect
        .route_layer(from_fn(middleware::bearer_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Clinic API",
        "version": version,
        "description": "Clinic management CRM backend",
        "endpoints": {
            "home": "/ (public)",
            "auth": "/auth/register, /auth/login (public - token acquisition)",
            "account": "/api/auth/profile, /api/auth/change-password (protected)",
            "dashboard": "/api/dashboard/* (protected)",
            "resources": "/api/:resource[/:id] (protected)",
        },
        "resources": resource::registry::all()
            .iter()
            .map(|def| def.name)
            .collect::<Vec<_>>(),
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.gateway.health().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
