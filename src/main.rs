use axum::{
    extract::Extension,
    http::{header, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bin_transfer_engine::{api, config, db, services, state};
use services::reconciliation::LegacyBatchReconciliation;
use state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration first (needed for log_level)
    let config = config::Config::from_env().expect("Failed to load configuration");

    // Initialize tracing with log_level from config
    let log_filter = format!("bin_transfer_engine={},tower_http=info", config.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Create database connection pool with configuration
    let db_pool = db::create_pool(
        &config.database_connection_string(),
        config.database_max_connections,
        config.database_min_connections,
        config.database_connection_timeout_secs,
    )
    .await
    .expect("Failed to create database connection pool");

    tracing::info!("Database connection pool created successfully");

    let state = AppState {
        pool: db_pool,
        reconciliation: Arc::new(LegacyBatchReconciliation),
        lock_wait_ms: state::LockWaitMs(config.transfer_lock_wait_ms),
    };

    // Configure CORS with allowed origins from config
    // Note: Cannot use Any (wildcard) for headers when credentials are enabled
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_allowed_origins
                .iter()
                .map(|origin| origin.parse().expect("Invalid CORS origin"))
                .collect::<Vec<_>>(),
        )
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .allow_credentials(true);

    // Create middleware layer to inject Config into request extensions
    let config_clone = config.clone();
    let add_config = axum_middleware::from_fn(
        move |mut req: axum::http::Request<axum::body::Body>, next: axum::middleware::Next| {
            let config = config_clone.clone();
            async move {
                req.extensions_mut().insert(config);
                next.run(req).await
            }
        },
    );

    // No JWT/LDAP middleware is wired here (spec §6.1) — `user_id` travels
    // in the request body as a plain validated string. A real deployment
    // sits this router behind an auth layer supplied by the caller.
    let api_routes = Router::new()
        .route("/lots/availability", get(api::lots::get_availability_endpoint))
        .route(
            "/lots/:lotNo/:binNo/pending",
            get(api::lots::get_pending_for_lot_bin_endpoint),
        )
        .route("/bins/:location/:binNo/validate", get(api::bins::validate_bin_endpoint))
        .route("/remarks", get(api::remarks::list_remarks_endpoint))
        .route("/transfers", post(api::transfers::transfer_endpoint))
        .route(
            "/transfers/committed",
            post(api::transfers::transfer_committed_endpoint),
        )
        .with_state(state);

    // Build application routes with middleware
    let mut app = Router::new()
        .route("/", get(health_check))
        .route("/api/health", get(health_check))
        .nest("/api", api_routes)
        .layer(add_config);

    // Conditionally add request logging based on config
    if config.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app = app.layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    app_name: String,
    version: String,
    company: String,
}

async fn health_check(Extension(config): Extension<config::Config>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        app_name: config.app_name,
        version: config.app_version,
        company: config.company_name,
    })
}
