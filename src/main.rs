use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use campus_api::config;
use campus_api::database::{bootstrap, DatabaseManager};
use campus_api::handlers::{api, public, root as root_handlers};
use campus_api::middleware::{
    jwt_auth_middleware, require_root_middleware, school_context_middleware,
};
use campus_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, CAMPUS_* vars
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Campus API in {:?} mode", config.environment);

    let db = DatabaseManager::from_env(&config.database)
        .unwrap_or_else(|e| panic!("database configuration: {}", e));
    let state = AppState::new(db);

    // Keep the school registry schema current; a down database at startup is
    // not fatal, /health reports degraded until it comes back
    match state.db.master_pool().await {
        Ok(pool) => {
            if let Err(e) = bootstrap::bootstrap_master_schema(&pool).await {
                tracing::warn!("Could not bootstrap master schema: {}", e);
            }
        }
        Err(e) => tracing::warn!("Master database unavailable at startup: {}", e),
    }

    let app = app(state.clone());

    // Allow tests or deployments to override port via env
    let port = std::env::var("CAMPUS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Campus API server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    // In-flight requests have drained; release every cached pool
    state.db.close_all().await;
}

fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(tenant_routes(state.clone()))
        .nest("/root", root_routes());

    Router::new()
        // Public
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/auth/login", post(public::auth::login))
        .nest("/api", api)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// School-scoped routes. The school context middleware runs first and the
/// JWT check second, so a handler only ever sees a fully populated context.
fn tenant_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/staff", get(api::staff::list).post(api::staff::create))
        .route(
            "/staff/:id",
            get(api::staff::get)
                .put(api::staff::update)
                .delete(api::staff::delete),
        )
        .route(
            "/classes",
            get(api::classes::list).post(api::classes::create),
        )
        .route(
            "/classes/:id/sections",
            get(api::classes::list_sections).post(api::classes::create_section),
        )
        .route(
            "/classes/:id/subjects",
            get(api::classes::list_subjects).post(api::classes::create_subject),
        )
        .route(
            "/inventory/categories",
            get(api::inventory::list_categories).post(api::inventory::create_category),
        )
        .route(
            "/inventory/suppliers",
            get(api::inventory::list_suppliers).post(api::inventory::create_supplier),
        )
        .route(
            "/inventory/items",
            get(api::inventory::list_items).post(api::inventory::create_item),
        )
        .route(
            "/inventory/items/:id/transactions",
            get(api::inventory::list_item_transactions),
        )
        .route(
            "/inventory/transactions",
            post(api::inventory::create_transaction),
        )
        .route(
            "/settings/bulk-print",
            get(api::settings::get).put(api::settings::put),
        )
        .route("/school", get(api::profile::get))
        // Later-added route layers run first: school context, then JWT
        .route_layer(axum_middleware::from_fn(jwt_auth_middleware))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            school_context_middleware,
        ))
}

/// Cross-tenant administrative routes, gated by the operator token
fn root_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/schools",
            get(root_handlers::school::list).post(root_handlers::school::create),
        )
        .route(
            "/schools/:slug/suspend",
            post(root_handlers::school::suspend),
        )
        .route(
            "/schools/:slug/restore",
            post(root_handlers::school::restore),
        )
        .route(
            "/schools/:slug/connection",
            delete(root_handlers::school::evict_connection),
        )
        .route("/schools/:slug/health", get(root_handlers::school::health))
        .route_layer(axum_middleware::from_fn(require_root_middleware))
}

async fn banner() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Campus API",
            "version": version,
            "description": "School management SaaS backend with per-school database isolation",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public - token acquisition)",
                "staff": "/api/staff[/:id] (school-scoped)",
                "classes": "/api/classes[/:id/sections|subjects] (school-scoped)",
                "inventory": "/api/inventory/* (school-scoped)",
                "settings": "/api/settings/bulk-print (school-scoped)",
                "school": "/api/school (school-scoped)",
                "root": "/api/root/* (restricted, requires operator token)",
            },
            "routing": {
                "header": "X-School-Slug: <slug>",
                "subdomain": "<slug>.campus.example",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining requests");
}
