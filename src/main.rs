mod actions;
mod auth;
mod config;
mod database;
mod errors;
mod handlers;
mod models;
mod storage;
mod store;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use auth::AuthGate;
use config::{AppConfig, StorageBackend};
use errors::AppError;
use handlers::{records, Desk, SharedDesk};
use models::{DocumentFile, Employee, LabDevice, Product, ReservedItem};
use storage::{FileStorage, MemoryStorage, PgStorage, Storage};
use store::Store;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    let storage = open_storage(&config.storage).await?;
    let store = Store::load(storage).await;
    let desk: SharedDesk = Arc::new(Mutex::new(Desk {
        store,
        gate: AuthGate::new(config.credentials.clone()),
    }));

    let app = create_router(desk.clone(), &config.static_dir);

    log::info!("TQM desk listening on http://{}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| AppError::Config(format!("cannot bind {}: {}", config.addr, e)))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("server error: {}", e)))?;

    // Let queued collection writes land before exiting.
    let flushed = desk.lock().await.store.flush();
    flushed.await;
    log::info!("Pending writes flushed, shutting down");

    Ok(())
}

async fn open_storage(backend: &StorageBackend) -> Result<Arc<dyn Storage>, AppError> {
    let storage: Arc<dyn Storage> = match backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::File(dir) => Arc::new(
            FileStorage::open(dir)
                .await
                .map_err(AppError::StorageRead)?,
        ),
        StorageBackend::Postgres(url) => Arc::new(
            PgStorage::connect(url)
                .await
                .map_err(AppError::StorageRead)?,
        ),
    };
    Ok(storage)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn create_router(desk: SharedDesk, static_dir: &Path) -> Router {
    let router = Router::new()
        // Auth gate
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/status", get(handlers::auth::status))
        .route("/api/auth/challenge/confirm", post(handlers::auth::confirm_challenge))
        .route("/api/auth/challenge/dismiss", post(handlers::auth::dismiss_challenge))

        // Dashboard and report
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/reports/dashboard.csv", get(handlers::reports::dashboard_report))

        // KPI entries are addressed by position
        .route("/api/kpi", get(handlers::kpi::list).post(handlers::kpi::create))
        .route(
            "/api/kpi/:index",
            get(handlers::kpi::show)
                .put(handlers::kpi::update)
                .delete(handlers::kpi::remove),
        )

        // Company settings
        .route("/api/settings", get(handlers::settings::show).put(handlers::settings::save))

        // Database screen
        .route("/api/database/export", get(handlers::database::export))
        .route("/api/database/import", post(handlers::database::import))
        .route("/api/database/reset", post(handlers::database::reset));

    // Id-addressed screens
    let router = records::routes::<Product>(router, "/api/products");
    let router = records::routes::<Employee>(router, "/api/team");
    let router = records::routes::<DocumentFile>(router, "/api/documents");
    let router = records::routes::<LabDevice>(router, "/api/lab-equipment");
    let router = records::routes::<ReservedItem>(router, "/api/reserved");

    router
        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB, images are inlined
        )
        .with_state(desk)
}
