//! Polyhedron - Application Entry Point

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polyhedron::{
    config::CONFIG,
    create_router, db,
    state::AppState,
    testgen::{BuildLocks, Toolchain},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Polyhedron server...");

    tracing::info!("Connecting to database...");
    let db_pool = db::connection::create_pool(&CONFIG.database).await?;

    tracing::info!("Running database migrations...");
    db::test_connection(&db_pool).await?;
    db::run_migrations(&db_pool).await?;

    tracing::info!("Discovering toolchain...");
    let toolchain = Toolchain::discover(&CONFIG.toolchain, CONFIG.execution.compile_timeout).await;

    tokio::fs::create_dir_all(&CONFIG.storage.uploads_path).await?;

    let state = AppState::new(db_pool, CONFIG.clone(), toolchain, BuildLocks::new());
    let app = create_router(state);

    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
