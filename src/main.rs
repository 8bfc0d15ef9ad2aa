use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use gradebookd::config::Config;
use gradebookd::{db, http};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    let cfg = Config::from_env()?;
    let conn = db::open_db(&cfg.data_dir)?;
    let state = http::AppState::new(conn);

    let router = http::build_router(state).layer(CorsLayer::very_permissive());

    let listener = TcpListener::bind(cfg.bind_addr).await?;
    info!(addr = %cfg.bind_addr, data_dir = %cfg.data_dir.display(), "gradebookd listening");
    axum::serve(listener, router).await?;
    Ok(())
}
