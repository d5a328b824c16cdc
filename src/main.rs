use std::net::SocketAddr;

use anyhow::Context;
use technews::{init_db, make_router, run_app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> technews::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("technews=info")),
        )
        .init();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let db = init_db(&db_url).await?;
    let router = make_router();
    tracing::info!("server started on {}", addr);
    run_app(router, addr, db).await
}
