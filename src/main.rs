use std::net::SocketAddr;

use recruitment_portal::{
    config::{Config, LogFormat},
    connect_storage, routes, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tokio::fs::create_dir_all(&config.uploads_dir).await?;
    let storage = connect_storage(&config).await?;
    info!(backend = ?config.storage_backend, "storage ready");

    let addr: SocketAddr = config.server_address.parse()?;
    let app = routes::router(AppState::new(config, storage));

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
