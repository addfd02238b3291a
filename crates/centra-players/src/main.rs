use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tracing::info;

use centra_players::routes::{AppState, build_router};

#[derive(Parser)]
#[command(name = "centra-players", version, about = "Player-count relay")]
struct Args {
    /// Listen port
    #[arg(long, default_value_t = 3001, env = "PORT")]
    port: u16,

    /// Listen host
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    host: IpAddr,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    centra_core::tracing_init::init_tracing("centra_players=info,tower_http=info", args.log_json);

    let addr = SocketAddr::new(args.host, args.port);
    let app = build_router(AppState::default());
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %addr,
        "Player count API running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
        })
        .await?;

    info!("Player count API stopped");
    Ok(())
}
