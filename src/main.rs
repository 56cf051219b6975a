use bamsim::{
    EmulatorConfig, EmulatorStore, HttpServer,
    config::{parse_session_ttl, parse_sweep_interval},
    graceful_shutdown::GracefulShutdown,
    session::spawn_session_sweeper,
};
use clap::Parser;
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// In-memory emulator of the address-management REST API (v1 and v2)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on (overrides BAMSIM_BIND_ADDR)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Session token lifetime in seconds (overrides BAMSIM_SESSION_TTL_SECS)
    #[arg(long)]
    session_ttl_secs: Option<String>,

    /// Expired-session sweep interval in seconds (overrides BAMSIM_SWEEP_INTERVAL_SECS)
    #[arg(long)]
    sweep_interval_secs: Option<String>,
}

impl Args {
    fn apply(self, config: &mut EmulatorConfig) -> Result<(), bamsim::error::ConfigError> {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(ttl) = self.session_ttl_secs {
            config.session_ttl = parse_session_ttl(&ttl)?;
        }
        if let Some(interval) = self.sweep_interval_secs {
            config.sweep_interval = parse_sweep_interval(&interval)?;
        }
        config.validate()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = EmulatorConfig::from_env()?;
    args.apply(&mut config)?;

    let store = EmulatorStore::new(&config);
    info!(
        "Seeded {} zones; sessions expire after {:?}",
        store.zones.len(),
        config.session_ttl
    );

    let shutdown = GracefulShutdown::new();
    let sweeper = spawn_session_sweeper(
        store.sessions.clone(),
        config.sweep_interval,
        shutdown.subscribe(),
    );
    shutdown.register_task("session-sweeper", sweeper).await;

    let server = HttpServer::new(store, config.bind_addr);
    let listener = server.bind().await?;

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    let result = server.serve(listener, ctrl_c).await;
    shutdown.shutdown().await;
    result?;

    Ok(())
}
