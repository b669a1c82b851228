use clap::Parser;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args = phantom_vault::cli::Cli::parse();
    let cfg = &phantom_vault::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let storage = phantom_vault::db::AccountStorage::connect(&cfg.database_url).await?;

    // Admin subcommands run against the same database file as the
    // server, no running server process required.
    if let Some(command) = args.command {
        phantom_vault::cli::run(&storage, command).await?;
        return Ok(());
    }

    info!(
        database_url = %cfg.database_url,
        loglevel = %cfg.loglevel,
        insecure_cookie = cfg.insecure_cookie,
    );

    let state =
        phantom_vault::router::VaultState::new(storage, &cfg.session_secret, cfg.insecure_cookie);
    let app = phantom_vault::router::vault_router(state);

    let addr = format!("{}:{}", cfg.host, args.port.unwrap_or(cfg.port));
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
