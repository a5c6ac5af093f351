use anyhow::Context;
use bridge_common::init_tracing;
use clap::{Parser, Subcommand};
use notify_bridge::api::{self, AppState};
use notify_bridge::config::Config;
use notify_bridge::scope::ScopeSet;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "notify-bridge", version, about = "Notification platform credential bridge")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a locally signed internal credential
    MintToken {
        /// Remote-platform user id to bind the credential to
        #[arg(long)]
        subject: String,
        /// Scope to grant; repeat for several. Defaults to the minimal internal set.
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;
    init_tracing(&config.tracing);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::MintToken { subject, scopes } => {
            let state = AppState::from_config(&config)?;
            let scopes = (!scopes.is_empty()).then(|| scopes.into_iter().collect::<ScopeSet>());
            let credential = state.issuer.sign_internal(&subject, scopes)?;
            println!("{}", credential.token);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting notify bridge");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("parsing listen address")?;
    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("Notify bridge listening on {}", addr);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Notify bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
