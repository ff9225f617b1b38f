mod broker;
mod cli;
mod config;
mod exec;
mod kubernetes;
mod ui;

use clap::Parser;
use tracing::info;

use broker::{ClusterProvider, InfraCli};
use cli::{Cli, Command};
use config::Credentials;
use kubernetes::{KubectlCli, PodLabelProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Login => run_login().await,
        Command::Init => run_init().await,
    }
}

/// Authenticate to the broker with credentials from the environment.
async fn run_login() -> anyhow::Result<()> {
    let creds = Credentials::from_env()?;
    let infra = InfraCli::locate(config::broker_endpoint())?;
    infra.login(&creds).await?;
    println!("✅ Logged in to Infra");
    Ok(())
}

/// Pick a cluster, pick an app label, stream matching logs until the child
/// exits or is interrupted.
async fn run_init() -> anyhow::Result<()> {
    let infra = InfraCli::locate(config::broker_endpoint())?;
    let cluster = pick_cluster(&infra).await?;
    infra.activate(&cluster).await?;

    let kubectl = KubectlCli::locate()?;
    let label = pick_app_label(&kubectl).await?;
    info!("streaming logs for {label}");
    kubectl.follow_logs(&label).await
}

async fn pick_cluster(provider: &impl ClusterProvider) -> anyhow::Result<String> {
    let clusters = provider.clusters().await?;
    ui::select_one("Select cluster", &clusters)
}

async fn pick_app_label(provider: &impl PodLabelProvider) -> anyhow::Result<String> {
    let labels = provider.app_labels().await?;
    ui::select_one("Select app label", &labels)
}
