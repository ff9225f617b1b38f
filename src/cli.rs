use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "infra-tail")]
#[command(about = "Automates Infra login and Kubernetes log streaming")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in to the Infra access broker
    Login,
    /// Pick a cluster and app label, then stream matching logs
    Init,
}
