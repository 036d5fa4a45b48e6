//! MongoDB Bootstrap - Entry Point

use clap::Parser;
use core_config::tracing::install_color_eyre;
use mongo_bootstrap::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    mongo_bootstrap::run(Cli::parse()).await
}
