use anyhow::Result;
use clap::Parser;
use finboard::cli::Cli;
use finboard::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run().await
}
