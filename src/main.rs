use anyhow::Result;
use clap::Parser;

use license_report::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
