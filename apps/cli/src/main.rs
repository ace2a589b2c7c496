//! CampaignForge CLI: AI-assisted marketing campaign generation.
//!
//! Generates weekly topics, campaign plans, content, and engagement
//! simulations from a company profile, and analyzes websites for brand visuals.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
