mod commands;
mod config;
mod output;
mod validation;

use anyhow::Result;
use clap::Parser;

use crate::commands::query::QueryArgs;

#[derive(Parser)]
#[command(name = "openvulnquery")]
#[command(about = "Query security advisories from the Cisco PSIRT openVuln API")]
struct Cli {
    #[command(flatten)]
    query: QueryArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("openvulnquery=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    commands::query::run(&cli.query).await
}
