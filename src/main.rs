use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use furrow::{
    scenario::ScenarioLoader,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Furrow farm-tile simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/smallholding.yaml")]
    scenario: PathBuf,

    /// Address to bind the farm UI on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    web::run(WebServerConfig {
        scenario,
        host: cli.host,
        port: cli.port,
    })
    .await
}
