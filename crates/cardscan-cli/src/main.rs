//! cardscan: command-line client for the cardscan API.
//!
//! The API URL comes from `--api-url`, `CARDSCAN_API_URL` or defaults to
//! http://localhost:8501.

use anyhow::Context;
use cardscan_cli::{init_tracing, resolve_api_url, ApiClient};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cardscan", about = "Credit card image analysis CLI")]
struct Cli {
    /// Base URL of the cardscan API
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a card image and print the validation report
    Analyze {
        /// Path to a PNG or JPEG card image
        file: std::path::PathBuf,
    },
    /// Print the API readiness status
    Health,
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let api_url = resolve_api_url(cli.api_url, std::env::var("CARDSCAN_API_URL").ok());
    let client = ApiClient::new(api_url)?;

    match cli.command {
        Commands::Analyze { file } => {
            let response = client.analyze_card(&file).await?;
            print_json(&response)?;
            if let Some(status) = response["report"]["status"].as_str() {
                eprintln!("Validation status: {}", status);
            }
        }
        Commands::Health => {
            let response = client.readiness().await?;
            print_json(&response)?;
        }
    }

    Ok(())
}
