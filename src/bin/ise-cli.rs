use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "ise-cli")]
#[command(about = "Client for the ISE signing proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Plugin token sent as X-Plugin-Key.
    #[arg(short, long, default_value = "")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check proxy health
    Health,
    /// Submit an audio file for pronunciation assessment
    Assess {
        /// Raw audio file; it is base64-encoded before sending.
        #[arg(long)]
        audio: PathBuf,

        /// Reference text the speaker read.
        #[arg(long)]
        text: String,

        #[arg(long, default_value = "en_us")]
        language: String,

        #[arg(long, default_value = "read_sentence")]
        category: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Assess {
            audio,
            text,
            language,
            category,
        } => {
            let bytes = tokio::fs::read(&audio).await?;
            let body = json!({
                "audio": STANDARD.encode(bytes),
                "text": text,
                "language": language,
                "category": category,
            });

            let res = client
                .post(format!("{}/iflytek/ise", cli.url))
                .header("X-Plugin-Key", &cli.token)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
