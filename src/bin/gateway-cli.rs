use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query a running explorer gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8088")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current chain head
    CurrentBlock,
    /// Show the current gas price
    Fees,
    /// Look up one transaction by hash
    Transaction { hash: String },
    /// List every transaction touching an account
    Transactions { address: String },
    /// Show an account's balance
    Balance { address: String },
}

impl Commands {
    fn path(&self) -> String {
        match self {
            Commands::CurrentBlock => "/blocks/current".to_string(),
            Commands::Fees => "/fees".to_string(),
            Commands::Transaction { hash } => format!("/transactions/{}", hash),
            Commands::Transactions { address } => format!("/accounts/{}/transactions", address),
            Commands::Balance { address } => format!("/accounts/{}/balance", address),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.command.path());
    let res = client.get(url).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
