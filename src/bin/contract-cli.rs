use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use api_contract::client::{CallArgs, Dispatcher, ResponseBody};
use api_contract::config::{load_config, ClientConfig};
use api_contract::contract::{load_contract, Method};
use api_contract::{observability, query};

#[derive(Parser)]
#[command(name = "contract-cli")]
#[command(about = "Inspect an API contract and call its routes", long_about = None)]
struct Cli {
    /// Client configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Contract file (TOML)
    #[arg(short = 'k', long)]
    contract: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every declared route
    Routes,
    /// Dispatch one call through the contract
    Call {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: Method,

        /// Concrete request path, e.g. /posts/1/comments
        path: String,

        /// Query entry as key=value; bracketed keys nest (a[b]=1)
        #[arg(short, long = "query")]
        query: Vec<String>,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    observability::logging::init(&config.observability)?;
    observability::metrics::register_dispatch_metrics();

    let contract = load_contract(&cli.contract)?;

    match cli.command {
        Commands::Routes => {
            for (key, route) in contract.routes() {
                match route.summary_text() {
                    Some(summary) => {
                        println!("{:<24} {:<6} {}  {}", key, route.method(), route.path(), summary)
                    }
                    None => println!("{:<24} {:<6} {}", key, route.method(), route.path()),
                }
            }
        }
        Commands::Call {
            method,
            path,
            query,
            body,
        } => {
            let mut args = CallArgs::new();
            if !query.is_empty() {
                args = args.query(query::decode(&query.join("&"))?);
            }
            if let Some(body) = body {
                args = args.body(serde_json::from_str::<Value>(&body)?);
            }

            let dispatcher = Dispatcher::new(config, Arc::new(contract))?;
            let result = dispatcher.dispatch(method, &path, args).await?;

            if !result.is_success() {
                eprintln!("Error: API returned status {}", result.status);
            } else {
                println!("Status: {}", result.status);
            }
            print_body(&result.body)?;
        }
    }

    Ok(())
}

fn print_body(body: &ResponseBody) -> Result<(), Box<dyn std::error::Error>> {
    match body {
        ResponseBody::Json(json) => println!("{}", serde_json::to_string_pretty(json)?),
        ResponseBody::Text(text) => println!("{}", text),
        ResponseBody::Empty => {}
    }
    Ok(())
}
