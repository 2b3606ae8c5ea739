use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use sdk_client::config::loader::load_config;
use sdk_client::http::raw::RawApi;
use sdk_client::{ClientOptions, Envelope, SdkClient};

#[derive(Parser)]
#[command(name = "sdk-probe")]
#[command(about = "Probe an API endpoint through the SDK wrapper", long_about = None)]
struct Cli {
    /// TOML config file; flags below are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token
    #[arg(short, long)]
    token: Option<String>,

    /// Per-call timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a GET request and print the resulting envelope
    Get { path: String },
    /// Issue a POST request with a JSON body
    Post {
        path: String,
        #[arg(short, long, default_value = "{}")]
        body: String,
    },
    /// Issue a DELETE request
    Delete { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    sdk_client::observability::logging::init();

    let cli = Cli::parse();
    let options = build_options(&cli)?;
    let client: SdkClient<RawApi> = SdkClient::new(options)?;

    let failed = match cli.command {
        Commands::Get { path } => {
            let envelope = client
                .call(|api, params| async move { api.get_json(&path, &params).await })
                .await;
            print_envelope(&envelope)?
        }
        Commands::Post { path, body } => {
            let body: Value = serde_json::from_str(&body)?;
            let envelope = client
                .call(|api, params| async move {
                    api.request_json(Method::POST, &path, Some(&body), &params).await
                })
                .await;
            print_envelope(&envelope)?
        }
        Commands::Delete { path } => {
            let envelope = client
                .call(|api, params| async move {
                    api.request_unit(Method::DELETE, &path, &params).await
                })
                .await;
            print_envelope(&envelope)?
        }
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the envelope as JSON; returns whether the call failed.
fn print_envelope<T: Serialize>(envelope: &Envelope<T>) -> Result<bool, serde_json::Error> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "data": &envelope.data,
            "error": &envelope.error,
            "status": envelope.status,
        }))?
    );
    Ok(envelope.error.is_some())
}

fn build_options(cli: &Cli) -> Result<ClientOptions, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        return Ok(load_config(path)?.into_options()?);
    }

    let mut builder = ClientOptions::builder().base_url(cli.url.clone());
    if let Some(token) = &cli.token {
        builder = builder.token(token.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        builder = builder.timeout(std::time::Duration::from_millis(ms));
    }
    Ok(builder.build()?)
}
