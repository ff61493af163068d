//! cdpcurl: curl-like client that signs every request with an API key JWT.

use std::{collections::HashMap, path::PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use http::{header::CONTENT_TYPE, Method, Request, StatusCode};

use cdpcurl::{config::KeyLoaderConfig, AuthTransport, Transport, UreqTransport, DEFAULT_SERVICE_NAME};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "cdpcurl")]
#[command(about = "Send HTTP requests authenticated with a Coinbase Cloud API key")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HTTP Body
    #[arg(short = 'd', long, default_value = "")]
    data: String,

    /// API Key Path
    #[arg(short = 'k', long)]
    api_key_path: Option<PathBuf>,

    /// HTTP Method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// HTTP Header, as a JSON object of name to value
    #[arg(short = 'H', long)]
    header: Option<String>,

    /// Print the version number and exit
    #[arg(short = 'v', long)]
    version: bool,

    /// API Key ID (only works with Ed25519 keys)
    #[arg(short = 'i', long)]
    id: Option<String>,

    /// API Key Secret (only works with Ed25519 keys)
    #[arg(short = 's', long)]
    secret: Option<String>,

    /// Request URL
    url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the version number of cdpcurl
    #[command(visible_alias = "v")]
    Version,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.version || matches!(cli.command, Some(Commands::Version)) {
        println!("v{VERSION}");
        return Ok(());
    }

    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(url) = cli.url.as_deref() else {
        bail!("URL is required unless using -v");
    };

    let transport = AuthTransport::new(DEFAULT_SERVICE_NAME, UreqTransport::new(), &loader_config(&cli))?;
    let request = build_request(&cli, url)?;
    let response = transport.send(request)?;

    println!("{}", status_line(response.status()));
    println!("{}", String::from_utf8_lossy(response.body()));
    Ok(())
}

fn loader_config(cli: &Cli) -> KeyLoaderConfig {
    let mut builder = KeyLoaderConfig::builder();
    if let Some(path) = &cli.api_key_path {
        builder = builder.path(path);
    }
    if let (Some(id), Some(secret)) = (&cli.id, &cli.secret) {
        builder = builder.direct(id.as_str(), secret.as_str());
    }
    builder.build()
}

fn build_request(cli: &Cli, url: &str) -> anyhow::Result<Request<Vec<u8>>> {
    let method = Method::from_bytes(cli.method.as_bytes())
        .with_context(|| format!("invalid HTTP method {:?}", cli.method))?;

    let mut builder = Request::builder().method(method.clone()).uri(url);

    match &cli.header {
        Some(raw) => {
            let headers: HashMap<String, String> =
                serde_json::from_str(raw).context("parsing --header as a JSON object")?;
            for (name, value) in headers {
                builder = builder.header(name, value);
            }
        }
        None if method == Method::POST => {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        None => {}
    }

    builder
        .body(cli.data.clone().into_bytes())
        .with_context(|| format!("building request for {url}"))
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
