//! InfraNodus MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server for the InfraNodus text network
//! analysis API. Provides tools for knowledge graphs, content gaps, research
//! questions, text comparison, SEO analysis and graph-based memory.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use infranodus_mcp_server::config::{infranodus, Config};
use infranodus_mcp_server::infranodus::client::InfraNodusClient;
use infranodus_mcp_server::mcp::server::McpServer;
use infranodus_mcp_server::mcp::tools::catalog;

/// InfraNodus MCP Server
#[derive(Parser)]
#[command(name = "infranodus-mcp-server")]
#[command(author, version, about = "InfraNodus MCP Server - A Model Context Protocol server for InfraNodus")]
struct Cli {
    /// InfraNodus API key (overrides INFRANODUS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// InfraNodus API base URL (overrides INFRANODUS_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tool catalogue as JSON and exit
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Tools) => {
            let tools = serde_json::to_string_pretty(&catalog())
                .context("failed to encode tool catalogue")?;
            println!("{}", tools);
        }
        None => {
            let config = load_config(cli.api_key, cli.api_base)?;
            run_server(config).await?;
        }
    }

    Ok(())
}

fn load_config(api_key: Option<String>, api_base: Option<String>) -> anyhow::Result<Config> {
    let env = Config::from_env().context("invalid InfraNodus configuration")?;
    if api_key.is_none() && api_base.is_none() {
        return Ok(env);
    }

    Config::new(
        api_key.or(env.api_key),
        api_base.unwrap_or(env.api_base),
    )
    .context("invalid InfraNodus configuration")
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    if !config.has_api_key() {
        tracing::warn!(
            "{} is not set; requests are anonymous and rate-limited. Get a key at {}",
            infranodus::API_KEY_ENV,
            infranodus::API_ACCESS_URL
        );
    }
    tracing::info!("Using InfraNodus API at {}", config.api_base);

    let client = Arc::new(InfraNodusClient::new(&config));

    let mut server = McpServer::new(client);
    server.run_stdio().await?;

    Ok(())
}
