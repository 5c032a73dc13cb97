//! MCP groups server: entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use mcp_groups_server::config::load_config;
use mcp_groups_server::{GroupServer, StdioTransport};

#[derive(Parser)]
#[command(
    name = "mcp-groups-server",
    about = "MCP server exposing hierarchical groups over groups/list",
    version
)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server capabilities and registered groups as JSON.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // Logs go to stderr; stdout carries the protocol.
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let server = Arc::new(GroupServer::from_config(&config)?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let transport = StdioTransport::new(server);
            transport.run().await?;
        }

        Commands::Info => {
            let init = server.initialize_result();
            let groups = server.list_groups();
            let info = serde_json::json!({
                "server": init.server_info,
                "protocol_version": init.protocol_version,
                "capabilities": init.capabilities,
                "groups": groups.iter().map(|g| &g.name).collect::<Vec<_>>(),
                "group_count": groups.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
