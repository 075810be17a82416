//! Binary entry point for the mcp-formio-server MCP server.

use anyhow::Context;
use clap::Parser;
use mcp_formio_server::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the stdio transport; logs go to stderr and only on request.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let cli = Cli::parse();
    let transport = cli.transport;
    cli.run()
        .await
        .with_context(|| format!("mcp-formio-server ({transport:?} transport) failed"))
}
