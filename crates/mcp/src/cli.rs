//! Command line and environment configuration.

use crate::{Error, FormioServer, transport};
use clap::{Parser, ValueEnum};
use std::{net::SocketAddr, time::Duration};

/// FormIO MCP Server: exposes FormIO forms, submissions, roles and users as MCP tools.
#[derive(Parser, Debug)]
#[command(name = "mcp-formio-server", version, about)]
pub struct Cli {
    /// Base URL of the FormIO project (e.g. https://myproject.form.io).
    #[arg(long, env = "FORMIO_URL", value_name = "URL")]
    pub formio_url: String,

    /// JWT used by tools that are called without a token.
    #[arg(long, env = "FORMIO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Timeout for each FormIO request, in seconds.
    #[arg(long, env = "FORMIO_TIMEOUT", default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    /// How MCP clients connect to the server.
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value = "stdio")]
    pub transport: Transport,

    /// Listen address for the HTTP transport.
    #[arg(long, env = "MCP_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Bearer key HTTP clients must present.
    #[arg(
        long,
        env = "MCP_API_KEY",
        hide_env_values = true,
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP under /mcp.
    Http,
}

impl Cli {
    /// Build the FormIO client; fails on a malformed URL.
    pub fn client(&self) -> Result<formio::Client, Error> {
        let client = formio::Client::builder(&self.formio_url)
            .timeout(Duration::from_secs(self.timeout))
            .user_agent(concat!("mcp-formio-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    /// Validate the configuration and serve on the selected transport.
    pub async fn run(self) -> Result<(), Error> {
        let server = FormioServer::new(self.client()?, self.token);
        match self.transport {
            Transport::Stdio => transport::serve_stdio(server).await,
            Transport::Http => transport::serve_http(server, self.bind, self.api_key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Transport};
    use clap::Parser;

    #[test]
    fn defaults() {
        let cli =
            Cli::try_parse_from(["mcp-formio-server", "--formio-url", "https://example.form.io"])
                .unwrap();
        assert_eq!(cli.transport, Transport::Stdio);
        assert_eq!(cli.bind, "127.0.0.1:8000".parse::<std::net::SocketAddr>().unwrap());
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.token, None);
        assert_eq!(cli.api_key, None);
        assert_eq!(cli.client().unwrap().base_url(), "https://example.form.io");
    }

    #[test]
    fn http_transport_with_key() {
        let cli = Cli::try_parse_from([
            "mcp-formio-server",
            "--formio-url",
            "http://localhost:3001",
            "--transport",
            "http",
            "--bind",
            "0.0.0.0:9000",
            "--api-key",
            "k",
            "--timeout",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.transport, Transport::Http);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.timeout, 5);
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let result = Cli::try_parse_from([
            "mcp-formio-server",
            "--formio-url",
            "https://example.form.io",
            "--transport",
            "http",
            "--api-key",
            "",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_url_fails_before_serving() {
        let cli = Cli::try_parse_from(["mcp-formio-server", "--formio-url", "myproject"]).unwrap();
        assert!(cli.client().is_err());
    }

    #[test]
    fn unknown_transport_is_rejected() {
        let result = Cli::try_parse_from([
            "mcp-formio-server",
            "--formio-url",
            "https://example.form.io",
            "--transport",
            "sse",
        ]);
        assert!(result.is_err());
    }
}
