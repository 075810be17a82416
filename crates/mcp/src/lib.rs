//! MCP server exposing the FormIO REST API as tools.
//!
//! Every tool maps to one FormIO request made through [`formio::Client`]:
//! authentication and user management, forms, submissions and roles.
//! FormIO failures come back as tool results flagged `isError`, so the
//! agent sees the API's own message.

use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};

pub mod auth;
pub mod cli;
pub mod error;
pub mod params;
pub mod tools;
pub mod transport;

pub use error::Error;

/// MCP server backed by one FormIO project.
#[derive(Debug, Clone)]
pub struct FormioServer {
    pub(crate) client: formio::Client,
    /// Used by tools whose caller did not pass a token.
    pub(crate) default_token: Option<String>,
    pub(crate) tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for FormioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-formio-server".into(),
                title: Some("FormIO MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "FormIO server for managing forms, submissions, roles and users. \
                 Authenticate first with authenticate_user or authenticate_admin, then pass \
                 the returned token to tools that need it."
                    .into(),
            ),
        }
    }
}
