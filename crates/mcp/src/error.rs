use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("FormIO client error: {0}")]
    Formio(#[from] formio::Error),

    #[error("MCP server initialization error: {0}")]
    ServerInit(#[from] rmcp::service::ServerInitializeError),

    #[error("MCP server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
