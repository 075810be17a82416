//! Async client for the [FormIO](https://form.io) REST API.
//!
//! Covers the resources an MCP agent works with: users and authentication,
//! forms, submissions and roles. Resource bodies are kept as raw
//! [`serde_json::Value`]s since their schema is owned by the FormIO project.
//!
//! ```rust,ignore
//! let client = formio::Client::new("https://myproject.form.io")?;
//! let session = client.user_login("me@example.com", "secret").await?;
//! let forms = client.list_forms(10, 0, Some(&session.token)).await?;
//! ```

mod client;
mod error;
mod model;

pub use client::{Client, ClientBuilder, DEFAULT_TIMEOUT, TOKEN_HEADER};
pub use error::{Error, Result};
pub use model::{Page, RoleInput, Session, content_range_total};
