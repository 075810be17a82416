//! Transports the server can be reached over.

use crate::{
    Error, FormioServer,
    auth::{ApiKey, AuthLayer},
};
use rmcp::{
    ServiceExt,
    transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    },
};
use std::net::SocketAddr;

/// Path the streamable HTTP endpoint is mounted at.
pub const MCP_PATH: &str = "/mcp";

/// Serve over stdin/stdout until the client disconnects.
pub async fn serve_stdio(server: FormioServer) -> Result<(), Error> {
    tracing::info!(formio = server.client.base_url(), "serving MCP over stdio");
    let quit_reason = server
        .serve(rmcp::transport::stdio())
        .await?
        .waiting()
        .await?;
    tracing::info!(?quit_reason, "MCP server stopped");
    Ok(())
}

/// Build the axum app for the streamable HTTP transport.
///
/// Each MCP session gets its own clone of `server`; clones share the
/// FormIO connection pool. Any `Some` key installs [`AuthLayer`], so an
/// empty key locks the endpoint rather than opening it.
pub fn router(server: FormioServer, api_key: Option<String>) -> axum::Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );
    let app = axum::Router::new().nest_service(MCP_PATH, service);
    match api_key {
        Some(key) => app.layer(AuthLayer::new(ApiKey::new(key))),
        None => app,
    }
}

/// Serve streamable HTTP on `bind` until Ctrl-C.
pub async fn serve_http(
    server: FormioServer,
    bind: SocketAddr,
    api_key: Option<String>,
) -> Result<(), Error> {
    if api_key.is_none() && !bind.ip().is_loopback() {
        tracing::warn!(%bind, "serving without an API key on a non-loopback address");
    }
    let formio = server.client.base_url().to_owned();
    let app = router(server, api_key);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, path = MCP_PATH, %formio, "serving MCP over HTTP");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use crate::{FormioServer, transport::router};
    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server() -> FormioServer {
        let client = formio::Client::new("https://example.form.io").unwrap();
        FormioServer::new(client, None)
    }

    #[tokio::test]
    async fn api_key_guards_the_endpoint() {
        let app = router(server(), Some("k".into()));
        let req = Request::post("/mcp").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_api_key_still_guards_the_endpoint() {
        let app = router(server(), Some(String::new()));
        let req = Request::post("/mcp")
            .header(http::header::AUTHORIZATION, "Bearer ")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let app = router(server(), Some(String::new()));
        let req = Request::post("/mcp").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let app = router(server(), None);
        let req = Request::get("/other").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
