//! Bearer key protection for the streamable HTTP transport.
//!
//! The stdio transport is trusted by construction (the client spawned us),
//! but an HTTP listener is reachable by anyone who can connect. When an API
//! key is configured, [`AuthLayer`] rejects every request that does not
//! present it as `Authorization: Bearer <key>`.
//!
//! ```rust,ignore
//! let app = axum::Router::new()
//!     .nest_service("/mcp", service)
//!     .layer(AuthLayer::new(ApiKey::new("secret")));
//! ```

use axum::response::IntoResponse;
use futures::future::BoxFuture;
use http::{Request, Response, StatusCode, header};
use std::{
    sync::Arc,
    task::{Context, Poll},
};

/// Decides whether a request may reach the MCP service.
pub trait Authenticator: Clone + Send + Sync + 'static {
    /// Return `Err` with a human-readable reason to reject the request.
    fn authenticate(
        &self,
        parts: &http::request::Parts,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

/// Static API key expected as a Bearer token.
#[derive(Clone)]
pub struct ApiKey {
    key: Arc<str>,
}

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self { key: key.into() }
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

impl Authenticator for ApiKey {
    async fn authenticate(&self, parts: &http::request::Parts) -> Result<(), String> {
        let presented = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| "missing or malformed Authorization header".to_string())?;

        if self.key.is_empty() {
            return Err("no API key is accepted".into());
        }
        if constant_time_eq(presented.trim().as_bytes(), self.key.as_bytes()) {
            Ok(())
        } else {
            Err("invalid API key".into())
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Tower [`Layer`](tower::Layer) that applies [`AuthService`].
#[derive(Clone)]
pub struct AuthLayer<A> {
    authenticator: A,
}

impl<A> AuthLayer<A> {
    pub fn new(authenticator: A) -> Self {
        Self { authenticator }
    }
}

impl<A, S> tower::Layer<S> for AuthLayer<A>
where
    A: Clone,
{
    type Service = AuthService<A, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            authenticator: self.authenticator.clone(),
            inner,
        }
    }
}

/// Tower service that authenticates requests before forwarding them.
#[derive(Clone)]
pub struct AuthService<A, S> {
    authenticator: A,
    inner: S,
}

impl<A, S, B> tower::Service<Request<B>> for AuthService<A, S>
where
    A: Authenticator,
    S: tower::Service<Request<B>, Response = Response<axum::body::Body>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        // `poll_ready` reserved capacity on `self.inner`; hand that one to the future.
        let mut inner = self.inner.clone();
        std::mem::swap(&mut self.inner, &mut inner);

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            match authenticator.authenticate(&parts).await {
                Ok(()) => inner.call(Request::from_parts(parts, body)).await,
                Err(reason) => {
                    tracing::warn!(uri = %parts.uri, %reason, "rejected unauthenticated request");
                    Ok((
                        StatusCode::UNAUTHORIZED,
                        [(header::WWW_AUTHENTICATE, "Bearer")],
                        reason,
                    )
                        .into_response())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::{ApiKey, AuthLayer, constant_time_eq};
    use axum::{Router, body::Body, routing::get};
    use http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/mcp", get(|| async { "ok" }))
            .layer(AuthLayer::new(ApiKey::new("s3cret")))
    }

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/mcp");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn accepts_matching_key() {
        let resp = app().oneshot(request(Some("Bearer s3cret"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let resp = app().oneshot(request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn rejects_wrong_key() {
        let resp = app().oneshot(request(Some("Bearer nope"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = app().oneshot(request(Some("Basic s3cret"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_key_accepts_nothing() {
        let app = Router::new()
            .route("/mcp", get(|| async { "ok" }))
            .layer(AuthLayer::new(ApiKey::new("")));
        let resp = app.clone().oneshot(request(Some("Bearer "))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = app.oneshot(request(Some("Bearer  "))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn compares_whole_keys() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
