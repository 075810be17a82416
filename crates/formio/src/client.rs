//! HTTP client for the FormIO REST API.

use crate::{
    error::{Error, Result},
    model::{Credentials, Page, RoleInput, Session, SubmissionBody},
};
use reqwest::{
    Method, RequestBuilder, Response, StatusCode, Url,
    header::{CONTENT_RANGE, HeaderMap},
};
use serde_json::Value;
use std::time::Duration;

/// Header FormIO uses for JWT authentication, in both directions.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Request timeout applied when the builder is not given one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl ClientBuilder {
    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the base URL and build the client.
    pub fn build(self) -> Result<Client> {
        let invalid = |reason: &str| Error::InvalidUrl {
            url: self.base_url.clone(),
            reason: reason.into(),
        };
        let base = Url::parse(self.base_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if base.cannot_be_a_base() || base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("expected a plain base URL"));
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;
        Ok(Client { http, base })
    }
}

/// Async FormIO client bound to one project URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base: Url,
}

impl Client {
    /// Start building a client for the project at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("formio-rs/", env!("CARGO_PKG_VERSION")).into(),
        }
    }

    /// Client with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// The project URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    // -- users & authentication --

    /// Register a user through the project's `user/register` form.
    pub async fn register_user(&self, email: &str, password: &str) -> Result<Session> {
        self.login_at(&["user", "register"], email, password).await
    }

    /// Log a user in and return their session token.
    pub async fn user_login(&self, email: &str, password: &str) -> Result<Session> {
        self.login_at(&["user", "login"], email, password).await
    }

    /// Log an admin in and return their session token.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Session> {
        self.login_at(&["admin", "login"], email, password).await
    }

    /// The user the token belongs to.
    pub async fn current_user(&self, token: Option<&str>) -> Result<Value> {
        let resp = self
            .send(self.request(Method::GET, &["current"], token)?)
            .await?;
        Ok(resp.json().await?)
    }

    /// Users are submissions of the `user` resource.
    pub async fn list_users(&self, limit: u32, skip: u32, token: Option<&str>) -> Result<Page> {
        self.page(&["user", "submission"], limit, skip, token).await
    }

    // -- forms --

    pub async fn list_forms(&self, limit: u32, skip: u32, token: Option<&str>) -> Result<Page> {
        self.page(&["form"], limit, skip, token).await
    }

    /// Fetch a form by its id, or by its path when `form` is not an id.
    pub async fn get_form(&self, form: &str, token: Option<&str>) -> Result<Value> {
        let form = form.trim_matches('/');
        let segments: Vec<&str> = if is_object_id(form) {
            vec!["form", form]
        } else {
            form.split('/').collect()
        };
        let resp = self
            .send(self.request(Method::GET, &segments, token)?)
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn create_form(&self, form: &Value, token: Option<&str>) -> Result<Value> {
        let resp = self
            .send(self.request(Method::POST, &["form"], token)?.json(form))
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn update_form(&self, form_id: &str, form: &Value, token: Option<&str>) -> Result<Value> {
        let resp = self
            .send(self.request(Method::PUT, &["form", form_id], token)?.json(form))
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_form(&self, form_id: &str, token: Option<&str>) -> Result<()> {
        self.send(self.request(Method::DELETE, &["form", form_id], token)?)
            .await?;
        Ok(())
    }

    // -- submissions --

    pub async fn create_submission(
        &self,
        form_id: &str,
        data: &Value,
        token: Option<&str>,
    ) -> Result<Value> {
        let resp = self
            .send(
                self.request(Method::POST, &["form", form_id, "submission"], token)?
                    .json(&SubmissionBody { data }),
            )
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn list_submissions(
        &self,
        form_id: &str,
        limit: u32,
        skip: u32,
        token: Option<&str>,
    ) -> Result<Page> {
        self.page(&["form", form_id, "submission"], limit, skip, token)
            .await
    }

    pub async fn get_submission(
        &self,
        form_id: &str,
        submission_id: &str,
        token: Option<&str>,
    ) -> Result<Value> {
        let resp = self
            .send(self.request(
                Method::GET,
                &["form", form_id, "submission", submission_id],
                token,
            )?)
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn update_submission(
        &self,
        form_id: &str,
        submission_id: &str,
        data: &Value,
        token: Option<&str>,
    ) -> Result<Value> {
        let resp = self
            .send(
                self.request(
                    Method::PUT,
                    &["form", form_id, "submission", submission_id],
                    token,
                )?
                .json(&SubmissionBody { data }),
            )
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_submission(
        &self,
        form_id: &str,
        submission_id: &str,
        token: Option<&str>,
    ) -> Result<()> {
        self.send(self.request(
            Method::DELETE,
            &["form", form_id, "submission", submission_id],
            token,
        )?)
        .await?;
        Ok(())
    }

    // -- roles --

    /// FormIO pages the role index like any other collection.
    pub async fn list_roles(&self, limit: u32, skip: u32, token: Option<&str>) -> Result<Page> {
        self.page(&["role"], limit, skip, token).await
    }

    pub async fn create_role(&self, role: &RoleInput, token: Option<&str>) -> Result<Value> {
        let resp = self
            .send(self.request(Method::POST, &["role"], token)?.json(role))
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn update_role(
        &self,
        role_id: &str,
        role: &RoleInput,
        token: Option<&str>,
    ) -> Result<Value> {
        let resp = self
            .send(self.request(Method::PUT, &["role", role_id], token)?.json(role))
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_role(&self, role_id: &str, token: Option<&str>) -> Result<()> {
        self.send(self.request(Method::DELETE, &["role", role_id], token)?)
            .await?;
        Ok(())
    }

    // -- plumbing --

    /// Join path segments onto the base URL.
    ///
    /// Each segment is percent-encoded, so an id cannot add path components.
    /// Empty, `.` and `..` segments are rejected: the URL parser would drop
    /// or resolve them and the request would land on the parent route.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(Error::InvalidId((*bad).to_owned()));
        }
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        tracing::debug!(%method, path = url.path(), "formio request");
        let builder = self.http.request(method, url);
        Ok(match token.filter(|t| !t.is_empty()) {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder,
        })
    }

    /// Send a request, turning non-success statuses into [`Error::Api`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::debug!(%status, %message, "formio request failed");
        Err(Error::Api { status, message })
    }

    async fn login_at(&self, segments: &[&str], email: &str, password: &str) -> Result<Session> {
        let resp = self
            .send(
                self.request(Method::POST, segments, None)?
                    .json(&Credentials::new(email, password)),
            )
            .await?;
        let token = jwt_token(resp.headers()).ok_or(Error::MissingToken)?;
        let user = resp.json().await?;
        Ok(Session { token, user })
    }

    async fn page(
        &self,
        segments: &[&str],
        limit: u32,
        skip: u32,
        token: Option<&str>,
    ) -> Result<Page> {
        if limit == 0 {
            return Err(Error::InvalidLimit);
        }
        let resp = self
            .send(
                self.request(Method::GET, segments, token)?
                    .query(&[("limit", limit), ("skip", skip)]),
            )
            .await?;
        let range = resp
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let items: Vec<Value> = resp.json().await?;
        Ok(Page::new(items, range.as_deref(), limit, skip))
    }
}

fn jwt_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// FormIO reports errors either as plain text or as a JSON object with a
/// `message` field.
fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = obj.get("message") {
            return message.clone();
        }
    }
    if body.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_owned()
    } else {
        body.to_owned()
    }
}

/// MongoDB object ids are 24 hex characters.
fn is_object_id(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}
