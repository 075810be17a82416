//! Request and response shapes exchanged with FormIO.
//!
//! FormIO resources (forms, submissions, roles, users) are passed through as
//! raw JSON; only the envelopes the client builds or assembles itself are
//! typed here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authenticated FormIO session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// JWT to send in the `x-jwt-token` header of later requests.
    pub token: String,
    /// The user record FormIO returned with the login.
    pub user: Value,
}

/// One page of a FormIO collection.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub items: Vec<Value>,
    /// Size of the whole collection, not just this page.
    pub total: u64,
    pub limit: u32,
    pub skip: u32,
}

impl Page {
    pub(crate) fn new(items: Vec<Value>, content_range: Option<&str>, limit: u32, skip: u32) -> Self {
        let total = content_range
            .and_then(content_range_total)
            .unwrap_or(items.len() as u64);
        Self {
            items,
            total,
            limit,
            skip,
        }
    }
}

/// Parse the collection size out of a `Content-Range` header.
///
/// FormIO sends `<first>-<last>/<total>`, or `*/<total>` for an empty page.
/// An unknown total (`*`) yields `None`.
pub fn content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

/// Fields of a role to create or update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

/// Login and registration payload.
#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub data: CredentialData<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CredentialData<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> Credentials<'a> {
    pub fn new(email: &'a str, password: &'a str) -> Self {
        Self {
            data: CredentialData { email, password },
        }
    }
}

/// Submission payload: FormIO stores the user's answers under `data`.
#[derive(Debug, Serialize)]
pub(crate) struct SubmissionBody<'a> {
    pub data: &'a Value,
}

#[cfg(test)]
mod tests {
    use crate::model::{Credentials, Page, RoleInput, content_range_total};
    use serde_json::json;

    #[test]
    fn parses_content_range() {
        assert_eq!(content_range_total("0-9/42"), Some(42));
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("0-9/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }

    #[test]
    fn page_total_falls_back_to_item_count() {
        let page = Page::new(vec![json!({}), json!({})], None, 10, 0);
        assert_eq!(page.total, 2);
        let page = Page::new(vec![json!({})], Some("5-5/6"), 1, 5);
        assert_eq!(page.total, 6);
    }

    #[test]
    fn credentials_are_wrapped_in_data() {
        let body = serde_json::to_value(Credentials::new("a@b.c", "pw")).unwrap();
        assert_eq!(body, json!({"data": {"email": "a@b.c", "password": "pw"}}));
    }

    #[test]
    fn role_input_omits_unset_fields() {
        let role = RoleInput {
            title: "Editor".into(),
            admin: Some(false),
            ..Default::default()
        };
        let body = serde_json::to_value(role).unwrap();
        assert_eq!(body, json!({"title": "Editor", "admin": false}));
    }
}
