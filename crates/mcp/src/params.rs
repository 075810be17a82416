//! Tool input schemas.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Arbitrary JSON object: a form definition or submission data.
pub type JsonObject = Map<String, Value>;

/// Parameters for the login and registration tools.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CredentialsParams {
    /// Email address of the account.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Parameters for tools that only need authentication.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TokenParams {
    /// JWT from an authenticate tool. Falls back to the server's configured token.
    pub token: Option<String>,
}

/// Parameters for paginated listings of forms or users.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PageParams {
    /// Maximum number of records to return (at least 1).
    pub limit: u32,
    /// Number of records to skip.
    #[serde(default)]
    pub skip: u32,
    /// JWT from an authenticate tool. Falls back to the server's configured token.
    pub token: Option<String>,
}

/// Parameters for fetching one form.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetFormParams {
    /// Form id, or the form's path (e.g. "customer/survey").
    pub form: String,
    pub token: Option<String>,
}

/// Parameters for creating a form.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateFormParams {
    /// Form definition: title, name, path, type ("form" or "resource") and
    /// components (inputs, layout elements, validation rules).
    pub data: JsonObject,
    pub token: Option<String>,
}

/// Parameters for replacing a form definition.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateFormParams {
    /// Id of the form to update.
    pub form_id: String,
    /// Complete new form definition.
    pub data: JsonObject,
    pub token: Option<String>,
}

/// Parameters addressing a single form.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FormIdParams {
    pub form_id: String,
    pub token: Option<String>,
}

/// Parameters for submitting data to a form.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateSubmissionParams {
    /// Id of the form to submit to.
    pub form_id: String,
    /// Submission values keyed by component key.
    pub data: JsonObject,
    pub token: Option<String>,
}

/// Parameters for listing a form's submissions.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SubmissionPageParams {
    pub form_id: String,
    /// Maximum number of submissions to return (at least 1).
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
    pub token: Option<String>,
}

/// Parameters addressing a single submission.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SubmissionIdParams {
    pub form_id: String,
    pub submission_id: String,
    pub token: Option<String>,
}

/// Parameters for replacing a submission's data.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateSubmissionParams {
    pub form_id: String,
    pub submission_id: String,
    /// New submission values keyed by component key.
    pub data: JsonObject,
    pub token: Option<String>,
}

/// Parameters for creating a role.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateRoleParams {
    /// Role title, e.g. "Editor".
    pub title: String,
    pub description: Option<String>,
    /// Whether members of the role have admin access to the project.
    pub admin: Option<bool>,
    /// Whether the role is given to anonymous users.
    pub default: Option<bool>,
    pub token: Option<String>,
}

/// Parameters for updating a role.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateRoleParams {
    pub role_id: String,
    pub title: String,
    pub description: Option<String>,
    pub admin: Option<bool>,
    pub default: Option<bool>,
    pub token: Option<String>,
}

/// Parameters addressing a single role.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RoleIdParams {
    pub role_id: String,
    pub token: Option<String>,
}
