//! Tool implementations for the FormIO MCP server.

use crate::{
    FormioServer,
    params::{
        CreateFormParams, CreateRoleParams, CreateSubmissionParams, CredentialsParams,
        FormIdParams, GetFormParams, PageParams, RoleIdParams, SubmissionIdParams,
        SubmissionPageParams, TokenParams, UpdateFormParams, UpdateRoleParams,
        UpdateSubmissionParams,
    },
};
use formio::RoleInput;
use rmcp::{handler::server::wrapper::Parameters, tool, tool_router};
use serde::Serialize;
use serde_json::{Value, json};

/// Error text returned to the agent when FormIO rejects a call.
fn api_error(err: formio::Error) -> String {
    tracing::warn!(error = %err, "tool call failed");
    format!("FormIO API error: {err}")
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

#[tool_router]
impl FormioServer {
    /// Create a new server around a FormIO client.
    pub fn new(client: formio::Client, default_token: Option<String>) -> Self {
        Self {
            client,
            default_token: default_token.filter(|t| !t.is_empty()),
            tool_router: Self::tool_router(),
        }
    }

    /// An explicit token wins over the configured one.
    fn token<'a>(&'a self, explicit: &'a Option<String>) -> Option<&'a str> {
        explicit
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.default_token.as_deref())
    }

    // -- users & authentication --

    #[tool(
        description = "Register a new user in the FormIO project with an email and password. Returns the created user and a JWT token for later requests"
    )]
    async fn create_user(
        &self,
        Parameters(params): Parameters<CredentialsParams>,
    ) -> Result<String, String> {
        let session = self
            .client
            .register_user(&params.email, &params.password)
            .await
            .map_err(api_error)?;
        to_json(&session)
    }

    #[tool(
        description = "Authenticate a user and retrieve a JWT token. Pass the token to tools that access protected resources"
    )]
    async fn authenticate_user(
        &self,
        Parameters(params): Parameters<CredentialsParams>,
    ) -> Result<String, String> {
        let session = self
            .client
            .user_login(&params.email, &params.password)
            .await
            .map_err(api_error)?;
        to_json(&session)
    }

    #[tool(
        description = "Authenticate an admin and retrieve a JWT token. Admin tokens are needed to create and change forms and roles"
    )]
    async fn authenticate_admin(
        &self,
        Parameters(params): Parameters<CredentialsParams>,
    ) -> Result<String, String> {
        let session = self
            .client
            .admin_login(&params.email, &params.password)
            .await
            .map_err(api_error)?;
        to_json(&session)
    }

    #[tool(description = "Get the user the token belongs to")]
    async fn get_current_user(
        &self,
        Parameters(params): Parameters<TokenParams>,
    ) -> Result<String, String> {
        let user = self
            .client
            .current_user(self.token(&params.token))
            .await
            .map_err(api_error)?;
        to_json(&user)
    }

    #[tool(
        description = "Retrieve a paginated list of users. Returns the users and the total count"
    )]
    async fn get_paginated_users(
        &self,
        Parameters(params): Parameters<PageParams>,
    ) -> Result<String, String> {
        let page = self
            .client
            .list_users(params.limit, params.skip, self.token(&params.token))
            .await
            .map_err(api_error)?;
        to_json(&page)
    }

    // -- forms --

    #[tool(
        description = "Retrieve a paginated list of forms. `limit` is the page size and `skip` the offset. Returns the forms and the total count"
    )]
    async fn get_paginated_forms(
        &self,
        Parameters(params): Parameters<PageParams>,
    ) -> Result<String, String> {
        let page = self
            .client
            .list_forms(params.limit, params.skip, self.token(&params.token))
            .await
            .map_err(api_error)?;
        to_json(&page)
    }

    #[tool(description = "Get a single form definition by id or by path")]
    async fn get_form(
        &self,
        Parameters(params): Parameters<GetFormParams>,
    ) -> Result<String, String> {
        let form = self
            .client
            .get_form(&params.form, self.token(&params.token))
            .await
            .map_err(api_error)?;
        to_json(&form)
    }

    #[tool(
        description = "Create a new form from a JSON definition of its components (input fields, layout elements such as columns, panels and tabs), validation rules and submission settings. Returns the created form"
    )]
    async fn create_form(
        &self,
        Parameters(params): Parameters<CreateFormParams>,
    ) -> Result<String, String> {
        let token = self.token(&params.token);
        let form = self
            .client
            .create_form(&Value::Object(params.data), token)
            .await
            .map_err(api_error)?;
        to_json(&form)
    }

    #[tool(description = "Replace the definition of an existing form. Returns the updated form")]
    async fn update_form(
        &self,
        Parameters(params): Parameters<UpdateFormParams>,
    ) -> Result<String, String> {
        let token = self.token(&params.token);
        let form = self
            .client
            .update_form(&params.form_id, &Value::Object(params.data), token)
            .await
            .map_err(api_error)?;
        to_json(&form)
    }

    #[tool(description = "Delete a form and its submissions")]
    async fn delete_form(
        &self,
        Parameters(params): Parameters<FormIdParams>,
    ) -> Result<String, String> {
        self.client
            .delete_form(&params.form_id, self.token(&params.token))
            .await
            .map_err(api_error)?;
        to_json(&json!({ "deleted": params.form_id }))
    }

    // -- submissions --

    #[tool(
        description = "Submit data to a form. `data` holds the values keyed by component key. Returns the stored submission"
    )]
    async fn create_submission(
        &self,
        Parameters(params): Parameters<CreateSubmissionParams>,
    ) -> Result<String, String> {
        let token = self.token(&params.token);
        let submission = self
            .client
            .create_submission(&params.form_id, &Value::Object(params.data), token)
            .await
            .map_err(api_error)?;
        to_json(&submission)
    }

    #[tool(
        description = "Retrieve a paginated list of a form's submissions. Returns the submissions and the total count"
    )]
    async fn get_paginated_submissions(
        &self,
        Parameters(params): Parameters<SubmissionPageParams>,
    ) -> Result<String, String> {
        let page = self
            .client
            .list_submissions(
                &params.form_id,
                params.limit,
                params.skip,
                self.token(&params.token),
            )
            .await
            .map_err(api_error)?;
        to_json(&page)
    }

    #[tool(description = "Get a single submission of a form")]
    async fn get_submission(
        &self,
        Parameters(params): Parameters<SubmissionIdParams>,
    ) -> Result<String, String> {
        let submission = self
            .client
            .get_submission(
                &params.form_id,
                &params.submission_id,
                self.token(&params.token),
            )
            .await
            .map_err(api_error)?;
        to_json(&submission)
    }

    #[tool(description = "Replace the data of an existing submission. Returns the updated submission")]
    async fn update_submission(
        &self,
        Parameters(params): Parameters<UpdateSubmissionParams>,
    ) -> Result<String, String> {
        let token = self.token(&params.token);
        let submission = self
            .client
            .update_submission(
                &params.form_id,
                &params.submission_id,
                &Value::Object(params.data),
                token,
            )
            .await
            .map_err(api_error)?;
        to_json(&submission)
    }

    #[tool(description = "Delete a submission")]
    async fn delete_submission(
        &self,
        Parameters(params): Parameters<SubmissionIdParams>,
    ) -> Result<String, String> {
        self.client
            .delete_submission(
                &params.form_id,
                &params.submission_id,
                self.token(&params.token),
            )
            .await
            .map_err(api_error)?;
        to_json(&json!({ "deleted": params.submission_id }))
    }

    // -- roles --

    #[tool(description = "List the project's roles, one page at a time. Returns items and total")]
    async fn list_roles(
        &self,
        Parameters(params): Parameters<PageParams>,
    ) -> Result<String, String> {
        let page = self
            .client
            .list_roles(params.limit, params.skip, self.token(&params.token))
            .await
            .map_err(api_error)?;
        to_json(&page)
    }

    #[tool(description = "Create a role. Returns the created role with its id")]
    async fn create_role(
        &self,
        Parameters(params): Parameters<CreateRoleParams>,
    ) -> Result<String, String> {
        let CreateRoleParams {
            title,
            description,
            admin,
            default,
            token,
        } = params;
        let input = RoleInput {
            title,
            description,
            admin,
            default,
        };
        let role = self
            .client
            .create_role(&input, self.token(&token))
            .await
            .map_err(api_error)?;
        to_json(&role)
    }

    #[tool(description = "Update a role's title, description and flags. Returns the updated role")]
    async fn update_role(
        &self,
        Parameters(params): Parameters<UpdateRoleParams>,
    ) -> Result<String, String> {
        let UpdateRoleParams {
            role_id,
            title,
            description,
            admin,
            default,
            token,
        } = params;
        let input = RoleInput {
            title,
            description,
            admin,
            default,
        };
        let role = self
            .client
            .update_role(&role_id, &input, self.token(&token))
            .await
            .map_err(api_error)?;
        to_json(&role)
    }

    #[tool(description = "Delete a role")]
    async fn delete_role(
        &self,
        Parameters(params): Parameters<RoleIdParams>,
    ) -> Result<String, String> {
        self.client
            .delete_role(&params.role_id, self.token(&params.token))
            .await
            .map_err(api_error)?;
        to_json(&json!({ "deleted": params.role_id }))
    }
}
