//! Tool implementations for the Clockify MCP server.
//!
//! Every tool follows the same path: resolve defaulted ids, call the
//! service, project the payload through a [`shape`] table and render it as
//! pretty JSON. Failures never escape a tool; they come back as an error
//! result reading `Failed to <action>: <message>`.

use crate::ClockifyServer;
use crate::error::Error;
use crate::service::{ClockifyService, NewTimeEntry, query_string};
use crate::shape::{self, Field, shape};
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tracing::warn;

/// Parameters for tools scoped to a single workspace.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceParams {
    /// The ID of the workspace (optional, defaults to active workspace).
    pub workspace_id: Option<String>,
}

/// Parameters for `get_user_profile`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileParams {
    /// The ID of the workspace (optional, defaults to active workspace).
    pub workspace_id: Option<String>,
    /// The ID of the user (optional, defaults to self).
    pub user_id: Option<String>,
}

/// Parameters for `get_tasks_on_project`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTasksParams {
    /// The ID of the workspace (optional, defaults to active workspace).
    pub workspace_id: Option<String>,
    /// The ID of the project to get tasks from.
    pub project_id: String,
}

/// Parameters for `get_time_entries`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntriesParams {
    /// The ID of the workspace (optional, defaults to active workspace).
    pub workspace_id: Option<String>,
    /// The ID of the user to get time entries for (optional, defaults to self).
    pub user_id: Option<String>,
    /// Start date (ISO 8601 format).
    pub start: Option<String>,
    /// End date (ISO 8601 format).
    pub end: Option<String>,
}

/// Parameters for `add_time_entry`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTimeEntryParams {
    /// The ID of the workspace (optional, defaults to active workspace).
    pub workspace_id: Option<String>,
    /// The ID of the project.
    pub project_id: String,
    /// Description of the time entry.
    pub description: String,
    /// Start date (ISO 8601 format).
    pub start: String,
    /// End date (ISO 8601 format).
    pub end: String,
    /// The ID of the task.
    pub task_id: Option<String>,
    /// Array of tag IDs.
    pub tag_ids: Option<Vec<String>>,
}

/// Parameters for `duplicate_time_entry`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateTimeEntryParams {
    /// The ID of the workspace (optional, defaults to active workspace).
    pub workspace_id: Option<String>,
    /// The ID of the user owning the entry (optional, defaults to self).
    pub user_id: Option<String>,
    /// The ID of the time entry to duplicate.
    pub time_entry_id: String,
}

/// Treat an empty id the same as an omitted one.
fn given(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty())
}

/// Render a successful payload, or the error, as a tool result.
async fn respond(
    action: &str,
    fields: &[Field],
    call: impl Future<Output = Result<Value, Error>>,
) -> Result<CallToolResult, McpError> {
    let rendered = match call.await {
        Ok(raw) => serde_json::to_string_pretty(&shape(raw, fields)).map_err(Error::from),
        Err(err) => Err(err),
    };
    Ok(match rendered {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => failure(action, &err),
    })
}

/// Like [`respond`], for tools whose upstream payload must be a list.
async fn respond_list(
    action: &str,
    fields: &[Field],
    call: impl Future<Output = Result<Value, Error>>,
) -> Result<CallToolResult, McpError> {
    respond(action, fields, async move { shape::expect_list(call.await?) }).await
}

fn failure(action: &str, err: &Error) -> CallToolResult {
    warn!(action, error = %err, "clockify tool failed");
    let message = err.to_string();
    let message = if message.is_empty() {
        "Unknown error"
    } else {
        message.as_str()
    };
    CallToolResult::error(vec![Content::text(format!("Failed to {action}: {message}"))])
}

impl ClockifyServer {
    async fn workspace_or_active(&self, workspace_id: Option<String>) -> Result<String, Error> {
        match given(workspace_id) {
            Some(id) => Ok(id),
            None => self.service.active_workspace_id().await,
        }
    }

    /// Resolve workspace and user ids, fetching the current user at most once.
    async fn workspace_and_user(
        &self,
        workspace_id: Option<String>,
        user_id: Option<String>,
    ) -> Result<(String, String), Error> {
        match (given(workspace_id), given(user_id)) {
            (Some(workspace_id), Some(user_id)) => Ok((workspace_id, user_id)),
            (workspace_id, user_id) => {
                let me = self.service.current_user_ref().await?;
                Ok((
                    workspace_id.unwrap_or(me.active_workspace),
                    user_id.unwrap_or(me.id),
                ))
            }
        }
    }
}

#[tool_router]
impl ClockifyServer {
    /// Create a server backed by the given service.
    pub fn new(service: ClockifyService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        title = "Get Current User",
        description = "Get information about the currently authenticated Clockify user"
    )]
    async fn get_current_user(&self) -> Result<CallToolResult, McpError> {
        respond(
            "fetch current user",
            shape::CURRENT_USER,
            self.service.current_user(),
        )
        .await
    }

    #[tool(
        title = "Get User Profile",
        description = "Get a user's member profile in a workspace (defaults to self in the active workspace)"
    )]
    async fn get_user_profile(
        &self,
        Parameters(params): Parameters<UserProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        respond("fetch user profile", shape::MEMBER, async move {
            let (workspace_id, user_id) = self
                .workspace_and_user(params.workspace_id, params.user_id)
                .await?;
            self.service.user_profile(&workspace_id, &user_id).await
        })
        .await
    }

    #[tool(title = "Get Workspace", description = "Get Workspace by Id")]
    async fn get_workspace(
        &self,
        Parameters(params): Parameters<WorkspaceParams>,
    ) -> Result<CallToolResult, McpError> {
        respond("fetch workspace", shape::WORKSPACE, async move {
            match given(params.workspace_id) {
                Some(id) => self.service.workspace(&id).await,
                None => self.service.active_workspace().await,
            }
        })
        .await
    }

    #[tool(
        title = "Get Workspaces",
        description = "Get all available workspaces for the authenticated user"
    )]
    async fn get_workspaces(&self) -> Result<CallToolResult, McpError> {
        respond_list("fetch workspaces", shape::WORKSPACE, self.service.workspaces()).await
    }

    #[tool(
        title = "Get Workspace Users",
        description = "Get all users in a workspace (defaults to active workspace if not specified)"
    )]
    async fn get_workspace_users(
        &self,
        Parameters(params): Parameters<WorkspaceParams>,
    ) -> Result<CallToolResult, McpError> {
        respond_list("fetch workspace users", shape::MEMBER, async move {
            let workspace_id = self.workspace_or_active(params.workspace_id).await?;
            self.service.workspace_users(&workspace_id).await
        })
        .await
    }

    #[tool(
        title = "Get Clients on Workspace",
        description = "Get all clients on a workspace (defaults to active workspace if not specified)"
    )]
    async fn get_clients_on_workspace(
        &self,
        Parameters(params): Parameters<WorkspaceParams>,
    ) -> Result<CallToolResult, McpError> {
        respond_list("fetch clients on workspace", shape::CLIENT, async move {
            let workspace_id = self.workspace_or_active(params.workspace_id).await?;
            self.service.workspace_clients(&workspace_id).await
        })
        .await
    }

    #[tool(
        title = "Get Projects on Workspace",
        description = "Get all projects on a workspace (defaults to active workspace if not specified)"
    )]
    async fn get_projects_on_workspace(
        &self,
        Parameters(params): Parameters<WorkspaceParams>,
    ) -> Result<CallToolResult, McpError> {
        respond_list("fetch projects on workspace", shape::PROJECT, async move {
            let workspace_id = self.workspace_or_active(params.workspace_id).await?;
            self.service.workspace_projects(&workspace_id).await
        })
        .await
    }

    #[tool(title = "Get Tasks on Project", description = "Get all tasks on a project")]
    async fn get_tasks_on_project(
        &self,
        Parameters(params): Parameters<ProjectTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        respond_list("fetch tasks on project", shape::TASK, async move {
            let workspace_id = self.workspace_or_active(params.workspace_id).await?;
            self.service
                .project_tasks(&workspace_id, &params.project_id)
                .await
        })
        .await
    }

    #[tool(
        title = "Get Time Entries",
        description = "Get time entries for a user within a date range"
    )]
    async fn get_time_entries(
        &self,
        Parameters(params): Parameters<TimeEntriesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond_list("fetch time entries", shape::TIME_ENTRY_LIST, async move {
            let (workspace_id, user_id) = self
                .workspace_and_user(params.workspace_id, params.user_id)
                .await?;
            let query = query_string(&[
                ("start", params.start.as_deref()),
                ("end", params.end.as_deref()),
            ]);
            self.service
                .user_time_entries(&workspace_id, &user_id, &query)
                .await
        })
        .await
    }

    #[tool(
        title = "Add Time Entry",
        description = "Add time entry for authenticated user"
    )]
    async fn add_time_entry(
        &self,
        Parameters(params): Parameters<AddTimeEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond("add time entry", shape::TIME_ENTRY, async move {
            let workspace_id = self.workspace_or_active(params.workspace_id).await?;
            let entry = NewTimeEntry {
                description: params.description,
                start: params.start,
                end: params.end,
                project_id: params.project_id,
                task_id: given(params.task_id),
                tag_ids: params.tag_ids,
            };
            self.service.add_time_entry(&workspace_id, &entry).await
        })
        .await
    }

    #[tool(
        title = "Duplicate Time Entry",
        description = "Duplicate an existing time entry (defaults to self in the active workspace)"
    )]
    async fn duplicate_time_entry(
        &self,
        Parameters(params): Parameters<DuplicateTimeEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond("duplicate time entry", shape::TIME_ENTRY, async move {
            let (workspace_id, user_id) = self
                .workspace_and_user(params.workspace_id, params.user_id)
                .await?;
            self.service
                .duplicate_time_entry(&workspace_id, &user_id, &params.time_entry_id)
                .await
        })
        .await
    }
}
