//! Typed facade over the Clockify REST endpoints.
//!
//! Each method maps to one upstream endpoint and returns the decoded JSON
//! untouched. Ids are interpolated into paths as given.

use crate::client::Client;
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The parts of the current user the facade needs for defaulting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    pub active_workspace: String,
}

/// Request body for creating a time entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeEntry {
    pub description: String,
    pub start: String,
    pub end: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
}

/// Clockify operations used by the tool layer.
#[derive(Debug, Clone)]
pub struct ClockifyService {
    client: Client,
}

impl ClockifyService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        Ok(self.client.get(endpoint).await?.unwrap_or(Value::Null))
    }

    async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        Ok(self
            .client
            .request(endpoint, Method::POST, body)
            .await?
            .unwrap_or(Value::Null))
    }

    pub async fn current_user(&self) -> Result<Value> {
        self.get("/user").await
    }

    /// Fetch the current user and decode the fields used for defaulting.
    pub async fn current_user_ref(&self) -> Result<UserRef> {
        Ok(serde_json::from_value(self.current_user().await?)?)
    }

    pub async fn user_profile(&self, workspace_id: &str, user_id: &str) -> Result<Value> {
        self.get(&format!("/workspaces/{workspace_id}/member-profile/{user_id}"))
            .await
    }

    pub async fn workspace(&self, workspace_id: &str) -> Result<Value> {
        self.get(&format!("/workspaces/{workspace_id}")).await
    }

    /// Fetch the workspace recorded as active on the current user.
    pub async fn active_workspace(&self) -> Result<Value> {
        let workspace_id = self.active_workspace_id().await?;
        self.workspace(&workspace_id).await
    }

    pub async fn active_workspace_id(&self) -> Result<String> {
        Ok(self.current_user_ref().await?.active_workspace)
    }

    pub async fn workspaces(&self) -> Result<Value> {
        self.get("/workspaces").await
    }

    pub async fn workspace_users(&self, workspace_id: &str) -> Result<Value> {
        self.get(&format!("/workspaces/{workspace_id}/users")).await
    }

    pub async fn workspace_clients(&self, workspace_id: &str) -> Result<Value> {
        self.get(&format!("/workspaces/{workspace_id}/clients")).await
    }

    pub async fn workspace_projects(&self, workspace_id: &str) -> Result<Value> {
        self.get(&format!("/workspaces/{workspace_id}/projects")).await
    }

    pub async fn project_tasks(&self, workspace_id: &str, project_id: &str) -> Result<Value> {
        self.get(&format!(
            "/workspaces/{workspace_id}/projects/{project_id}/tasks"
        ))
        .await
    }

    /// List a user's time entries. `query` is appended verbatim, see
    /// [`query_string`].
    pub async fn user_time_entries(
        &self,
        workspace_id: &str,
        user_id: &str,
        query: &str,
    ) -> Result<Value> {
        self.get(&format!(
            "/workspaces/{workspace_id}/user/{user_id}/time-entries{query}"
        ))
        .await
    }

    pub async fn add_time_entry(&self, workspace_id: &str, entry: &NewTimeEntry) -> Result<Value> {
        let body = serde_json::to_value(entry)?;
        self.post(&format!("/workspaces/{workspace_id}/time-entries"), Some(&body))
            .await
    }

    pub async fn duplicate_time_entry(
        &self,
        workspace_id: &str,
        user_id: &str,
        entry_id: &str,
    ) -> Result<Value> {
        self.post(
            &format!("/workspaces/{workspace_id}/user/{user_id}/time-entries/{entry_id}/duplicate"),
            None,
        )
        .await
    }
}

/// Build `?k=v&...` from the pairs that carry a value, or `""` when none do.
pub fn query_string(params: &[(&str, Option<&str>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::Client;
    use crate::config::Config;
    use crate::error::Error;
    use crate::service::{ClockifyService, NewTimeEntry, query_string};
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> ClockifyService {
        let config = Config::new(Some("test-key".into()), Some(server.uri())).unwrap();
        ClockifyService::new(Client::new(config).unwrap())
    }

    async fn mount_user(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u1",
                "activeWorkspace": "w1",
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn query_string_empty_without_values() {
        assert_eq!(query_string(&[("start", None), ("end", None)]), "");
    }

    #[test]
    fn query_string_only_supplied_values() {
        assert_eq!(
            query_string(&[("start", Some("2024-01-01")), ("end", None)]),
            "?start=2024-01-01"
        );
    }

    #[test]
    fn query_string_encodes_values() {
        assert_eq!(
            query_string(&[
                ("start", Some("2024-01-01T00:00:00Z")),
                ("end", Some("2024-01-02T00:00:00Z")),
            ]),
            "?start=2024-01-01T00%3A00%3A00Z&end=2024-01-02T00%3A00%3A00Z"
        );
    }

    #[test]
    fn new_time_entry_omits_absent_optionals() {
        let entry = NewTimeEntry {
            description: "work".into(),
            start: "2024-01-01T09:00:00Z".into(),
            end: "2024-01-01T10:00:00Z".into(),
            project_id: "p1".into(),
            task_id: None,
            tag_ids: None,
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "description": "work",
                "start": "2024-01-01T09:00:00Z",
                "end": "2024-01-01T10:00:00Z",
                "projectId": "p1",
            })
        );
    }

    #[tokio::test]
    async fn active_workspace_follows_current_user() {
        let server = MockServer::start().await;
        mount_user(&server).await;
        Mock::given(method("GET"))
            .and(path("/workspaces/w1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "w1"})))
            .expect(1)
            .mount(&server)
            .await;

        let workspace = service_for(&server).active_workspace().await.unwrap();
        assert_eq!(workspace, json!({"id": "w1"}));
    }

    #[tokio::test]
    async fn active_workspace_id_requires_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
            .mount(&server)
            .await;

        let err = service_for(&server).active_workspace_id().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn add_time_entry_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/w1/time-entries"))
            .and(body_json(json!({
                "description": "work",
                "start": "s",
                "end": "e",
                "projectId": "p1",
                "taskId": "t1",
                "tagIds": ["g1"],
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "e1"})))
            .expect(1)
            .mount(&server)
            .await;

        let entry = NewTimeEntry {
            description: "work".into(),
            start: "s".into(),
            end: "e".into(),
            project_id: "p1".into(),
            task_id: Some("t1".into()),
            tag_ids: Some(vec!["g1".into()]),
        };
        let created = service_for(&server)
            .add_time_entry("w1", &entry)
            .await
            .unwrap();
        assert_eq!(created, json!({"id": "e1"}));
    }

    #[tokio::test]
    async fn duplicate_without_json_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/w1/user/u1/time-entries/e1/duplicate"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let value = service_for(&server)
            .duplicate_time_entry("w1", "u1", "e1")
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn upstream_failure_propagates_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces/w1/projects/p1/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = service_for(&server)
            .project_tasks("w1", "p1")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Clockify API error: 500 Internal Server Error - boom"
        );
    }
}
