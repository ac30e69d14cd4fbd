//! REST adapter: every port method is one call through [`ApiClient`].

use crate::ports::{
    AuthApi, ProjectSelection, ProjectsApi, ReorderTasksRequest, TasksApi, TimeEntriesApi,
};
use async_trait::async_trait;
use serde_json::Value;
use shared_types::{
    ApiError, AuthResponse, CreateProjectRequest, CreateTaskRequest, CreateTimeEntryRequest,
    EntityId, ForgotPasswordRequest, LoginRequest, PaginatedResponse, Project,
    ProjectHistoryEntry, ProjectMember, ProjectQuery, RefreshTokenRequest, RegisterRequest,
    ResetPasswordRequest, Task, TimeEntry, TokenPair, UpdateProjectRequest, UpdateTaskRequest,
    UpdateTimeEntryRequest,
};
use std::sync::Arc;
use tf_02_request_middleware::ApiClient;

fn empty_body() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The REST backend behind the middleware chain.
#[derive(Clone)]
pub struct RestBackend {
    client: Arc<ApiClient>,
}

impl RestBackend {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn remove(&self, endpoint: &str) -> Result<(), ApiError> {
        // `data` is null or an echo of the removed entity.
        let _: Option<Value> = self.client.delete(endpoint).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for RestBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/register", request).await
    }

    async fn refresh(&self, request: &RefreshTokenRequest) -> Result<TokenPair, ApiError> {
        self.client.post("/auth/refresh", request).await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiError> {
        let _: Option<Value> = self.client.post("/auth/forgot-password", request).await?;
        Ok(())
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        let _: Option<Value> = self.client.post("/auth/reset-password", request).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectsApi for RestBackend {
    async fn list(&self, selection: &ProjectSelection) -> Result<Vec<Project>, ApiError> {
        self.client.get("/projects", &selection.to_query_pairs()).await
    }

    async fn page(&self, query: &ProjectQuery) -> Result<PaginatedResponse<Project>, ApiError> {
        self.client
            .get_paginated("/projects", &query.to_query_pairs())
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.client.get(&format!("/projects/{id}"), &[]).await
    }

    async fn create(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.client.post("/projects", request).await
    }

    async fn update(&self, id: &EntityId, changes: &UpdateProjectRequest) -> Result<Project, ApiError> {
        self.client.put(&format!("/projects/{id}"), changes).await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.remove(&format!("/projects/{id}")).await
    }

    async fn archive(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.client
            .patch(&format!("/projects/{id}/archive"), &empty_body())
            .await
    }

    async fn duplicate(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.client
            .post(&format!("/projects/{id}/duplicate"), &empty_body())
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Project>, ApiError> {
        let params = [("query".to_string(), query.to_string())];
        self.client.get("/projects/search", &params).await
    }

    async fn members(&self, id: &EntityId) -> Result<Vec<ProjectMember>, ApiError> {
        self.client.get(&format!("/projects/{id}/members"), &[]).await
    }

    async fn history(&self, id: &EntityId) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
        self.client.get(&format!("/projects/{id}/history"), &[]).await
    }

    async fn export_csv(&self, query: &ProjectQuery) -> Result<String, ApiError> {
        let mut params = query.to_query_pairs();
        params.retain(|(key, _)| key != "page" && key != "limit");
        self.client.get_text("/projects/export/csv", &params).await
    }
}

#[async_trait]
impl TasksApi for RestBackend {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        self.client.get("/tasks", &[]).await
    }

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        self.client.post("/tasks", request).await
    }

    async fn update(&self, id: &EntityId, changes: &UpdateTaskRequest) -> Result<Task, ApiError> {
        self.client.put(&format!("/tasks/{id}"), changes).await
    }

    async fn patch(&self, id: &EntityId, changes: &UpdateTaskRequest) -> Result<Task, ApiError> {
        self.client.patch(&format!("/tasks/{id}"), changes).await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.remove(&format!("/tasks/{id}")).await
    }

    async fn reorder(&self, request: &ReorderTasksRequest) -> Result<Vec<Task>, ApiError> {
        self.client.post("/tasks/reorder", request).await
    }
}

#[async_trait]
impl TimeEntriesApi for RestBackend {
    async fn list(&self, task_id: Option<&EntityId>) -> Result<Vec<TimeEntry>, ApiError> {
        let params: Vec<(String, String)> = task_id
            .map(|id| vec![("taskId".to_string(), id.clone())])
            .unwrap_or_default();
        self.client.get("/time-entries", &params).await
    }

    async fn create(&self, request: &CreateTimeEntryRequest) -> Result<TimeEntry, ApiError> {
        self.client.post("/time-entries", request).await
    }

    async fn update(
        &self,
        id: &EntityId,
        changes: &UpdateTimeEntryRequest,
    ) -> Result<TimeEntry, ApiError> {
        self.client.put(&format!("/time-entries/{id}"), changes).await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.remove(&format!("/time-entries/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Response};
    use parking_lot::Mutex;
    use serde_json::json;
    use tf_02_request_middleware::{
        ApiRequest, ApiResponse, ChainPorts, HttpFailure, MiddlewareConfig, MiddlewareStack,
        NoAuthToken, NoCsrfMeta, RecordingNotifier,
    };
    use tower::service_fn;

    type Seen = Arc<Mutex<Vec<(Method, String, Option<Value>)>>>;

    fn backend(data: Value, seen: Seen) -> RestBackend {
        let transport = service_fn(move |req: ApiRequest| {
            let seen = Arc::clone(&seen);
            let body = serde_json::to_vec(&json!({"data": data.clone(), "success": true})).unwrap();
            async move {
                seen.lock()
                    .push((req.method().clone(), req.uri().path().to_string(), req.body().clone()));
                Ok::<ApiResponse, HttpFailure>(Response::new(bytes::Bytes::from(body)))
            }
        });
        let ports = ChainPorts {
            notifier: Arc::new(RecordingNotifier::new()),
            csrf_source: Arc::new(NoCsrfMeta),
            token_provider: Arc::new(NoAuthToken),
        };
        let service =
            MiddlewareStack::from_config(&MiddlewareConfig::default(), ports).service(transport);
        RestBackend::new(Arc::new(ApiClient::new("http://localhost:3000/api", service)))
    }

    #[tokio::test]
    async fn test_archive_patches_archive_endpoint() {
        let seen: Seen = Arc::default();
        let project = Project::new("Alpha", "u1");
        let api = backend(serde_json::to_value(&project).unwrap(), Arc::clone(&seen));

        let archived = ProjectsApi::archive(&api, &project.id).await.unwrap();
        assert_eq!(archived.id, project.id);
        let (method, path, _) = seen.lock()[0].clone();
        assert_eq!(method, Method::PATCH);
        assert_eq!(path, format!("/api/projects/{}/archive", project.id));
    }

    #[tokio::test]
    async fn test_members_and_history_paths() {
        let seen: Seen = Arc::default();
        let api = backend(json!([]), Arc::clone(&seen));
        let id = "p1".to_string();

        assert!(api.members(&id).await.unwrap().is_empty());
        assert!(api.history(&id).await.unwrap().is_empty());
        let paths: Vec<String> = seen.lock().iter().map(|(_, path, _)| path.clone()).collect();
        assert_eq!(paths, vec!["/api/projects/p1/members", "/api/projects/p1/history"]);
    }

    #[tokio::test]
    async fn test_delete_accepts_null_data() {
        let seen: Seen = Arc::default();
        let api = backend(Value::Null, Arc::clone(&seen));
        TasksApi::delete(&api, &"t1".to_string()).await.unwrap();
        assert_eq!(seen.lock()[0].0, Method::DELETE);
    }

    #[tokio::test]
    async fn test_reorder_body() {
        let seen: Seen = Arc::default();
        let api = backend(json!([]), Arc::clone(&seen));
        let request = ReorderTasksRequest {
            tasks: vec![shared_types::TaskOrder {
                id: "t1".into(),
                order: 0,
            }],
        };
        api.reorder(&request).await.unwrap();
        let (method, path, body) = seen.lock()[0].clone();
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/api/tasks/reorder");
        assert_eq!(body, Some(json!({"tasks": [{"id": "t1", "order": 0}]})));
    }
}
