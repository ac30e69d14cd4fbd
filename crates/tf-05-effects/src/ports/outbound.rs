//! Outbound (driven) ports: the backend as the effects see it.
//!
//! One trait per domain. Every method is exactly one request; failures come
//! back already classified by the middleware chain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{
    ApiError, AuthResponse, CreateProjectRequest, CreateTaskRequest, CreateTimeEntryRequest,
    EntityId, ForgotPasswordRequest, LoginRequest, PaginatedResponse, Project,
    ProjectHistoryEntry, ProjectMember, ProjectQuery, RefreshTokenRequest, RegisterRequest,
    ResetPasswordRequest, Task, TaskOrder, TimeEntry, TokenPair, UpdateProjectRequest,
    UpdateTaskRequest, UpdateTimeEntryRequest,
};

/// Body of the bulk kanban reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderTasksRequest {
    pub tasks: Vec<TaskOrder>,
}

/// Server-side selection for the unpaginated project load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSelection {
    pub tags: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ProjectSelection {
    /// Query pairs; an empty selection yields none.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.tags.is_empty() {
            pairs.push(("tags".to_string(), self.tags.join(",")));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate".to_string(), start.to_rfc3339()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate".to_string(), end.to_rfc3339()));
        }
        pairs
    }
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    async fn refresh(&self, request: &RefreshTokenRequest) -> Result<TokenPair, ApiError>;

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiError>;

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError>;
}

#[async_trait]
pub trait ProjectsApi: Send + Sync {
    async fn list(&self, selection: &ProjectSelection) -> Result<Vec<Project>, ApiError>;

    /// One page of the paginated list.
    async fn page(&self, query: &ProjectQuery) -> Result<PaginatedResponse<Project>, ApiError>;

    async fn get(&self, id: &EntityId) -> Result<Project, ApiError>;

    async fn create(&self, request: &CreateProjectRequest) -> Result<Project, ApiError>;

    /// Partial update; unset fields are left alone by the server.
    async fn update(&self, id: &EntityId, changes: &UpdateProjectRequest) -> Result<Project, ApiError>;

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError>;

    async fn archive(&self, id: &EntityId) -> Result<Project, ApiError>;

    async fn duplicate(&self, id: &EntityId) -> Result<Project, ApiError>;

    // Read-only lookups for detail screens. No command drives these, so they
    // never touch the store.

    /// Free-text search over name, description and tags.
    async fn search(&self, query: &str) -> Result<Vec<Project>, ApiError>;

    async fn members(&self, id: &EntityId) -> Result<Vec<ProjectMember>, ApiError>;

    /// Newest first.
    async fn history(&self, id: &EntityId) -> Result<Vec<ProjectHistoryEntry>, ApiError>;

    /// CSV of every project matching `query`, ignoring its paging.
    async fn export_csv(&self, query: &ProjectQuery) -> Result<String, ApiError>;
}

#[async_trait]
pub trait TasksApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, ApiError>;

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ApiError>;

    /// Full edit from the task dialog.
    async fn update(&self, id: &EntityId, changes: &UpdateTaskRequest) -> Result<Task, ApiError>;

    /// Single-field change from the board (status, priority).
    async fn patch(&self, id: &EntityId, changes: &UpdateTaskRequest) -> Result<Task, ApiError>;

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError>;

    /// Returns the reordered tasks.
    async fn reorder(&self, request: &ReorderTasksRequest) -> Result<Vec<Task>, ApiError>;
}

#[async_trait]
pub trait TimeEntriesApi: Send + Sync {
    async fn list(&self, task_id: Option<&EntityId>) -> Result<Vec<TimeEntry>, ApiError>;

    async fn create(&self, request: &CreateTimeEntryRequest) -> Result<TimeEntry, ApiError>;

    async fn update(
        &self,
        id: &EntityId,
        changes: &UpdateTimeEntryRequest,
    ) -> Result<TimeEntry, ApiError>;

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError>;
}
