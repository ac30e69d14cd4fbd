//! In-memory backend for tests and offline demos.
//!
//! Implements every API port against local collections. Failures can be
//! scripted per operation and every call is logged under its operation name
//! (`"tasks.reorder"`, `"projects.page"`, ...). Optional per-operation
//! latency goes through `tokio::time::sleep`, so paused-clock tests control
//! when responses land.

use crate::ports::{
    AuthApi, ProjectSelection, ProjectsApi, ReorderTasksRequest, TasksApi, TimeEntriesApi,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;
use shared_types::{
    ApiError, AuthResponse, CreateProjectRequest, CreateTaskRequest, CreateTimeEntryRequest,
    EntityId, FieldChange, ForgotPasswordRequest, LoginRequest, PaginatedResponse, Project,
    ProjectHistoryEntry, ProjectMember, ProjectQuery, ProjectSortField, ProjectStatus, RefreshTokenRequest, RegisterRequest, ResetPasswordRequest,
    SortDirection, Task, TimeEntry, TokenPair, UpdateProjectRequest, UpdateTaskRequest,
    UpdateTimeEntryRequest, User,
};
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tf_02_request_middleware::user_message;

const LOGIN_ENDPOINT: &str = "/auth/login";

fn api_error(status: u16, url: &str) -> ApiError {
    ApiError::new(user_message(status, url, LOGIN_ENDPOINT), status, "in-memory", url)
}

#[derive(Debug, Default)]
struct Collections {
    users: Vec<(User, String)>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    entries: Vec<TimeEntry>,
    history: Vec<ProjectHistoryEntry>,
    tokens_issued: u64,
}

impl Collections {
    fn actor(&self) -> (EntityId, String) {
        self.users.first().map_or_else(
            || ("system".to_string(), "System".to_string()),
            |(u, _)| (u.id.clone(), u.name.clone()),
        )
    }

    fn record(&mut self, project: &Project, action: &str, changes: Vec<FieldChange>) {
        let (user_id, user_name) = self.actor();
        let entry = ProjectHistoryEntry {
            id: format!("h{}", self.history.len() + 1),
            project_id: project.id.clone(),
            action: action.to_string(),
            description: format!("{} {action}", project.name),
            user_id,
            user_name,
            timestamp: Utc::now(),
            changes,
        };
        self.history.push(entry);
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: Mutex<Collections>,
    failures: Mutex<HashMap<&'static str, VecDeque<ApiError>>>,
    latency: Mutex<HashMap<&'static str, Duration>>,
    calls: Mutex<Vec<&'static str>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(self, user: User, password: impl Into<String>) -> Self {
        self.data.lock().users.push((user, password.into()));
        self
    }

    #[must_use]
    pub fn with_projects(self, projects: impl IntoIterator<Item = Project>) -> Self {
        self.data.lock().projects.extend(projects);
        self
    }

    #[must_use]
    pub fn with_tasks(self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.data.lock().tasks.extend(tasks);
        self
    }

    #[must_use]
    pub fn with_entries(self, entries: impl IntoIterator<Item = TimeEntry>) -> Self {
        self.data.lock().entries.extend(entries);
        self
    }

    /// Make the next call of `operation` fail with `error`. Queued failures
    /// are consumed in order.
    pub fn fail_next(&self, operation: &'static str, error: ApiError) {
        self.failures
            .lock()
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    pub fn set_latency(&self, operation: &'static str, latency: Duration) {
        self.latency.lock().insert(operation, latency);
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == operation).count()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.data.lock().projects.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.data.lock().tasks.clone()
    }

    pub fn entries(&self) -> Vec<TimeEntry> {
        self.data.lock().entries.clone()
    }

    async fn enter(&self, operation: &'static str) -> Result<(), ApiError> {
        self.calls.lock().push(operation);
        let latency = self.latency.lock().get(operation).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let failure = self
            .failures
            .lock()
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn issue_session(&self, user: User) -> AuthResponse {
        let mut data = self.data.lock();
        data.tokens_issued += 1;
        AuthResponse {
            token: format!("token-{}-{}", user.id, data.tokens_issued),
            refresh_token: Some(format!("refresh-{}-{}", user.id, data.tokens_issued)),
            user,
        }
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.enter("auth.login").await?;
        let user = self
            .data
            .lock()
            .users
            .iter()
            .find(|(u, password)| u.email == request.email && *password == request.password)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| api_error(401, LOGIN_ENDPOINT))?;
        Ok(self.issue_session(user))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.enter("auth.register").await?;
        let user = {
            let mut data = self.data.lock();
            if data.users.iter().any(|(u, _)| u.email == request.email) {
                return Err(api_error(409, "/auth/register"));
            }
            let user = User::new(request.email.clone(), request.name.clone());
            data.users.push((user.clone(), request.password.clone()));
            user
        };
        Ok(self.issue_session(user))
    }

    async fn refresh(&self, request: &RefreshTokenRequest) -> Result<TokenPair, ApiError> {
        self.enter("auth.refresh").await?;
        if !request.refresh_token.starts_with("refresh-") {
            return Err(api_error(401, "/auth/refresh"));
        }
        let mut data = self.data.lock();
        data.tokens_issued += 1;
        Ok(TokenPair {
            token: format!("token-refreshed-{}", data.tokens_issued),
            refresh_token: Some(format!("refresh-rotated-{}", data.tokens_issued)),
        })
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiError> {
        self.enter("auth.forgot_password").await?;
        let known = self.data.lock().users.iter().any(|(u, _)| u.email == request.email);
        if known {
            Ok(())
        } else {
            Err(api_error(404, "/auth/forgot-password"))
        }
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.enter("auth.reset_password").await?;
        if request.token.is_empty() {
            return Err(api_error(400, "/auth/reset-password"));
        }
        Ok(())
    }
}

fn project_in_query(project: &Project, query: &ProjectQuery) -> bool {
    let search_hit = query.search.as_deref().is_none_or(|search| {
        let search = search.to_lowercase();
        project.name.to_lowercase().contains(&search)
            || project
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&search))
    });
    search_hit
        && query.status.is_none_or(|s| s == project.status)
        && query.owner_id.as_ref().is_none_or(|o| *o == project.owner_id)
        && query.start_date.is_none_or(|start| project.created_at >= start)
        && query.end_date.is_none_or(|end| project.created_at <= end)
}

fn compare_for_query(a: &Project, b: &Project, field: ProjectSortField) -> Ordering {
    match field {
        ProjectSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProjectSortField::Description => a.description.cmp(&b.description),
        ProjectSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        ProjectSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        ProjectSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        ProjectSortField::Id => a.id.cmp(&b.id),
    }
}

fn project_diff(before: &Project, after: &Project) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut push = |field: &str, old: serde_json::Value, new: serde_json::Value| {
        if old != new {
            changes.push(FieldChange {
                field: field.to_string(),
                old_value: old,
                new_value: new,
            });
        }
    };
    push("name", json!(before.name), json!(after.name));
    push("description", json!(before.description), json!(after.description));
    push("status", json!(before.status), json!(after.status));
    push("priority", json!(before.priority), json!(after.priority));
    push("progress", json!(before.progress), json!(after.progress));
    push("tags", json!(before.tags), json!(after.tags));
    changes
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn projects_csv<'a>(projects: impl Iterator<Item = &'a Project>) -> String {
    let mut out = String::from("id,name,status,priority,progress,createdAt\n");
    for p in projects {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_field(&p.id),
            csv_field(&p.name),
            p.status.as_str(),
            p.priority.as_str(),
            p.progress,
            p.created_at.to_rfc3339(),
        ));
    }
    out
}

fn apply_project_changes(project: &mut Project, changes: &UpdateProjectRequest) {
    if let Some(name) = &changes.name {
        project.name = name.clone();
    }
    if let Some(description) = &changes.description {
        project.description = Some(description.clone());
    }
    if let Some(status) = changes.status {
        project.status = status;
    }
    if let Some(priority) = changes.priority {
        project.priority = priority;
    }
    if let Some(tags) = &changes.tags {
        project.tags = tags.clone();
    }
    if let Some(progress) = changes.progress {
        project.progress = progress.min(100);
    }
    if let Some(end) = changes.end_date {
        project.end_date = Some(end);
    }
    project.updated_at = Utc::now();
}

#[async_trait]
impl ProjectsApi for InMemoryBackend {
    async fn list(&self, selection: &ProjectSelection) -> Result<Vec<Project>, ApiError> {
        self.enter("projects.list").await?;
        Ok(self
            .data
            .lock()
            .projects
            .iter()
            .filter(|p| selection.tags.is_empty() || p.tags.iter().any(|t| selection.tags.contains(t)))
            .filter(|p| selection.start_date.is_none_or(|start| p.created_at >= start))
            .filter(|p| selection.end_date.is_none_or(|end| p.created_at <= end))
            .cloned()
            .collect())
    }

    async fn page(&self, query: &ProjectQuery) -> Result<PaginatedResponse<Project>, ApiError> {
        self.enter("projects.page").await?;
        let hits = self.query_hits(query);
        let total = u32::try_from(hits.len()).unwrap_or(u32::MAX);
        let limit = query.limit.max(1);
        let skip = query.page.saturating_sub(1).saturating_mul(limit) as usize;
        let data = hits.into_iter().skip(skip).take(limit as usize).collect();
        Ok(PaginatedResponse::new(data, query.page, limit, total))
    }

    async fn get(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.enter("projects.get").await?;
        self.data
            .lock()
            .projects
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| api_error(404, &format!("/projects/{id}")))
    }

    async fn create(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.enter("projects.create").await?;
        let mut data = self.data.lock();
        let owner = data
            .users
            .first()
            .map_or_else(|| "owner".to_string(), |(u, _)| u.id.clone());
        let mut project = Project::new(request.name.clone(), owner);
        project.description = request.description.clone();
        project.priority = request.priority;
        project.tags = request.tags.clone();
        project.start_date = request.start_date;
        project.end_date = request.end_date;
        project.budget = request.budget;
        project.color = request.color.clone();
        data.projects.push(project.clone());
        data.record(&project, "created", Vec::new());
        Ok(project)
    }

    async fn update(&self, id: &EntityId, changes: &UpdateProjectRequest) -> Result<Project, ApiError> {
        self.enter("projects.update").await?;
        let mut data = self.data.lock();
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| api_error(404, &format!("/projects/{id}")))?;
        let before = project.clone();
        apply_project_changes(project, changes);
        let after = project.clone();
        data.record(&after, "updated", project_diff(&before, &after));
        Ok(after)
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.enter("projects.delete").await?;
        let mut data = self.data.lock();
        let before = data.projects.len();
        data.projects.retain(|p| p.id != *id);
        if data.projects.len() == before {
            return Err(api_error(404, &format!("/projects/{id}")));
        }
        Ok(())
    }

    async fn archive(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.enter("projects.archive").await?;
        let mut data = self.data.lock();
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| api_error(404, &format!("/projects/{id}/archive")))?;
        let before = project.clone();
        project.status = ProjectStatus::Archived;
        project.updated_at = Utc::now();
        let after = project.clone();
        data.record(&after, "archived", project_diff(&before, &after));
        Ok(after)
    }

    async fn duplicate(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.enter("projects.duplicate").await?;
        let mut data = self.data.lock();
        let source = data
            .projects
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| api_error(404, &format!("/projects/{id}/duplicate")))?;
        let fresh = Project::new(format!("{} (copy)", source.name), source.owner_id.clone());
        let copy = Project {
            id: fresh.id,
            name: fresh.name,
            created_at: fresh.created_at,
            updated_at: fresh.updated_at,
            ..source
        };
        data.projects.push(copy.clone());
        data.record(&copy, "duplicated", Vec::new());
        Ok(copy)
    }

    async fn search(&self, query: &str) -> Result<Vec<Project>, ApiError> {
        self.enter("projects.search").await?;
        let needle = query.trim().to_lowercase();
        Ok(self
            .data
            .lock()
            .projects
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn members(&self, id: &EntityId) -> Result<Vec<ProjectMember>, ApiError> {
        self.enter("projects.members").await?;
        let data = self.data.lock();
        let project = data
            .projects
            .iter()
            .find(|p| p.id == *id)
            .ok_or_else(|| api_error(404, &format!("/projects/{id}/members")))?;
        Ok(data
            .users
            .iter()
            .filter(|(u, _)| u.id == project.owner_id || project.members.contains(&u.id))
            .map(|(u, _)| ProjectMember::from(u))
            .collect())
    }

    async fn history(&self, id: &EntityId) -> Result<Vec<ProjectHistoryEntry>, ApiError> {
        self.enter("projects.history").await?;
        Ok(self
            .data
            .lock()
            .history
            .iter()
            .rev()
            .filter(|h| h.project_id == *id)
            .cloned()
            .collect())
    }

    async fn export_csv(&self, query: &ProjectQuery) -> Result<String, ApiError> {
        self.enter("projects.export_csv").await?;
        Ok(projects_csv(self.query_hits(query).iter()))
    }
}

fn apply_task_changes(task: &mut Task, changes: &UpdateTaskRequest) {
    if let Some(title) = &changes.title {
        task.title = title.clone();
    }
    if let Some(description) = &changes.description {
        task.description = description.clone();
    }
    if let Some(status) = changes.status {
        task.status = status;
    }
    if let Some(priority) = changes.priority {
        task.priority = priority;
    }
    if let Some(assignee) = &changes.assignee_id {
        task.assignee_id = Some(assignee.clone());
    }
    if let Some(labels) = &changes.labels {
        task.labels = labels.clone();
    }
    if let Some(due) = changes.due_date {
        task.due_date = Some(due);
    }
    if let Some(order) = changes.order {
        task.order = order;
    }
    task.updated_at = Utc::now();
}

impl InMemoryBackend {
    /// Every project matching `query`, sorted, without paging.
    fn query_hits(&self, query: &ProjectQuery) -> Vec<Project> {
        let mut hits: Vec<Project> = self
            .data
            .lock()
            .projects
            .iter()
            .filter(|p| project_in_query(p, query))
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            let ordering = compare_for_query(a, b, query.sort_by);
            match query.sort_order {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        hits
    }

    fn change_task(&self, id: &EntityId, changes: &UpdateTaskRequest) -> Result<Task, ApiError> {
        let mut data = self.data.lock();
        let task = data
            .tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| api_error(404, &format!("/tasks/{id}")))?;
        apply_task_changes(task, changes);
        Ok(task.clone())
    }
}

#[async_trait]
impl TasksApi for InMemoryBackend {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        self.enter("tasks.list").await?;
        Ok(self.data.lock().tasks.clone())
    }

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        self.enter("tasks.create").await?;
        let mut data = self.data.lock();
        let creator = data
            .users
            .first()
            .map_or_else(|| "creator".to_string(), |(u, _)| u.id.clone());
        let mut task = Task::new(request.title.clone(), request.project_id.clone(), creator);
        task.description = request.description.clone();
        task.status = request.status;
        task.priority = request.priority;
        task.assignee_id = request.assignee_id.clone();
        task.labels = request.labels.clone();
        task.due_date = request.due_date;
        task.estimated_time = request.estimated_time;
        task.order = data
            .tasks
            .iter()
            .filter(|t| t.status == task.status)
            .map(|t| t.order + 1)
            .max()
            .unwrap_or(0);
        data.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: &EntityId, changes: &UpdateTaskRequest) -> Result<Task, ApiError> {
        self.enter("tasks.update").await?;
        self.change_task(id, changes)
    }

    async fn patch(&self, id: &EntityId, changes: &UpdateTaskRequest) -> Result<Task, ApiError> {
        self.enter("tasks.patch").await?;
        self.change_task(id, changes)
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.enter("tasks.delete").await?;
        let mut data = self.data.lock();
        let before = data.tasks.len();
        data.tasks.retain(|t| t.id != *id);
        if data.tasks.len() == before {
            return Err(api_error(404, &format!("/tasks/{id}")));
        }
        Ok(())
    }

    async fn reorder(&self, request: &ReorderTasksRequest) -> Result<Vec<Task>, ApiError> {
        self.enter("tasks.reorder").await?;
        let mut data = self.data.lock();
        let mut updated = Vec::with_capacity(request.tasks.len());
        for row in &request.tasks {
            let task = data
                .tasks
                .iter_mut()
                .find(|t| t.id == row.id)
                .ok_or_else(|| api_error(404, "/tasks/reorder"))?;
            task.order = row.order;
            task.updated_at = Utc::now();
            updated.push(task.clone());
        }
        Ok(updated)
    }
}

#[async_trait]
impl TimeEntriesApi for InMemoryBackend {
    async fn list(&self, task_id: Option<&EntityId>) -> Result<Vec<TimeEntry>, ApiError> {
        self.enter("time_entries.list").await?;
        Ok(self
            .data
            .lock()
            .entries
            .iter()
            .filter(|e| task_id.is_none_or(|id| e.task_id == *id))
            .cloned()
            .collect())
    }

    async fn create(&self, request: &CreateTimeEntryRequest) -> Result<TimeEntry, ApiError> {
        self.enter("time_entries.create").await?;
        let mut data = self.data.lock();
        let user = data
            .users
            .first()
            .map_or_else(|| "user".to_string(), |(u, _)| u.id.clone());
        let mut entry = TimeEntry::new(
            request.task_id.clone(),
            user,
            request.start_time,
            request.duration,
        );
        entry.project_id = request.project_id.clone();
        entry.end_time = request.end_time;
        entry.description = request.description.clone();
        entry.billable = request.billable;
        data.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        id: &EntityId,
        changes: &UpdateTimeEntryRequest,
    ) -> Result<TimeEntry, ApiError> {
        self.enter("time_entries.update").await?;
        let mut data = self.data.lock();
        let entry = data
            .entries
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| api_error(404, &format!("/time-entries/{id}")))?;
        if let Some(end) = changes.end_time {
            entry.end_time = Some(end);
        }
        if let Some(duration) = changes.duration {
            entry.duration = duration;
        }
        if let Some(description) = &changes.description {
            entry.description = Some(description.clone());
        }
        if let Some(billable) = changes.billable {
            entry.billable = billable;
        }
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        self.enter("time_entries.delete").await?;
        let mut data = self.data.lock();
        let before = data.entries.len();
        data.entries.retain(|e| e.id != *id);
        if data.entries.len() == before {
            return Err(api_error(404, &format!("/time-entries/{id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: u32, limit: u32) -> ProjectQuery {
        ProjectQuery {
            page,
            limit,
            search: None,
            status: None,
            owner_id: None,
            start_date: None,
            end_date: None,
            sort_by: ProjectSortField::Name,
            sort_order: SortDirection::Asc,
        }
    }

    fn backend_with(names: &[&str]) -> InMemoryBackend {
        InMemoryBackend::new().with_projects(names.iter().map(|n| Project::new(*n, "u1")))
    }

    #[tokio::test]
    async fn test_page_slices_sorted_results() {
        let backend = backend_with(&["c", "a", "e", "b", "d"]);
        let page = backend.page(&query(2, 2)).await.unwrap();
        let names: Vec<&str> = page.data.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "d"]);
        assert_eq!(page.pagination.total, 5);
        assert!(page.pagination.has_more());

        let last = backend.page(&query(3, 2)).await.unwrap();
        assert!(!last.pagination.has_more());
    }

    #[tokio::test]
    async fn test_scripted_failure_is_consumed() {
        let backend = backend_with(&["a"]);
        backend.fail_next("projects.page", api_error(503, "/projects"));

        let err = backend.page(&query(1, 12)).await.unwrap_err();
        assert_eq!(err.status, 503);
        assert!(backend.page(&query(1, 12)).await.is_ok());
        assert_eq!(backend.call_count("projects.page"), 2);
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let user = User::new("ann@example.com", "Ann");
        let backend = InMemoryBackend::new().with_user(user, "secret");
        let bad = LoginRequest {
            email: "ann@example.com".into(),
            password: "nope".into(),
        };
        assert_eq!(backend.login(&bad).await.unwrap_err().status, 401);

        let good = LoginRequest {
            password: "secret".into(),
            ..bad
        };
        let session = backend.login(&good).await.unwrap();
        assert!(session.refresh_token.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_gets_new_id() {
        let backend = backend_with(&["Alpha"]);
        let source = backend.projects()[0].clone();
        let copy = backend.duplicate(&source.id).await.unwrap();
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.name, "Alpha (copy)");
        assert_eq!(backend.projects().len(), 2);
    }

    #[tokio::test]
    async fn test_history_newest_first_with_diff() {
        let backend = backend_with(&["Alpha"]);
        let id = backend.projects()[0].id.clone();
        let changes = UpdateProjectRequest {
            name: Some("Beta".into()),
            ..Default::default()
        };
        ProjectsApi::update(&backend, &id, &changes).await.unwrap();
        backend.archive(&id).await.unwrap();

        let history = backend.history(&id).await.unwrap();
        let actions: Vec<&str> = history.iter().map(|h| h.action.as_str()).collect();
        assert_eq!(actions, vec!["archived", "updated"]);
        assert_eq!(history[1].changes.len(), 1);
        assert_eq!(history[1].changes[0].field, "name");
        assert_eq!(history[1].changes[0].new_value, json!("Beta"));
        assert_eq!(history[0].changes[0].new_value, json!("archived"));
    }

    #[tokio::test]
    async fn test_members_include_owner() {
        let owner = User::new("ann@example.com", "Ann");
        let guest = User::new("bob@example.com", "Bob");
        let outsider = User::new("cy@example.com", "Cy");
        let mut project = Project::new("Alpha", owner.id.clone());
        project.members = vec![guest.id.clone()];
        let backend = InMemoryBackend::new()
            .with_user(owner, "pw")
            .with_user(guest, "pw")
            .with_user(outsider, "pw")
            .with_projects([project.clone()]);

        let names: Vec<String> = backend
            .members(&project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
        assert_eq!(backend.members(&"nope".to_string()).await.unwrap_err().status, 404);
    }

    #[tokio::test]
    async fn test_search_matches_tags() {
        let mut tagged = Project::new("Gamma", "u1");
        tagged.tags = vec!["Backend".into()];
        let backend = backend_with(&["Alpha"]).with_projects([tagged]);
        let hits = backend.search("backend").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Gamma");
    }

    #[tokio::test]
    async fn test_export_ignores_paging_and_quotes_names() {
        let backend = backend_with(&["b", "Smith, Jones", "a"]);
        let csv = backend.export_csv(&query(1, 1)).await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "id,name,status,priority,progress,createdAt");
        assert!(lines[3].contains(",\"Smith, Jones\",active,"));
    }
}
