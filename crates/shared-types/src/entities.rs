//! # Core Domain Entities
//!
//! Server-derived records held by the client store.
//!
//! ## Clusters
//!
//! - **Work**: `Project`, `Task`, `Subtask`
//! - **Time**: `TimeEntry`
//! - **Identity**: `User`
//! - **Insights**: `ProjectMember`, `ProjectHistoryEntry`
//!
//! Every entity is an immutable value object keyed by a stable string id and
//! carrying `created_at` / `updated_at` timestamps. Mutation always replaces
//! the whole record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable string identifier assigned by the server.
pub type EntityId = String;

/// Common surface of every record kept in a normalized slice.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Stable identifier.
    fn id(&self) -> &str;

    /// Creation timestamp.
    fn created_at(&self) -> DateTime<Utc>;

    /// Last-update timestamp.
    fn updated_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }

                fn updated_at(&self) -> DateTime<Utc> {
                    self.updated_at
                }
            }
        )*
    };
}

impl_entity!(Project, Task, TimeEntry, User);

fn new_id() -> EntityId {
    Uuid::new_v4().to_string()
}

// =============================================================================
// PRIORITY (shared by tasks and projects)
// =============================================================================

/// Work priority. Rank order is urgent > high > medium > low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Numeric rank used for sorting (urgent = 4, low = 1).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER A: WORK
// =============================================================================

/// Task workflow column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    #[default]
    Backlog,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Kanban column order.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::Backlog,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Backlog => "backlog",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checklist item embedded in a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub project_id: EntityId,
    #[serde(default)]
    pub assignee_id: Option<EntityId>,
    pub creator_id: EntityId,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Minutes logged against the task.
    #[serde(default)]
    pub time_spent: u32,
    /// Estimate in minutes.
    #[serde(default)]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Position inside its kanban column.
    #[serde(default)]
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh task with a generated id and `now` timestamps.
    pub fn new(
        title: impl Into<String>,
        project_id: impl Into<EntityId>,
        creator_id: impl Into<EntityId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: Priority::default(),
            project_id: project_id.into(),
            assignee_id: None,
            creator_id: creator_id.into(),
            labels: Vec::new(),
            subtasks: Vec::new(),
            time_spent: 0,
            estimated_time: None,
            due_date: None,
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the due date has passed and the task is still open.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < now)
    }
}

/// Project lifecycle status. Missing on the wire means active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Active,
        ProjectStatus::Archived,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }

    /// Human label used in filter chips.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Archived => "Archived",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On hold",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A container of tasks owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    pub owner_id: EntityId,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub members: Vec<EntityId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub budget: Option<f64>,
    /// Completion percentage, 0..=100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a fresh active project with a generated id and `now` timestamps.
    pub fn new(name: impl Into<String>, owner_id: impl Into<EntityId>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            description: None,
            status: ProjectStatus::default(),
            priority: Priority::default(),
            owner_id: owner_id.into(),
            owner_name: None,
            members: Vec::new(),
            tags: Vec::new(),
            start_date: None,
            end_date: None,
            budget: None,
            progress: 0,
            color: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// CLUSTER B: TIME
// =============================================================================

/// A span of tracked work against a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: EntityId,
    pub task_id: EntityId,
    pub user_id: EntityId,
    #[serde(default)]
    pub project_id: Option<EntityId>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Length in minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub billable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    pub fn new(
        task_id: impl Into<EntityId>,
        user_id: impl Into<EntityId>,
        start_time: DateTime<Utc>,
        duration: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            task_id: task_id.into(),
            user_id: user_id.into(),
            project_id: None,
            start_time,
            end_time: None,
            duration,
            description: None,
            billable: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// CLUSTER C: IDENTITY
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Member,
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            email: email.into(),
            name: name.into(),
            avatar: None,
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// PROJECT INSIGHTS
// =============================================================================

/// A user as listed on a project's member roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<&User> for ProjectMember {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            avatar: user.avatar.clone(),
        }
    }
}

/// One field changed by a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    #[serde(default)]
    pub old_value: serde_json::Value,
    #[serde(default)]
    pub new_value: serde_json::Value,
}

/// Audit record of a project change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHistoryEntry {
    pub id: EntityId,
    pub project_id: EntityId,
    /// Short verb such as `created`, `updated` or `archived`.
    pub action: String,
    #[serde(default)]
    pub description: String,
    pub user_id: EntityId,
    #[serde(default)]
    pub user_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub changes: Vec<FieldChange>,
}
