//! Task projections.

use chrono::{DateTime, Utc};
use shared_types::{Priority, Task, TaskStatus};
use std::cmp::Ordering;
use std::sync::Arc;
use tf_01_entity_store::EntityState;
use tf_03_state::{TaskFilters, TaskSort, TaskSortKey};

use super::directed;

/// Whether `task` passes every active filter.
pub fn task_matches(task: &Task, filters: &TaskFilters) -> bool {
    if !filters.status.matches(&task.status)
        || !filters.priority.matches(&task.priority)
        || !filters.assignee.matches_opt(task.assignee_id.as_ref())
        || !filters.project.matches(&task.project_id)
    {
        return false;
    }
    let query = filters.query.trim();
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    task.title.to_lowercase().contains(&query) || task.description.to_lowercase().contains(&query)
}

pub fn filter_tasks(tasks: &EntityState<Task>, filters: &TaskFilters) -> Vec<Arc<Task>> {
    tasks
        .iter()
        .filter(|task| task_matches(task, filters))
        .cloned()
        .collect()
}

/// Comparator for `sort`. Tasks without a due date go last in both
/// directions.
pub fn compare_tasks(a: &Task, b: &Task, sort: TaskSort) -> Ordering {
    match sort.key {
        TaskSortKey::Created => directed(a.created_at.cmp(&b.created_at), sort.direction),
        TaskSortKey::Updated => directed(a.updated_at.cmp(&b.updated_at), sort.direction),
        TaskSortKey::Priority => directed(a.priority.rank().cmp(&b.priority.rank()), sort.direction),
        TaskSortKey::DueDate => match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => directed(x.cmp(&y), sort.direction),
        },
        TaskSortKey::Title => directed(
            a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            sort.direction,
        ),
    }
}

/// Stable sort in place.
pub fn sort_tasks(tasks: &mut [Arc<Task>], sort: TaskSort) {
    tasks.sort_by(|a, b| compare_tasks(a, b, sort));
}

/// One kanban column, ordered by the task `order` field.
pub fn tasks_in_column(tasks: &EntityState<Task>, status: TaskStatus) -> Vec<Arc<Task>> {
    let mut column: Vec<Arc<Task>> = tasks
        .iter()
        .filter(|task| task.status == status)
        .cloned()
        .collect();
    column.sort_by_key(|task| task.order);
    column
}

/// Every column in board order.
#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard {
    pub columns: Vec<(TaskStatus, Vec<Arc<Task>>)>,
}

impl KanbanBoard {
    pub fn build(tasks: &EntityState<Task>) -> Self {
        Self {
            columns: TaskStatus::ALL
                .iter()
                .map(|status| (*status, tasks_in_column(tasks, *status)))
                .collect(),
        }
    }

    pub fn column(&self, status: TaskStatus) -> &[Arc<Task>] {
        self.columns
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, tasks)| tasks.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub backlog: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TaskStats {
    pub fn tally(tasks: &EntityState<Task>) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::Backlog => stats.backlog += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Review => stats.review += 1,
                TaskStatus::Done => stats.done += 1,
            }
            match task.priority {
                Priority::Urgent => stats.urgent += 1,
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
            stats
        })
    }

    /// Tasks not yet done.
    pub fn open(&self) -> usize {
        self.total - self.done
    }
}

pub fn tasks_by_project(tasks: &EntityState<Task>, project_id: &str) -> Vec<Arc<Task>> {
    tasks
        .iter()
        .filter(|task| task.project_id == project_id)
        .cloned()
        .collect()
}

pub fn tasks_by_assignee(tasks: &EntityState<Task>, assignee_id: &str) -> Vec<Arc<Task>> {
    tasks
        .iter()
        .filter(|task| task.assignee_id.as_deref() == Some(assignee_id))
        .cloned()
        .collect()
}

/// Open tasks past their due date at `now`, most overdue first.
pub fn overdue_tasks(tasks: &EntityState<Task>, now: DateTime<Utc>) -> Vec<Arc<Task>> {
    let mut overdue: Vec<Arc<Task>> = tasks
        .iter()
        .filter(|task| task.is_overdue(now))
        .cloned()
        .collect();
    overdue.sort_by_key(|task| task.due_date);
    overdue
}
