//! # Selectors
//!
//! [`Views`] is the read surface collaborators use. Collection views are
//! memoized on the slice fields they read, so asking again after an
//! unrelated command returns the same `Arc` without recomputing. Lookups
//! parameterised by an id are cheap scans and are not cached.
//!
//! Chained views key on the `Arc` of the view before them: the sorted task
//! list only re-sorts when the filtered list or the sort changed.

use crate::memo::Memo;
use crate::views::dashboard::DashboardSummary;
use crate::views::project_list::{self, PaginationInfo};
use crate::views::projects::{self, Grouped, ProjectStatistics, StatusCounts};
use crate::views::tasks::{self, KanbanBoard, TaskStats};
use crate::views::time_tracking::{self, TimeStats};
use chrono::{DateTime, NaiveDate, Utc};
use shared_types::{EntityId, Priority, Project, ProjectStatus, Task, TimeEntry};
use std::sync::Arc;
use tf_01_entity_store::EntityState;
use tf_03_state::{AppState, FilterValue, Pagination, ProjectListFilters, ProjectSort, TaskFilters, TaskSort};

type List<T> = Vec<Arc<T>>;

pub struct Views {
    filtered_tasks: Memo<(EntityState<Task>, TaskFilters), List<Task>>,
    sorted_tasks: Memo<(Arc<List<Task>>, TaskSort), List<Task>>,
    kanban: Memo<EntityState<Task>, KanbanBoard>,
    task_stats: Memo<EntityState<Task>, TaskStats>,

    filtered_projects: Memo<(EntityState<Project>, FilterValue<ProjectStatus>, String), List<Project>>,
    projects_by_status: Memo<EntityState<Project>, Grouped<ProjectStatus>>,
    projects_by_priority: Memo<EntityState<Project>, Grouped<Priority>>,
    recent_projects: Memo<EntityState<Project>, List<Project>>,
    project_statistics: Memo<EntityState<Project>, ProjectStatistics>,

    list_filtered: Memo<(EntityState<Project>, ProjectListFilters), List<Project>>,
    list_sorted: Memo<(Arc<List<Project>>, ProjectSort), List<Project>>,
    list_pagination: Memo<(Pagination, usize), PaginationInfo>,
    list_selected: Memo<(EntityState<Project>, Vec<EntityId>), List<Project>>,
    list_filter_labels: Memo<ProjectListFilters, Vec<String>>,
    list_stats: Memo<EntityState<Project>, StatusCounts>,
    list_grouped: Memo<EntityState<Project>, Grouped<ProjectStatus>>,

    time_stats: Memo<(EntityState<TimeEntry>, NaiveDate), TimeStats>,
    dashboard: Memo<
        (EntityState<Project>, EntityState<Task>, EntityState<TimeEntry>, NaiveDate),
        DashboardSummary,
    >,
}

impl std::fmt::Debug for Views {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Views").finish_non_exhaustive()
    }
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}

impl Views {
    pub fn new() -> Self {
        Self {
            filtered_tasks: Memo::new("tasks.filtered", |(entities, filters)| {
                tasks::filter_tasks(entities, filters)
            }),
            sorted_tasks: Memo::new("tasks.sorted", |(filtered, sort)| {
                let mut sorted = Vec::clone(filtered);
                tasks::sort_tasks(&mut sorted, *sort);
                sorted
            }),
            kanban: Memo::new("tasks.kanban", KanbanBoard::build),
            task_stats: Memo::new("tasks.stats", TaskStats::tally),

            filtered_projects: Memo::new("projects.filtered", |(entities, status, query)| {
                projects::filter_projects(entities, status, query)
            }),
            projects_by_status: Memo::new("projects.by_status", |entities| {
                projects::group_by_status(entities.iter())
            }),
            projects_by_priority: Memo::new("projects.by_priority", projects::group_by_priority),
            recent_projects: Memo::new("projects.recent", projects::recent_projects),
            project_statistics: Memo::new("projects.statistics", ProjectStatistics::compute),

            list_filtered: Memo::new("project_list.filtered", |(entities, filters)| {
                project_list::filter_list(entities, filters)
            }),
            list_sorted: Memo::new("project_list.sorted", |(filtered, sort)| {
                let mut sorted = Vec::clone(filtered);
                project_list::sort_list(&mut sorted, *sort);
                sorted
            }),
            list_pagination: Memo::new("project_list.pagination", |(pagination, count)| {
                PaginationInfo::new(pagination, *count)
            }),
            list_selected: Memo::new("project_list.selected", |(entities, selected)| {
                project_list::selected_projects(entities, selected)
            }),
            list_filter_labels: Memo::new(
                "project_list.filter_labels",
                project_list::active_filter_labels,
            ),
            list_stats: Memo::new("project_list.stats", |entities| {
                StatusCounts::tally(entities.iter())
            }),
            list_grouped: Memo::new("project_list.grouped", |entities| {
                projects::group_by_status(entities.iter())
            }),

            time_stats: Memo::new("time.stats", |(entries, today)| {
                TimeStats::compute(entries, *today)
            }),
            dashboard: Memo::new("dashboard", |(projects, tasks, entries, today)| {
                DashboardSummary::compute(projects, tasks, entries, *today)
            }),
        }
    }

    // =========================================================================
    // TASKS
    // =========================================================================

    pub fn all_tasks(&self, state: &AppState) -> List<Task> {
        state.tasks.entities.all()
    }

    pub fn task_by_id(&self, state: &AppState, id: &str) -> Option<Arc<Task>> {
        state.tasks.entities.get(id).cloned()
    }

    pub fn filtered_tasks(&self, state: &AppState) -> Arc<List<Task>> {
        self.filtered_tasks
            .get((state.tasks.entities.clone(), state.tasks.filters.clone()))
    }

    /// Filtered, then sorted.
    pub fn sorted_tasks(&self, state: &AppState) -> Arc<List<Task>> {
        let filtered = self.filtered_tasks(state);
        self.sorted_tasks.get((filtered, state.tasks.sort_by))
    }

    pub fn kanban(&self, state: &AppState) -> Arc<KanbanBoard> {
        self.kanban.get(state.tasks.entities.clone())
    }

    pub fn task_stats(&self, state: &AppState) -> Arc<TaskStats> {
        self.task_stats.get(state.tasks.entities.clone())
    }

    pub fn tasks_by_project(&self, state: &AppState, project_id: &str) -> List<Task> {
        tasks::tasks_by_project(&state.tasks.entities, project_id)
    }

    pub fn tasks_by_assignee(&self, state: &AppState, assignee_id: &str) -> List<Task> {
        tasks::tasks_by_assignee(&state.tasks.entities, assignee_id)
    }

    pub fn overdue_tasks(&self, state: &AppState, now: DateTime<Utc>) -> List<Task> {
        tasks::overdue_tasks(&state.tasks.entities, now)
    }

    // =========================================================================
    // PROJECTS
    // =========================================================================

    pub fn all_projects(&self, state: &AppState) -> List<Project> {
        state.projects.entities.all()
    }

    pub fn project_by_id(&self, state: &AppState, id: &str) -> Option<Arc<Project>> {
        state.projects.entities.get(id).cloned()
    }

    pub fn selected_project(&self, state: &AppState) -> Option<Project> {
        state.projects.selected.clone()
    }

    pub fn filtered_projects(&self, state: &AppState) -> Arc<List<Project>> {
        let slice = &state.projects;
        self.filtered_projects.get((
            slice.entities.clone(),
            slice.filter.clone(),
            slice.search_query.clone(),
        ))
    }

    pub fn projects_by_status(&self, state: &AppState) -> Arc<Grouped<ProjectStatus>> {
        self.projects_by_status.get(state.projects.entities.clone())
    }

    pub fn projects_by_priority(&self, state: &AppState) -> Arc<Grouped<Priority>> {
        self.projects_by_priority.get(state.projects.entities.clone())
    }

    pub fn recent_projects(&self, state: &AppState) -> Arc<List<Project>> {
        self.recent_projects.get(state.projects.entities.clone())
    }

    pub fn project_statistics(&self, state: &AppState) -> Arc<ProjectStatistics> {
        self.project_statistics.get(state.projects.entities.clone())
    }

    // =========================================================================
    // PROJECT LIST
    // =========================================================================

    pub fn list_projects(&self, state: &AppState) -> List<Project> {
        state.project_list.entities.all()
    }

    pub fn list_pagination_info(&self, state: &AppState) -> Arc<PaginationInfo> {
        let slice = &state.project_list;
        self.list_pagination
            .get((slice.pagination, slice.entities.len()))
    }

    pub fn list_selected_projects(&self, state: &AppState) -> Arc<List<Project>> {
        let slice = &state.project_list;
        self.list_selected
            .get((slice.entities.clone(), slice.selected_ids.clone()))
    }

    pub fn list_is_all_selected(&self, state: &AppState) -> bool {
        let slice = &state.project_list;
        project_list::is_all_selected(&slice.entities, &slice.selected_ids)
    }

    pub fn list_is_partially_selected(&self, state: &AppState) -> bool {
        let slice = &state.project_list;
        project_list::is_partially_selected(&slice.entities, &slice.selected_ids)
    }

    pub fn list_active_filters(&self, state: &AppState) -> Arc<Vec<String>> {
        self.list_filter_labels
            .get(state.project_list.filters.clone())
    }

    pub fn list_has_active_filters(&self, state: &AppState) -> bool {
        !self.list_active_filters(state).is_empty()
    }

    pub fn list_stats(&self, state: &AppState) -> Arc<StatusCounts> {
        self.list_stats.get(state.project_list.entities.clone())
    }

    pub fn list_grouped_by_status(&self, state: &AppState) -> Arc<Grouped<ProjectStatus>> {
        self.list_grouped.get(state.project_list.entities.clone())
    }

    pub fn list_filtered(&self, state: &AppState) -> Arc<List<Project>> {
        let slice = &state.project_list;
        self.list_filtered
            .get((slice.entities.clone(), slice.filters.clone()))
    }

    /// Filtered, then sorted.
    pub fn list_sorted(&self, state: &AppState) -> Arc<List<Project>> {
        let filtered = self.list_filtered(state);
        self.list_sorted.get((filtered, state.project_list.sort))
    }

    // =========================================================================
    // TIME TRACKING
    // =========================================================================

    pub fn all_time_entries(&self, state: &AppState) -> List<TimeEntry> {
        state.time_tracking.entities.all()
    }

    pub fn time_entries_by_task(&self, state: &AppState, task_id: &str) -> List<TimeEntry> {
        time_tracking::entries_by_task(&state.time_tracking.entities, task_id)
    }

    pub fn time_entries_by_user(&self, state: &AppState, user_id: &str) -> List<TimeEntry> {
        time_tracking::entries_by_user(&state.time_tracking.entities, user_id)
    }

    pub fn total_minutes_by_task(&self, state: &AppState, task_id: &str) -> u64 {
        time_tracking::total_minutes(&self.time_entries_by_task(state, task_id))
    }

    pub fn total_minutes_by_user(&self, state: &AppState, user_id: &str) -> u64 {
        time_tracking::total_minutes(&self.time_entries_by_user(state, user_id))
    }

    pub fn time_stats(&self, state: &AppState, now: DateTime<Utc>) -> Arc<TimeStats> {
        self.time_stats
            .get((state.time_tracking.entities.clone(), now.date_naive()))
    }

    pub fn is_timer_active(&self, state: &AppState) -> bool {
        state.time_tracking.active_timer.is_some()
    }

    pub fn active_elapsed_minutes(&self, state: &AppState, now: DateTime<Utc>) -> u32 {
        time_tracking::active_elapsed_minutes(state.time_tracking.active_timer.as_ref(), now)
    }

    // =========================================================================
    // CROSS-SLICE
    // =========================================================================

    pub fn dashboard(&self, state: &AppState, now: DateTime<Utc>) -> Arc<DashboardSummary> {
        self.dashboard.get((
            state.projects.entities.clone(),
            state.tasks.entities.clone(),
            state.time_tracking.entities.clone(),
            now.date_naive(),
        ))
    }

    /// Recompute counts per view, for diagnostics.
    pub fn recompute_counts(&self) -> Vec<(&'static str, u64)> {
        vec![
            (self.filtered_tasks.name(), self.filtered_tasks.recomputes()),
            (self.sorted_tasks.name(), self.sorted_tasks.recomputes()),
            (self.kanban.name(), self.kanban.recomputes()),
            (self.task_stats.name(), self.task_stats.recomputes()),
            (self.filtered_projects.name(), self.filtered_projects.recomputes()),
            (self.projects_by_status.name(), self.projects_by_status.recomputes()),
            (self.projects_by_priority.name(), self.projects_by_priority.recomputes()),
            (self.recent_projects.name(), self.recent_projects.recomputes()),
            (self.project_statistics.name(), self.project_statistics.recomputes()),
            (self.list_filtered.name(), self.list_filtered.recomputes()),
            (self.list_sorted.name(), self.list_sorted.recomputes()),
            (self.list_pagination.name(), self.list_pagination.recomputes()),
            (self.list_selected.name(), self.list_selected.recomputes()),
            (self.list_filter_labels.name(), self.list_filter_labels.recomputes()),
            (self.list_stats.name(), self.list_stats.recomputes()),
            (self.list_grouped.name(), self.list_grouped.recomputes()),
            (self.time_stats.name(), self.time_stats.recomputes()),
            (self.dashboard.name(), self.dashboard.recomputes()),
        ]
    }
}
