//! Projections over the paginated project list.

use shared_types::{EntityId, Project, ProjectSortField};
use std::cmp::Ordering;
use std::sync::Arc;
use tf_01_entity_store::EntityState;
use tf_03_state::{Pagination, ProjectListFilters, ProjectSort};

use super::directed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub page_size: u32,
    pub total: u32,
    pub has_more: bool,
    /// Projects currently loaded.
    pub current_count: usize,
    pub total_pages: u32,
}

impl PaginationInfo {
    pub fn new(pagination: &Pagination, current_count: usize) -> Self {
        let total_pages = if pagination.page_size == 0 {
            0
        } else {
            pagination.total.div_ceil(pagination.page_size)
        };
        Self {
            current_page: pagination.page,
            page_size: pagination.page_size,
            total: pagination.total,
            has_more: pagination.has_more,
            current_count,
            total_pages,
        }
    }
}

/// Every loaded project is selected. False for an empty list.
pub fn is_all_selected(projects: &EntityState<Project>, selected: &[EntityId]) -> bool {
    !projects.is_empty() && projects.ids().iter().all(|id| selected.contains(id))
}

/// Some, but not all, loaded projects are selected.
pub fn is_partially_selected(projects: &EntityState<Project>, selected: &[EntityId]) -> bool {
    !projects.is_empty() && !selected.is_empty() && selected.len() < projects.len()
}

/// Selected projects in list order.
pub fn selected_projects(projects: &EntityState<Project>, selected: &[EntityId]) -> Vec<Arc<Project>> {
    projects
        .iter()
        .filter(|p| selected.contains(&p.id))
        .cloned()
        .collect()
}

/// Human-readable chips for every active filter.
pub fn active_filter_labels(filters: &ProjectListFilters) -> Vec<String> {
    let mut labels = Vec::new();
    let search = filters.search_term.trim();
    if !search.is_empty() {
        labels.push(format!("Search: \"{search}\""));
    }
    if let Some(status) = filters.status.as_option() {
        labels.push(format!("Status: {}", status.label()));
    }
    if let Some(owner) = &filters.owner_id {
        labels.push(format!("Owner: {owner}"));
    }
    let range = &filters.date_range;
    if !range.is_open() {
        let mut parts = Vec::new();
        if let Some(start) = range.start {
            parts.push(format!("from {}", start.format("%Y-%m-%d")));
        }
        if let Some(end) = range.end {
            parts.push(format!("to {}", end.format("%Y-%m-%d")));
        }
        labels.push(format!("Date: {}", parts.join(" ")));
    }
    labels
}

pub fn has_active_filters(filters: &ProjectListFilters) -> bool {
    !active_filter_labels(filters).is_empty()
}

/// Local filter: search term over name and description, status, owner and
/// an inclusive creation-date range.
pub fn project_matches_filters(project: &Project, filters: &ProjectListFilters) -> bool {
    let search = filters.search_term.trim();
    if !search.is_empty() {
        let search = search.to_lowercase();
        let hit = project.name.to_lowercase().contains(&search)
            || project
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&search));
        if !hit {
            return false;
        }
    }
    filters.status.matches(&project.status)
        && filters
            .owner_id
            .as_ref()
            .is_none_or(|owner| *owner == project.owner_id)
        && filters.date_range.contains(project.created_at)
}

pub fn filter_list(projects: &EntityState<Project>, filters: &ProjectListFilters) -> Vec<Arc<Project>> {
    projects
        .iter()
        .filter(|p| project_matches_filters(p, filters))
        .cloned()
        .collect()
}

/// Comparator for the list sort. Text fields compare case-insensitively;
/// a missing description sorts as empty.
pub fn compare_projects(a: &Project, b: &Project, sort: ProjectSort) -> Ordering {
    let ordering = match sort.field {
        ProjectSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProjectSortField::Description => {
            let text = |p: &Project| p.description.as_deref().unwrap_or_default().to_lowercase();
            text(a).cmp(&text(b))
        }
        ProjectSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        ProjectSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        ProjectSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        ProjectSortField::Id => a.id.to_lowercase().cmp(&b.id.to_lowercase()),
    };
    directed(ordering, sort.direction)
}

pub fn sort_list(projects: &mut [Arc<Project>], sort: ProjectSort) {
    projects.sort_by(|a, b| compare_projects(a, b, sort));
}
