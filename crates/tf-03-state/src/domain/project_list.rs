//! Paginated project-list slice.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | selection ⊆ loaded ids | select ignores unknown ids; every removal or replacement prunes the selection |
//! | result-set change resets page to 1 and clears selection | `reset_view()` on every filter/sort/search command |
//! | prefetched page never enters the list | stored in `prefetched` only |

use crate::commands::{
    PaginationPatch, ProjectListCommand, ProjectListFiltersPatch, ProjectPage,
};
use crate::domain::criteria::{DateRange, FilterValue, ProjectSort};
use shared_types::{EntityId, Project, ProjectQuery, ProjectStatus};
use tf_01_entity_store::EntityState;

/// Default page size of the project list.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectListFilters {
    pub search_term: String,
    pub status: FilterValue<ProjectStatus>,
    pub owner_id: Option<EntityId>,
    pub date_range: DateRange,
}

impl ProjectListFilters {
    fn merge(&self, patch: &ProjectListFiltersPatch) -> Self {
        Self {
            search_term: patch
                .search_term
                .clone()
                .unwrap_or_else(|| self.search_term.clone()),
            status: patch.status.clone().unwrap_or_else(|| self.status.clone()),
            owner_id: patch.owner_id.clone().unwrap_or_else(|| self.owner_id.clone()),
            date_range: patch.date_range.unwrap_or(self.date_range),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u32,
    pub has_more: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
            has_more: true,
        }
    }
}

impl Pagination {
    fn merge(self, patch: &PaginationPatch) -> Self {
        Self {
            page: patch.page.unwrap_or(self.page),
            page_size: patch.page_size.unwrap_or(self.page_size),
            total: patch.total.unwrap_or(self.total),
            has_more: patch.has_more.unwrap_or(self.has_more),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectListState {
    pub entities: EntityState<Project>,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: ProjectListFilters,
    pub sort: ProjectSort,
    pub pagination: Pagination,
    /// Selection in selection order.
    pub selected_ids: Vec<EntityId>,
    /// Most recent prefetched page, kept apart from the list.
    pub prefetched: Option<ProjectPage>,
}

impl ProjectListState {
    /// Empty list with a custom page size.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            pagination: Pagination {
                page_size,
                ..Pagination::default()
            },
            ..Self::default()
        }
    }

    /// Request shape for `page` under the current filters and sort.
    pub fn query(&self, page: u32) -> ProjectQuery {
        let search = self.filters.search_term.trim();
        ProjectQuery {
            page,
            limit: self.pagination.page_size,
            search: (!search.is_empty()).then(|| search.to_string()),
            status: self.filters.status.as_option().copied(),
            owner_id: self.filters.owner_id.clone(),
            start_date: self.filters.date_range.start,
            end_date: self.filters.date_range.end,
            sort_by: self.sort.field,
            sort_order: self.sort.direction,
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    fn pending(self) -> Self {
        Self {
            loading: true,
            error: None,
            ..self
        }
    }

    fn failed(self, error: &str) -> Self {
        Self {
            loading: false,
            error: Some(error.to_string()),
            ..self
        }
    }

    /// Swap in new entities and drop selected ids that no longer exist.
    fn with_entities(self, entities: EntityState<Project>) -> Self {
        let selected_ids = self
            .selected_ids
            .iter()
            .filter(|id| entities.contains(id))
            .cloned()
            .collect();
        Self {
            entities,
            selected_ids,
            ..self
        }
    }

    fn reset_view(self) -> Self {
        Self {
            pagination: Pagination {
                page: 1,
                ..self.pagination
            },
            selected_ids: Vec::new(),
            ..self
        }
    }

    fn adjust_total(self, delta: i64) -> Self {
        let total = (i64::from(self.pagination.total) + delta).max(0);
        Self {
            pagination: Pagination {
                total: u32::try_from(total).unwrap_or(u32::MAX),
                ..self.pagination
            },
            ..self
        }
    }
}

pub fn reduce(state: ProjectListState, command: &ProjectListCommand) -> ProjectListState {
    match command {
        ProjectListCommand::Load { .. } => state.pending(),
        // Nothing is fetched past the last page.
        ProjectListCommand::LoadNextPage if state.pagination.has_more => state.pending(),
        ProjectListCommand::LoadNextPage => state,
        ProjectListCommand::LoadSuccess { page, append } => {
            let entities = if *append {
                state.entities.clone().add_many(page.projects.iter().cloned())
            } else {
                state.entities.clone().set_all(page.projects.iter().cloned())
            };
            let prefetched = if *append { state.prefetched.clone() } else { None };
            ProjectListState {
                pagination: Pagination {
                    total: page.total,
                    has_more: page.has_more,
                    ..state.pagination
                },
                loading: false,
                error: None,
                prefetched,
                ..state.with_entities(entities)
            }
        }
        ProjectListCommand::LoadNextPageSuccess(page) => {
            let entities = state.entities.clone().add_many(page.projects.iter().cloned());
            ProjectListState {
                pagination: Pagination {
                    page: state.pagination.page + 1,
                    total: page.total,
                    has_more: page.has_more,
                    ..state.pagination
                },
                loading: false,
                error: None,
                prefetched: None,
                ..state.with_entities(entities)
            }
        }
        ProjectListCommand::LoadFailure(error) | ProjectListCommand::LoadNextPageFailure(error) => {
            state.failed(error)
        }

        ProjectListCommand::PrefetchNextPage => state,
        ProjectListCommand::PrefetchNextPageSuccess(page) => ProjectListState {
            prefetched: Some(page.clone()),
            ..state
        },
        ProjectListCommand::PrefetchNextPageFailure(_) => ProjectListState {
            prefetched: None,
            ..state
        },

        ProjectListCommand::UpdateFilters(patch) => ProjectListState {
            filters: state.filters.merge(patch),
            ..state
        }
        .reset_view(),
        ProjectListCommand::ResetFilters => ProjectListState {
            filters: ProjectListFilters::default(),
            ..state
        }
        .reset_view(),
        ProjectListCommand::UpdateSort(sort) => ProjectListState {
            sort: *sort,
            ..state
        }
        .reset_view(),
        ProjectListCommand::ResetSort => ProjectListState {
            sort: ProjectSort::default(),
            ..state
        }
        .reset_view(),
        ProjectListCommand::UpdateSearchTerm(term) => ProjectListState {
            filters: ProjectListFilters {
                search_term: term.clone(),
                ..state.filters.clone()
            },
            ..state
        }
        .reset_view(),
        ProjectListCommand::UpdateStatusFilter(status) => ProjectListState {
            filters: ProjectListFilters {
                status: status.clone(),
                ..state.filters.clone()
            },
            ..state
        }
        .reset_view(),
        ProjectListCommand::UpdateDateRange(range) => ProjectListState {
            filters: ProjectListFilters {
                date_range: *range,
                ..state.filters.clone()
            },
            ..state
        }
        .reset_view(),

        ProjectListCommand::UpdatePagination(patch) => ProjectListState {
            pagination: state.pagination.merge(patch),
            ..state
        },
        ProjectListCommand::ResetPagination => ProjectListState {
            pagination: Pagination {
                page_size: state.pagination.page_size,
                ..Pagination::default()
            },
            ..state
        },

        ProjectListCommand::Select(id) => {
            if !state.entities.contains(id) || state.is_selected(id) {
                return state;
            }
            let mut selected_ids = state.selected_ids.clone();
            selected_ids.push(id.clone());
            ProjectListState {
                selected_ids,
                ..state
            }
        }
        ProjectListCommand::Deselect(id) => {
            let selected_ids = state
                .selected_ids
                .iter()
                .filter(|s| *s != id)
                .cloned()
                .collect();
            ProjectListState {
                selected_ids,
                ..state
            }
        }
        ProjectListCommand::SelectAll => ProjectListState {
            selected_ids: state.entities.ids().to_vec(),
            ..state
        },
        ProjectListCommand::DeselectAll => ProjectListState {
            selected_ids: Vec::new(),
            ..state
        },
        ProjectListCommand::ToggleSelection(id) => {
            if state.is_selected(id) {
                reduce(state, &ProjectListCommand::Deselect(id.clone()))
            } else {
                reduce(state, &ProjectListCommand::Select(id.clone()))
            }
        }

        ProjectListCommand::Create(_)
        | ProjectListCommand::Update { .. }
        | ProjectListCommand::Delete(_)
        | ProjectListCommand::Archive(_)
        | ProjectListCommand::Duplicate(_) => state,

        ProjectListCommand::CreateSuccess(project)
        | ProjectListCommand::DuplicateSuccess(project) => {
            let entities = state.entities.clone().prepend_one(project.clone());
            let grew = entities.len() > state.entities.len();
            let state = ProjectListState {
                error: None,
                ..state.with_entities(entities)
            };
            if grew {
                state.adjust_total(1)
            } else {
                state
            }
        }
        ProjectListCommand::UpdateSuccess(project)
        | ProjectListCommand::ArchiveSuccess(project) => {
            let entities = state.entities.clone().replace_one(project.clone());
            ProjectListState {
                error: None,
                ..state.with_entities(entities)
            }
        }
        ProjectListCommand::DeleteSuccess(id) => {
            let existed = state.entities.contains(id);
            let entities = state.entities.clone().remove_one(id);
            let state = ProjectListState {
                error: None,
                ..state.with_entities(entities)
            };
            if existed {
                state.adjust_total(-1)
            } else {
                state
            }
        }
        ProjectListCommand::CreateFailure(error)
        | ProjectListCommand::UpdateFailure(error)
        | ProjectListCommand::DeleteFailure(error)
        | ProjectListCommand::ArchiveFailure(error)
        | ProjectListCommand::DuplicateFailure(error) => ProjectListState {
            error: Some(error.clone()),
            ..state
        },

        ProjectListCommand::SetLoading(loading) => ProjectListState {
            loading: *loading,
            ..state
        },
        ProjectListCommand::ClearError => ProjectListState {
            error: None,
            ..state
        },
        ProjectListCommand::Reset => {
            ProjectListState::with_page_size(state.pagination.page_size)
        }
    }
}
