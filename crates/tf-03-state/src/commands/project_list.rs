use crate::domain::criteria::{DateRange, FilterValue, ProjectSort};
use shared_types::{
    CreateProjectRequest, EntityId, PaginatedResponse, Project, ProjectQuery, ProjectStatus,
    UpdateProjectRequest,
};

/// One page of the paginated project list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub page: u32,
    pub total: u32,
    pub has_more: bool,
}

impl From<PaginatedResponse<Project>> for ProjectPage {
    fn from(response: PaginatedResponse<Project>) -> Self {
        let has_more = response.pagination.has_more();
        Self {
            projects: response.data,
            page: response.pagination.page,
            total: response.pagination.total,
            has_more,
        }
    }
}

/// Partial filter update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectListFiltersPatch {
    pub search_term: Option<String>,
    pub status: Option<FilterValue<ProjectStatus>>,
    pub owner_id: Option<Option<EntityId>>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationPatch {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub total: Option<u32>,
    pub has_more: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectListCommand {
    Load { query: ProjectQuery, append: bool },
    LoadSuccess { page: ProjectPage, append: bool },
    LoadFailure(String),

    LoadNextPage,
    LoadNextPageSuccess(ProjectPage),
    LoadNextPageFailure(String),

    PrefetchNextPage,
    PrefetchNextPageSuccess(ProjectPage),
    PrefetchNextPageFailure(String),

    UpdateFilters(ProjectListFiltersPatch),
    ResetFilters,
    UpdateSort(ProjectSort),
    ResetSort,
    UpdateSearchTerm(String),
    UpdateStatusFilter(FilterValue<ProjectStatus>),
    UpdateDateRange(DateRange),

    UpdatePagination(PaginationPatch),
    ResetPagination,

    Select(EntityId),
    Deselect(EntityId),
    SelectAll,
    DeselectAll,
    ToggleSelection(EntityId),

    Create(CreateProjectRequest),
    CreateSuccess(Project),
    CreateFailure(String),

    Update { id: EntityId, changes: UpdateProjectRequest },
    UpdateSuccess(Project),
    UpdateFailure(String),

    Delete(EntityId),
    DeleteSuccess(EntityId),
    DeleteFailure(String),

    Archive(EntityId),
    ArchiveSuccess(Project),
    ArchiveFailure(String),

    Duplicate(EntityId),
    DuplicateSuccess(Project),
    DuplicateFailure(String),

    SetLoading(bool),
    ClearError,
    Reset,
}

impl ProjectListCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectListCommand::Load { .. } => "load",
            ProjectListCommand::LoadSuccess { .. } => "load-success",
            ProjectListCommand::LoadFailure(_) => "load-failure",
            ProjectListCommand::LoadNextPage => "load-next-page",
            ProjectListCommand::LoadNextPageSuccess(_) => "load-next-page-success",
            ProjectListCommand::LoadNextPageFailure(_) => "load-next-page-failure",
            ProjectListCommand::PrefetchNextPage => "prefetch-next-page",
            ProjectListCommand::PrefetchNextPageSuccess(_) => "prefetch-next-page-success",
            ProjectListCommand::PrefetchNextPageFailure(_) => "prefetch-next-page-failure",
            ProjectListCommand::UpdateFilters(_) => "update-filters",
            ProjectListCommand::ResetFilters => "reset-filters",
            ProjectListCommand::UpdateSort(_) => "update-sort",
            ProjectListCommand::ResetSort => "reset-sort",
            ProjectListCommand::UpdateSearchTerm(_) => "update-search-term",
            ProjectListCommand::UpdateStatusFilter(_) => "update-status-filter",
            ProjectListCommand::UpdateDateRange(_) => "update-date-range",
            ProjectListCommand::UpdatePagination(_) => "update-pagination",
            ProjectListCommand::ResetPagination => "reset-pagination",
            ProjectListCommand::Select(_) => "select",
            ProjectListCommand::Deselect(_) => "deselect",
            ProjectListCommand::SelectAll => "select-all",
            ProjectListCommand::DeselectAll => "deselect-all",
            ProjectListCommand::ToggleSelection(_) => "toggle-selection",
            ProjectListCommand::Create(_) => "create",
            ProjectListCommand::CreateSuccess(_) => "create-success",
            ProjectListCommand::CreateFailure(_) => "create-failure",
            ProjectListCommand::Update { .. } => "update",
            ProjectListCommand::UpdateSuccess(_) => "update-success",
            ProjectListCommand::UpdateFailure(_) => "update-failure",
            ProjectListCommand::Delete(_) => "delete",
            ProjectListCommand::DeleteSuccess(_) => "delete-success",
            ProjectListCommand::DeleteFailure(_) => "delete-failure",
            ProjectListCommand::Archive(_) => "archive",
            ProjectListCommand::ArchiveSuccess(_) => "archive-success",
            ProjectListCommand::ArchiveFailure(_) => "archive-failure",
            ProjectListCommand::Duplicate(_) => "duplicate",
            ProjectListCommand::DuplicateSuccess(_) => "duplicate-success",
            ProjectListCommand::DuplicateFailure(_) => "duplicate-failure",
            ProjectListCommand::SetLoading(_) => "set-loading",
            ProjectListCommand::ClearError => "clear-error",
            ProjectListCommand::Reset => "reset",
        }
    }

    /// Commands that change the result set and therefore reset the page and
    /// the selection.
    pub fn changes_result_set(&self) -> bool {
        matches!(
            self,
            ProjectListCommand::UpdateFilters(_)
                | ProjectListCommand::ResetFilters
                | ProjectListCommand::UpdateSort(_)
                | ProjectListCommand::ResetSort
                | ProjectListCommand::UpdateSearchTerm(_)
                | ProjectListCommand::UpdateStatusFilter(_)
                | ProjectListCommand::UpdateDateRange(_)
        )
    }
}
