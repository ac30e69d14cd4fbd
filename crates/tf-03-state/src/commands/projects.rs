use crate::domain::criteria::{DateRange, FilterValue, ProjectSort};
use shared_types::{
    CreateProjectRequest, EntityId, Priority, Project, ProjectStatus, UpdateProjectRequest,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectsCommand {
    Load,
    LoadByTags(Vec<String>),
    LoadByDateRange(DateRange),
    LoadSuccess(Vec<Project>),
    LoadFailure(String),

    LoadById(EntityId),
    LoadByIdSuccess(Project),
    LoadByIdFailure(String),

    Create(CreateProjectRequest),
    CreateSuccess(Project),
    CreateFailure(String),

    Update { id: EntityId, changes: UpdateProjectRequest },
    Archive(EntityId),
    Unarchive(EntityId),
    ChangeStatus { id: EntityId, status: ProjectStatus },
    ChangePriority { id: EntityId, priority: Priority },
    UpdateSuccess(Project),
    UpdateFailure(String),

    Delete(EntityId),
    DeleteSuccess(EntityId),
    DeleteFailure(String),

    Duplicate(EntityId),
    DuplicateSuccess(Project),
    DuplicateFailure(String),

    Clear,
    SetSelected(Option<Project>),
    Filter(FilterValue<ProjectStatus>),
    Search(String),
    UpdateSort(ProjectSort),
    ClearError,
}

impl ProjectsCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectsCommand::Load => "load",
            ProjectsCommand::LoadByTags(_) => "load-by-tags",
            ProjectsCommand::LoadByDateRange(_) => "load-by-date-range",
            ProjectsCommand::LoadSuccess(_) => "load-success",
            ProjectsCommand::LoadFailure(_) => "load-failure",
            ProjectsCommand::LoadById(_) => "load-by-id",
            ProjectsCommand::LoadByIdSuccess(_) => "load-by-id-success",
            ProjectsCommand::LoadByIdFailure(_) => "load-by-id-failure",
            ProjectsCommand::Create(_) => "create",
            ProjectsCommand::CreateSuccess(_) => "create-success",
            ProjectsCommand::CreateFailure(_) => "create-failure",
            ProjectsCommand::Update { .. } => "update",
            ProjectsCommand::Archive(_) => "archive",
            ProjectsCommand::Unarchive(_) => "unarchive",
            ProjectsCommand::ChangeStatus { .. } => "change-status",
            ProjectsCommand::ChangePriority { .. } => "change-priority",
            ProjectsCommand::UpdateSuccess(_) => "update-success",
            ProjectsCommand::UpdateFailure(_) => "update-failure",
            ProjectsCommand::Delete(_) => "delete",
            ProjectsCommand::DeleteSuccess(_) => "delete-success",
            ProjectsCommand::DeleteFailure(_) => "delete-failure",
            ProjectsCommand::Duplicate(_) => "duplicate",
            ProjectsCommand::DuplicateSuccess(_) => "duplicate-success",
            ProjectsCommand::DuplicateFailure(_) => "duplicate-failure",
            ProjectsCommand::Clear => "clear",
            ProjectsCommand::SetSelected(_) => "set-selected",
            ProjectsCommand::Filter(_) => "filter",
            ProjectsCommand::Search(_) => "search",
            ProjectsCommand::UpdateSort(_) => "update-sort",
            ProjectsCommand::ClearError => "clear-error",
        }
    }
}
