//! Projects slice: the full project collection plus the project currently
//! opened in detail view.

use crate::commands::ProjectsCommand;
use crate::domain::criteria::{FilterValue, ProjectSort};
use shared_types::{Project, ProjectStatus};
use tf_01_entity_store::EntityState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectsState {
    pub entities: EntityState<Project>,
    pub selected: Option<Project>,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    pub filter: FilterValue<ProjectStatus>,
    /// Matched against name, description and tags.
    pub search_query: String,
    pub sort_by: ProjectSort,
}

impl ProjectsState {
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

    fn settled(self, entities: EntityState<Project>) -> Self {
        Self {
            entities,
            loading: false,
            error: None,
            ..self
        }
    }
}

pub fn reduce(state: ProjectsState, command: &ProjectsCommand) -> ProjectsState {
    match command {
        ProjectsCommand::Load
        | ProjectsCommand::LoadByTags(_)
        | ProjectsCommand::LoadByDateRange(_)
        | ProjectsCommand::LoadById(_)
        | ProjectsCommand::Create(_)
        | ProjectsCommand::Update { .. }
        | ProjectsCommand::Archive(_)
        | ProjectsCommand::Unarchive(_)
        | ProjectsCommand::ChangeStatus { .. }
        | ProjectsCommand::ChangePriority { .. }
        | ProjectsCommand::Delete(_)
        | ProjectsCommand::Duplicate(_) => state.pending(),

        ProjectsCommand::LoadSuccess(projects) => {
            let entities = state.entities.clone().set_all(projects.iter().cloned());
            ProjectsState {
                loaded: true,
                ..state.settled(entities)
            }
        }
        ProjectsCommand::LoadByIdSuccess(project) => ProjectsState {
            selected: Some(project.clone()),
            loading: false,
            error: None,
            ..state
        },
        ProjectsCommand::CreateSuccess(project) | ProjectsCommand::DuplicateSuccess(project) => {
            let entities = state.entities.clone().add_one(project.clone());
            state.settled(entities)
        }
        ProjectsCommand::UpdateSuccess(project) => {
            let entities = state.entities.clone().upsert_one(project.clone());
            let selected = match state.selected {
                Some(ref current) if current.id == project.id => Some(project.clone()),
                ref other => other.clone(),
            };
            ProjectsState {
                selected,
                ..state.settled(entities)
            }
        }
        ProjectsCommand::DeleteSuccess(id) => {
            let entities = state.entities.clone().remove_one(id);
            let selected = state.selected.clone().filter(|p| &p.id != id);
            ProjectsState {
                selected,
                ..state.settled(entities)
            }
        }

        ProjectsCommand::LoadFailure(error)
        | ProjectsCommand::LoadByIdFailure(error)
        | ProjectsCommand::CreateFailure(error)
        | ProjectsCommand::UpdateFailure(error)
        | ProjectsCommand::DeleteFailure(error)
        | ProjectsCommand::DuplicateFailure(error) => state.failed(error),

        ProjectsCommand::Clear => ProjectsState {
            entities: EntityState::new(),
            selected: None,
            loaded: false,
            ..state
        },
        ProjectsCommand::SetSelected(project) => ProjectsState {
            selected: project.clone(),
            ..state
        },
        ProjectsCommand::Filter(filter) => ProjectsState {
            filter: filter.clone(),
            ..state
        },
        ProjectsCommand::Search(query) => ProjectsState {
            search_query: query.clone(),
            ..state
        },
        ProjectsCommand::UpdateSort(sort) => ProjectsState {
            sort_by: *sort,
            ..state
        },
        ProjectsCommand::ClearError => ProjectsState {
            error: None,
            ..state
        },
    }
}
