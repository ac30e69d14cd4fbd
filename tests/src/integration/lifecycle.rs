//! # Entity Lifecycle Through the Store
//!
//! Follow-up commands dispatched into a live [`Store`] and read back through
//! [`Views`], the way the effect pipeline and a screen would see them.

#[cfg(test)]
mod tests {
    use crate::fixtures::project;
    use shared_types::ProjectStatus;
    use tf_03_state::{
        AppState, PaginationPatch, ProjectListCommand, ProjectPage, ProjectsCommand, Store,
    };
    use tf_04_derived_views::Views;

    fn page(ids: &[&str], total: u32) -> ProjectPage {
        ProjectPage {
            projects: ids.iter().map(|id| project(id, ProjectStatus::Active)).collect(),
            page: 1,
            total,
            has_more: total as usize > ids.len(),
        }
    }

    #[test]
    fn test_create_update_delete_lifecycle() {
        let store = Store::new(AppState::default());
        let views = Views::new();
        store.dispatch(ProjectsCommand::LoadSuccess(vec![
            project("a", ProjectStatus::Active),
            project("b", ProjectStatus::Active),
        ]));

        let created = project("p", ProjectStatus::Active);
        let state = store.dispatch(ProjectsCommand::CreateSuccess(created.clone()));
        assert!(views.all_projects(&state).iter().any(|p| **p == created));
        let order_before = state.projects.entities.ids().to_vec();

        let mut renamed = created.clone();
        renamed.name = "Renamed".into();
        let state = store.dispatch(ProjectsCommand::UpdateSuccess(renamed.clone()));
        assert_eq!(views.project_by_id(&state, "p").as_deref(), Some(&renamed));
        assert_eq!(state.projects.entities.ids(), order_before.as_slice());

        let state = store.dispatch(ProjectsCommand::DeleteSuccess("p".into()));
        assert!(views.project_by_id(&state, "p").is_none());
        assert!(!state.projects.entities.ids().iter().any(|id| id == "p"));
        assert!(state.projects.entities.check_consistency().is_ok());
    }

    #[test]
    fn test_delete_drops_id_from_list_selection() {
        let store = Store::new(AppState::default());
        let views = Views::new();
        store.dispatch(ProjectListCommand::LoadSuccess {
            page: page(&["a", "b", "c"], 3),
            append: false,
        });
        store.dispatch(ProjectListCommand::Select("b".into()));
        store.dispatch(ProjectListCommand::Select("c".into()));

        let state = store.dispatch(ProjectListCommand::DeleteSuccess("b".into()));
        assert_eq!(state.project_list.selected_ids, vec!["c".to_string()]);
        assert_eq!(state.project_list.pagination.total, 2);
        let selected: Vec<String> = views
            .list_selected_projects(&state)
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(selected, vec!["c".to_string()]);
    }

    #[test]
    fn test_search_change_resets_page_and_selection() {
        let store = Store::new(AppState::default());
        let views = Views::new();
        store.dispatch(ProjectListCommand::LoadSuccess {
            page: page(&["a", "b"], 30),
            append: false,
        });
        store.dispatch(ProjectListCommand::UpdatePagination(PaginationPatch {
            page: Some(3),
            ..Default::default()
        }));
        let state = store.dispatch(ProjectListCommand::SelectAll);
        assert!(views.list_is_all_selected(&state));

        let state = store.dispatch(ProjectListCommand::UpdateSearchTerm("alpha".into()));
        assert_eq!(state.project_list.pagination.page, 1);
        assert!(state.project_list.selected_ids.is_empty());
        assert!(!views.list_is_all_selected(&state));
        assert!(views.list_has_active_filters(&state));
    }
}
