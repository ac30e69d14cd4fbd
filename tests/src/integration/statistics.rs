//! # Derived Views Over Store State
//!
//! Statistics and dashboard figures computed from dispatched state, and memo
//! reuse when an unrelated slice changes.

#[cfg(test)]
mod tests {
    use crate::fixtures::{project, task};
    use shared_types::{ProjectStatus, TaskStatus};
    use std::sync::Arc;
    use tf_03_state::{AppState, ProjectsCommand, Store, TasksCommand};
    use tf_04_derived_views::Views;

    fn five_projects() -> Vec<shared_types::Project> {
        vec![
            project("a", ProjectStatus::Active),
            project("b", ProjectStatus::Active),
            project("c", ProjectStatus::Active),
            project("d", ProjectStatus::Completed),
            project("e", ProjectStatus::OnHold),
        ]
    }

    #[test]
    fn test_statistics_over_five_projects() {
        let store = Store::new(AppState::default());
        let views = Views::new();
        let state = store.dispatch(ProjectsCommand::LoadSuccess(five_projects()));

        let stats = views.project_statistics(&state);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.on_hold, 1);
        assert_eq!(stats.completion_rate, 20.0);
    }

    #[test]
    fn test_statistics_reused_across_task_changes() {
        let store = Store::new(AppState::default());
        let views = Views::new();
        let state = store.dispatch(ProjectsCommand::LoadSuccess(five_projects()));
        let first = views.project_statistics(&state);

        let state = store.dispatch(TasksCommand::LoadSuccess(vec![task("t1", TaskStatus::Todo, 0)]));
        let second = views.project_statistics(&state);
        assert!(Arc::ptr_eq(&first, &second));

        let state = store.dispatch(ProjectsCommand::DeleteSuccess("d".into()));
        let third = views.project_statistics(&state);
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third.completion_rate, 0.0);

        let recomputes = views
            .recompute_counts()
            .into_iter()
            .find(|(name, _)| *name == "projects.statistics")
            .map(|(_, count)| count);
        assert_eq!(recomputes, Some(2));
    }

    #[test]
    fn test_dashboard_busiest_projects() {
        let store = Store::new(AppState::default());
        let views = Views::new();
        store.dispatch(ProjectsCommand::LoadSuccess(five_projects()));

        let mut tasks = vec![
            task("t1", TaskStatus::Todo, 0),
            task("t2", TaskStatus::InProgress, 0),
            task("t3", TaskStatus::Done, 0),
            task("t4", TaskStatus::Todo, 1),
        ];
        tasks[0].project_id = "b".into();
        tasks[1].project_id = "b".into();
        tasks[2].project_id = "b".into();
        tasks[3].project_id = "a".into();
        let state = store.dispatch(TasksCommand::LoadSuccess(tasks));

        let summary = views.dashboard(&state, chrono::Utc::now());
        assert_eq!(summary.projects.total, 5);
        assert_eq!(summary.tasks.total, 4);
        assert_eq!(summary.tasks.done, 1);
        let busiest: Vec<(&str, usize)> = summary
            .busiest_projects
            .iter()
            .map(|load| (load.project_id.as_str(), load.open_tasks))
            .collect();
        assert_eq!(busiest, vec![("b", 2), ("a", 1)]);
    }
}
