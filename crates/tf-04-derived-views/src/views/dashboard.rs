//! Cross-slice summary: reads projects, tasks and time entries, writes
//! nothing.

use super::projects::ProjectStatistics;
use super::tasks::TaskStats;
use super::time_tracking::TimeStats;
use chrono::NaiveDate;
use shared_types::{EntityId, Project, Task, TaskStatus, TimeEntry};
use std::collections::HashMap;
use tf_01_entity_store::EntityState;

/// Open-task load of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLoad {
    pub project_id: EntityId,
    pub name: String,
    pub open_tasks: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub projects: ProjectStatistics,
    pub tasks: TaskStats,
    pub time: TimeStats,
    /// Projects with open tasks, busiest first, ties by name.
    pub busiest_projects: Vec<ProjectLoad>,
}

/// How many entries `busiest_projects` keeps.
pub const BUSIEST_LIMIT: usize = 5;

impl DashboardSummary {
    pub fn compute(
        projects: &EntityState<Project>,
        tasks: &EntityState<Task>,
        entries: &EntityState<TimeEntry>,
        today: NaiveDate,
    ) -> Self {
        let mut open: HashMap<&str, usize> = HashMap::new();
        for task in tasks.iter().filter(|t| t.status != TaskStatus::Done) {
            *open.entry(task.project_id.as_str()).or_default() += 1;
        }

        let mut busiest: Vec<ProjectLoad> = projects
            .iter()
            .filter_map(|p| {
                open.get(p.id.as_str()).map(|count| ProjectLoad {
                    project_id: p.id.clone(),
                    name: p.name.clone(),
                    open_tasks: *count,
                })
            })
            .collect();
        busiest.sort_by(|a, b| b.open_tasks.cmp(&a.open_tasks).then_with(|| a.name.cmp(&b.name)));
        busiest.truncate(BUSIEST_LIMIT);

        Self {
            projects: ProjectStatistics::compute(projects),
            tasks: TaskStats::tally(tasks),
            time: TimeStats::compute(entries, today),
            busiest_projects: busiest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_busiest_projects_skip_done_and_unknown() {
        let mut alpha = Project::new("Alpha", "u1");
        alpha.id = "p1".into();
        let mut beta = Project::new("Beta", "u1");
        beta.id = "p2".into();
        let projects = EntityState::new().set_all(vec![alpha, beta]);

        let mut done = Task::new("done", "p1", "u1");
        done.status = TaskStatus::Done;
        let tasks = EntityState::new().set_all(vec![
            Task::new("a", "p1", "u1"),
            Task::new("b", "p2", "u1"),
            Task::new("c", "p2", "u1"),
            Task::new("orphan", "p9", "u1"),
            done,
        ]);

        let summary =
            DashboardSummary::compute(&projects, &tasks, &EntityState::new(), Utc::now().date_naive());
        assert_eq!(summary.busiest_projects.len(), 2);
        assert_eq!(summary.busiest_projects[0].project_id, "p2");
        assert_eq!(summary.busiest_projects[0].open_tasks, 2);
        assert_eq!(summary.tasks.total, 5);
        assert_eq!(summary.projects.total, 2);
    }
}
