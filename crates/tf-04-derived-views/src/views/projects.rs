//! Project projections over the projects slice.

use shared_types::{Priority, Project, ProjectStatus};
use std::sync::Arc;
use tf_01_entity_store::EntityState;
use tf_03_state::FilterValue;

/// Projects grouped under a key, every key present even when empty.
pub type Grouped<K> = Vec<(K, Vec<Arc<Project>>)>;

/// How many projects `recent_projects` returns.
pub const RECENT_LIMIT: usize = 5;

/// Case-insensitive match of `query` against name, description and tags.
/// An empty query matches everything.
pub fn project_matches_query(project: &Project, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    project.name.to_lowercase().contains(&query)
        || project
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&query))
        || project.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

pub fn filter_projects(
    projects: &EntityState<Project>,
    status: &FilterValue<ProjectStatus>,
    query: &str,
) -> Vec<Arc<Project>> {
    projects
        .iter()
        .filter(|p| status.matches(&p.status) && project_matches_query(p, query))
        .cloned()
        .collect()
}

pub fn group_by_status<'a>(projects: impl Iterator<Item = &'a Arc<Project>>) -> Grouped<ProjectStatus> {
    let mut groups: Grouped<ProjectStatus> =
        ProjectStatus::ALL.iter().map(|s| (*s, Vec::new())).collect();
    for project in projects {
        if let Some((_, group)) = groups.iter_mut().find(|(s, _)| *s == project.status) {
            group.push(Arc::clone(project));
        }
    }
    groups
}

pub fn group_by_priority(projects: &EntityState<Project>) -> Grouped<Priority> {
    let mut groups: Grouped<Priority> = Priority::ALL.iter().map(|p| (*p, Vec::new())).collect();
    for project in projects.iter() {
        if let Some((_, group)) = groups.iter_mut().find(|(p, _)| *p == project.priority) {
            group.push(Arc::clone(project));
        }
    }
    groups
}

/// The most recently updated projects, newest first.
pub fn recent_projects(projects: &EntityState<Project>) -> Vec<Arc<Project>> {
    let mut recent = projects.all();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    recent.truncate(RECENT_LIMIT);
    recent
}

/// Per-status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub archived: usize,
    pub completed: usize,
    pub on_hold: usize,
}

impl StatusCounts {
    pub fn tally<'a>(projects: impl Iterator<Item = &'a Arc<Project>>) -> Self {
        projects.fold(Self::default(), |mut counts, project| {
            counts.total += 1;
            match project.status {
                ProjectStatus::Active => counts.active += 1,
                ProjectStatus::Archived => counts.archived += 1,
                ProjectStatus::Completed => counts.completed += 1,
                ProjectStatus::OnHold => counts.on_hold += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectStatistics {
    pub total: usize,
    pub active: usize,
    pub archived: usize,
    pub completed: usize,
    pub on_hold: usize,
    /// Completed share in percent, 0 when there are no projects.
    pub completion_rate: f64,
    /// Mean of `progress`, 0 when there are no projects.
    pub average_progress: f64,
}

impl ProjectStatistics {
    pub fn compute(projects: &EntityState<Project>) -> Self {
        let counts = StatusCounts::tally(projects.iter());
        let (completion_rate, average_progress) = if counts.total == 0 {
            (0.0, 0.0)
        } else {
            let total = counts.total as f64;
            let progress: u64 = projects.iter().map(|p| u64::from(p.progress)).sum();
            (
                counts.completed as f64 * 100.0 / total,
                progress as f64 / total,
            )
        };
        Self {
            total: counts.total,
            active: counts.active,
            archived: counts.archived,
            completed: counts.completed,
            on_hold: counts.on_hold,
            completion_rate,
            average_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn project(id: &str, status: ProjectStatus) -> Project {
        let mut p = Project::new(format!("Project {id}"), "owner-1");
        p.id = id.to_string();
        p.status = status;
        p
    }

    fn state(projects: Vec<Project>) -> EntityState<Project> {
        EntityState::new().set_all(projects)
    }

    #[test]
    fn test_statistics_scenario() {
        let projects = state(vec![
            project("a", ProjectStatus::Active),
            project("b", ProjectStatus::Active),
            project("c", ProjectStatus::Active),
            project("d", ProjectStatus::Completed),
            project("e", ProjectStatus::OnHold),
        ]);
        let stats = ProjectStatistics::compute(&projects);
        assert_eq!(stats.completion_rate, 20.0);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.on_hold, 1);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = ProjectStatistics::compute(&EntityState::new());
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.average_progress, 0.0);
    }

    #[test]
    fn test_average_progress() {
        let mut a = project("a", ProjectStatus::Active);
        a.progress = 40;
        let mut b = project("b", ProjectStatus::Active);
        b.progress = 90;
        assert_eq!(ProjectStatistics::compute(&state(vec![a, b])).average_progress, 65.0);
    }

    #[test]
    fn test_search_hits_tags() {
        let mut tagged = project("a", ProjectStatus::Active);
        tagged.tags = vec!["Backend".into()];
        let mut described = project("b", ProjectStatus::Archived);
        described.description = Some("backend rewrite".into());
        let projects = state(vec![tagged, described, project("c", ProjectStatus::Active)]);

        let hits = filter_projects(&projects, &FilterValue::All, "BACKEND");
        assert_eq!(hits.len(), 2);
        let hits = filter_projects(&projects, &FilterValue::Only(ProjectStatus::Active), "backend");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[test]
    fn test_group_by_status_has_every_key() {
        let projects = state(vec![project("a", ProjectStatus::Completed)]);
        let groups = group_by_status(projects.iter());
        assert_eq!(groups.len(), ProjectStatus::ALL.len());
        let completed = groups.iter().find(|(s, _)| *s == ProjectStatus::Completed).unwrap();
        assert_eq!(completed.1.len(), 1);
    }

    #[test]
    fn test_recent_keeps_five_newest() {
        let base = Utc::now();
        let projects = state(
            (0..7)
                .map(|i| {
                    let mut p = project(&format!("p{i}"), ProjectStatus::Active);
                    p.updated_at = base + Duration::minutes(i);
                    p
                })
                .collect(),
        );
        let recent = recent_projects(&projects);
        assert_eq!(recent.len(), RECENT_LIMIT);
        assert_eq!(recent[0].id, "p6");
        assert_eq!(recent[4].id, "p2");
    }
}
