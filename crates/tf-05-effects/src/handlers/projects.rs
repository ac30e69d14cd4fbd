//! Project effects for the unpaginated projects slice.
//!
//! The three load variants share one generation family, so a newer load of
//! any kind supersedes an older one. Archive, unarchive and the single-field
//! changes are partial updates resolving through the update pair.

use super::{run_handler, EffectContext, EffectHandler};
use crate::domain::EffectFamily;
use crate::ports::{ProjectSelection, ProjectsApi};
use async_trait::async_trait;
use shared_bus::{CommandFilter, Subscription};
use shared_types::{Domain, EntityId, ProjectStatus, UpdateProjectRequest};
use std::sync::Arc;
use tf_03_state::{Command, ProjectsCommand};

const LOAD: EffectFamily = EffectFamily::new(Domain::Projects, "load");

pub struct ProjectEffects {
    ctx: EffectContext,
    api: Arc<dyn ProjectsApi>,
}

impl ProjectEffects {
    pub fn new(ctx: EffectContext, api: Arc<dyn ProjectsApi>) -> Self {
        Self { ctx, api }
    }

    pub async fn run(self: Arc<Self>, subscription: Subscription<Command>) {
        run_handler(self, subscription).await;
    }

    async fn load(&self, trigger: &Command, selection: ProjectSelection) {
        let (family, ticket) = self.ctx.begin_superseding(trigger, LOAD);
        let result = self.api.list(&selection).await;
        self.ctx.settle_latest(
            family,
            ticket,
            result,
            "Failed to load projects",
            ProjectsCommand::LoadSuccess,
            ProjectsCommand::LoadFailure,
        );
    }

    async fn update(&self, trigger: &Command, id: &EntityId, changes: UpdateProjectRequest) {
        let family = self.ctx.begin(trigger);
        let result = self.api.update(id, &changes).await;
        self.ctx.settle(
            family,
            result,
            "Failed to update project",
            ProjectsCommand::UpdateSuccess,
            ProjectsCommand::UpdateFailure,
        );
    }
}

#[async_trait]
impl EffectHandler for ProjectEffects {
    fn name(&self) -> &'static str {
        "projects"
    }

    fn filter(&self) -> CommandFilter {
        CommandFilter {
            topics: vec![Domain::Projects],
            names: vec![
                "load",
                "load-by-tags",
                "load-by-date-range",
                "load-by-id",
                "create",
                "update",
                "archive",
                "unarchive",
                "change-status",
                "change-priority",
                "delete",
                "duplicate",
            ],
        }
    }

    async fn handle(&self, command: Command) {
        let Command::Projects(project_command) = &command else {
            return;
        };
        match project_command {
            ProjectsCommand::Load => self.load(&command, ProjectSelection::default()).await,
            ProjectsCommand::LoadByTags(tags) => {
                let selection = ProjectSelection {
                    tags: tags.clone(),
                    ..Default::default()
                };
                self.load(&command, selection).await;
            }
            ProjectsCommand::LoadByDateRange(range) => {
                let selection = ProjectSelection {
                    tags: Vec::new(),
                    start_date: range.start,
                    end_date: range.end,
                };
                self.load(&command, selection).await;
            }
            ProjectsCommand::LoadById(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.get(id).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to load project",
                    ProjectsCommand::LoadByIdSuccess,
                    ProjectsCommand::LoadByIdFailure,
                );
            }
            ProjectsCommand::Create(request) => {
                let family = self.ctx.begin(&command);
                let result = self.api.create(request).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to create project",
                    ProjectsCommand::CreateSuccess,
                    ProjectsCommand::CreateFailure,
                );
            }
            ProjectsCommand::Update { id, changes } => {
                self.update(&command, id, changes.clone()).await;
            }
            ProjectsCommand::Archive(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.archive(id).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to archive project",
                    ProjectsCommand::UpdateSuccess,
                    ProjectsCommand::UpdateFailure,
                );
            }
            ProjectsCommand::Unarchive(id) => {
                let changes = UpdateProjectRequest {
                    status: Some(ProjectStatus::Active),
                    ..Default::default()
                };
                self.update(&command, id, changes).await;
            }
            ProjectsCommand::ChangeStatus { id, status } => {
                let changes = UpdateProjectRequest {
                    status: Some(*status),
                    ..Default::default()
                };
                self.update(&command, id, changes).await;
            }
            ProjectsCommand::ChangePriority { id, priority } => {
                let changes = UpdateProjectRequest {
                    priority: Some(*priority),
                    ..Default::default()
                };
                self.update(&command, id, changes).await;
            }
            ProjectsCommand::Delete(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.delete(id).await.map(|()| id.clone());
                self.ctx.settle(
                    family,
                    result,
                    "Failed to delete project",
                    ProjectsCommand::DeleteSuccess,
                    ProjectsCommand::DeleteFailure,
                );
            }
            ProjectsCommand::Duplicate(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.duplicate(id).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to duplicate project",
                    ProjectsCommand::DuplicateSuccess,
                    ProjectsCommand::DuplicateFailure,
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBackend;
    use crate::domain::{EffectPhase, EffectsConfig, StaleResponsePolicy};
    use crate::handlers::test_support::{drain, Harness};
    use shared_types::{Priority, Project};
    use std::time::Duration;

    fn project(id: &str, tags: &[&str]) -> Project {
        let mut p = Project::new(format!("Project {id}"), "u1");
        p.id = id.to_string();
        p.tags = tags.iter().map(|t| (*t).to_string()).collect();
        p
    }

    async fn run(h: &Harness, command: impl Into<Command>) {
        let command: Command = command.into();
        h.store.dispatch(command.clone());
        ProjectEffects::new(h.context.clone(), h.backend.clone())
            .handle(command)
            .await;
    }

    #[tokio::test]
    async fn test_load_by_tags() {
        let h = Harness::new(
            InMemoryBackend::new().with_projects([project("a", &["web"]), project("b", &["ops"])]),
        );
        run(&h, ProjectsCommand::LoadByTags(vec!["web".into()])).await;
        assert_eq!(h.store.state().projects.entities.ids(), &["a"]);
    }

    #[tokio::test]
    async fn test_archive_then_unarchive() {
        let h = Harness::new(InMemoryBackend::new().with_projects([project("a", &[])]));
        run(&h, ProjectsCommand::Load).await;

        run(&h, ProjectsCommand::Archive("a".into())).await;
        let status = |h: &Harness| h.store.state().projects.entities.get("a").map(|p| p.status);
        assert_eq!(status(&h), Some(ProjectStatus::Archived));

        run(&h, ProjectsCommand::Unarchive("a".into())).await;
        assert_eq!(status(&h), Some(ProjectStatus::Active));
        assert_eq!(h.backend.call_count("projects.archive"), 1);
        assert_eq!(h.backend.call_count("projects.update"), 1);
    }

    #[tokio::test]
    async fn test_change_priority_is_partial_update() {
        let h = Harness::new(InMemoryBackend::new().with_projects([project("a", &["keep"])]));
        run(&h, ProjectsCommand::Load).await;
        run(
            &h,
            ProjectsCommand::ChangePriority {
                id: "a".into(),
                priority: Priority::Urgent,
            },
        )
        .await;
        let updated = h.store.state().projects.entities.get("a").cloned().unwrap();
        assert_eq!(updated.priority, Priority::Urgent);
        assert_eq!(updated.tags, vec!["keep".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_unknown_becomes_failure() {
        let h = Harness::new(InMemoryBackend::new());
        let mut seen = h.recorder();
        run(&h, ProjectsCommand::Delete("ghost".into())).await;

        let follow_ups: Vec<Command> = drain(&mut seen).into_iter().skip(1).collect();
        assert_eq!(follow_ups.len(), 1);
        assert!(matches!(
            follow_ups[0],
            Command::Projects(ProjectsCommand::DeleteFailure(_))
        ));
        let family = EffectFamily::new(Domain::Projects, "delete");
        assert_eq!(h.context.phases().last_outcome(family), Some(EffectPhase::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_load_discarded() {
        let config = EffectsConfig {
            stale_response_policy: StaleResponsePolicy::DiscardSuperseded,
            ..Default::default()
        };
        let h = Harness::with_config(
            InMemoryBackend::new().with_projects([project("a", &["web"]), project("b", &["ops"])]),
            config,
        );
        h.backend.set_latency("projects.list", Duration::from_millis(100));
        let mut seen = h.recorder();

        let effects = Arc::new(ProjectEffects::new(h.context.clone(), h.backend.clone()));
        let slow: Command = ProjectsCommand::LoadByTags(vec!["web".into()]).into();
        let fast: Command = ProjectsCommand::LoadByTags(vec!["ops".into()]).into();
        h.store.dispatch(slow.clone());
        h.store.dispatch(fast.clone());
        let first = tokio::spawn({
            let effects = Arc::clone(&effects);
            async move { effects.handle(slow).await }
        });
        tokio::task::yield_now().await;
        let second = tokio::spawn(async move { effects.handle(fast).await });
        first.await.unwrap();
        second.await.unwrap();

        let successes = drain(&mut seen)
            .into_iter()
            .filter(|c| matches!(c, Command::Projects(ProjectsCommand::LoadSuccess(_))))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(h.store.state().projects.entities.ids(), &["b"]);
        let family = EffectFamily::new(Domain::Projects, "load-by-tags");
        assert_eq!(h.context.phases().phase(family), EffectPhase::Idle);
    }
}
