//! # Project List Effects
//!
//! Besides the request commands, this handler owns two timers:
//!
//! ```text
//! filter / sort / search ──► debounce (300ms) ──► query(page 1) ──► changed? ──► Load
//!                              ▲ restarts on every change              │ no
//!                              └───────────────────────────────────────┴──► skip
//!
//! LoadSuccess(page 1, has_more) ──► wait (1000ms) ──► PrefetchNextPage
//! ```
//!
//! Both timers live in the receive loop, so scheduling never races the
//! commands that move them. API calls run in tasks of their own.

use super::{EffectContext, EffectHandler};
use crate::domain::EffectFamily;
use crate::ports::ProjectsApi;
use async_trait::async_trait;
use shared_bus::{CommandFilter, Subscription};
use shared_types::{Domain, ProjectQuery};
use std::sync::Arc;
use tf_03_state::{Command, ProjectListCommand, ProjectPage};
use tokio::time::Instant;
use tracing::{debug, info};

const LOAD: EffectFamily = EffectFamily::new(Domain::ProjectList, "load");

/// Sleep until `deadline`, or forever when there is none.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Pending timers of the receive loop.
#[derive(Debug, Default)]
struct Schedule {
    refetch_at: Option<Instant>,
    prefetch_at: Option<Instant>,
    last_refetch: Option<ProjectQuery>,
}

pub struct ProjectListEffects {
    ctx: EffectContext,
    api: Arc<dyn ProjectsApi>,
}

impl ProjectListEffects {
    pub fn new(ctx: EffectContext, api: Arc<dyn ProjectsApi>) -> Self {
        Self { ctx, api }
    }

    pub async fn run(self: Arc<Self>, mut subscription: Subscription<Command>) {
        info!("[{}] effect handler started", self.name());
        let mut schedule = Schedule::default();

        loop {
            tokio::select! {
                received = subscription.recv() => {
                    let Some(command) = received else { break };
                    self.observe(&command, &mut schedule);
                    let handler = Arc::clone(&self);
                    tokio::spawn(async move { handler.handle(command).await });
                }
                () = wait_until(schedule.refetch_at) => {
                    schedule.refetch_at = None;
                    self.refetch(&mut schedule);
                }
                () = wait_until(schedule.prefetch_at) => {
                    schedule.prefetch_at = None;
                    debug!("prefetching next page");
                    self.ctx.store().dispatch(ProjectListCommand::PrefetchNextPage);
                }
            }
        }

        info!("[{}] command bus closed, exiting", self.name());
    }

    /// Move the timers for `command`.
    fn observe(&self, command: &Command, schedule: &mut Schedule) {
        let Command::ProjectList(list_command) = command else {
            return;
        };
        if list_command.changes_result_set() {
            schedule.refetch_at = Some(Instant::now() + self.ctx.config().refetch_debounce());
            return;
        }
        if let ProjectListCommand::LoadSuccess { page, append: false } = list_command {
            if page.page == 1 && page.has_more {
                schedule.prefetch_at = Some(Instant::now() + self.ctx.config().prefetch_delay());
            }
        }
    }

    /// Reload page 1 unless the request shape is unchanged since the last
    /// refetch.
    fn refetch(&self, schedule: &mut Schedule) {
        let query = self
            .ctx
            .store()
            .select(|state| state.project_list.query(1));
        if schedule.last_refetch.as_ref() == Some(&query) {
            debug!("refetch skipped, query unchanged");
            return;
        }
        schedule.last_refetch = Some(query.clone());
        debug!(search = ?query.search, status = ?query.status, "filters settled, reloading");
        self.ctx.store().dispatch(ProjectListCommand::Load {
            query,
            append: false,
        });
    }

    /// Query for the page after the current one, if there is one.
    fn next_page_query(&self) -> Option<ProjectQuery> {
        self.ctx.store().select(|state| {
            let list = &state.project_list;
            list.pagination
                .has_more
                .then(|| list.query(list.pagination.page + 1))
        })
    }

    async fn load(&self, command: &Command, query: &ProjectQuery, append: bool) {
        let (family, ticket) = self.ctx.begin_superseding(command, LOAD);
        let result = self.api.page(query).await.map(ProjectPage::from);
        self.ctx.settle_latest(
            family,
            ticket,
            result,
            "Failed to load projects",
            |page| ProjectListCommand::LoadSuccess { page, append },
            ProjectListCommand::LoadFailure,
        );
    }
}

#[async_trait]
impl EffectHandler for ProjectListEffects {
    fn name(&self) -> &'static str {
        "project-list"
    }

    fn filter(&self) -> CommandFilter {
        CommandFilter {
            topics: vec![Domain::ProjectList],
            names: vec![
                "load",
                "load-success",
                "load-next-page",
                "prefetch-next-page",
                "update-filters",
                "reset-filters",
                "update-sort",
                "reset-sort",
                "update-search-term",
                "update-status-filter",
                "update-date-range",
                "create",
                "update",
                "delete",
                "archive",
                "duplicate",
            ],
        }
    }

    async fn handle(&self, command: Command) {
        let Command::ProjectList(list_command) = &command else {
            return;
        };
        match list_command {
            ProjectListCommand::Load { query, append } => self.load(&command, query, *append).await,
            ProjectListCommand::LoadNextPage => {
                let Some(query) = self.next_page_query() else {
                    debug!("no more pages");
                    return;
                };
                let (family, ticket) = self.ctx.begin_following(&command, LOAD);
                let result = self.api.page(&query).await.map(ProjectPage::from);
                self.ctx.settle_latest(
                    family,
                    ticket,
                    result,
                    "Failed to load projects",
                    ProjectListCommand::LoadNextPageSuccess,
                    ProjectListCommand::LoadNextPageFailure,
                );
            }
            ProjectListCommand::PrefetchNextPage => {
                let Some(query) = self.next_page_query() else {
                    return;
                };
                let (family, ticket) = self.ctx.begin_following(&command, LOAD);
                let result = self.api.page(&query).await.map(ProjectPage::from);
                self.ctx.settle_latest(
                    family,
                    ticket,
                    result,
                    "Failed to prefetch projects",
                    ProjectListCommand::PrefetchNextPageSuccess,
                    ProjectListCommand::PrefetchNextPageFailure,
                );
            }
            ProjectListCommand::Create(request) => {
                let family = self.ctx.begin(&command);
                let result = self.api.create(request).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to create project",
                    ProjectListCommand::CreateSuccess,
                    ProjectListCommand::CreateFailure,
                );
            }
            ProjectListCommand::Update { id, changes } => {
                let family = self.ctx.begin(&command);
                let result = self.api.update(id, changes).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to update project",
                    ProjectListCommand::UpdateSuccess,
                    ProjectListCommand::UpdateFailure,
                );
            }
            ProjectListCommand::Delete(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.delete(id).await.map(|()| id.clone());
                self.ctx.settle(
                    family,
                    result,
                    "Failed to delete project",
                    ProjectListCommand::DeleteSuccess,
                    ProjectListCommand::DeleteFailure,
                );
            }
            ProjectListCommand::Archive(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.archive(id).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to archive project",
                    ProjectListCommand::ArchiveSuccess,
                    ProjectListCommand::ArchiveFailure,
                );
            }
            ProjectListCommand::Duplicate(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.duplicate(id).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to duplicate project",
                    ProjectListCommand::DuplicateSuccess,
                    ProjectListCommand::DuplicateFailure,
                );
            }
            _ => {}
        }
    }
}
