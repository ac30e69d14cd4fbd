//! # Effect Pipeline Over REST
//!
//! Commands dispatched into the store travel through the effect handlers,
//! `RestBackend`, `ApiClient` and the full middleware chain to a scripted
//! server, and their follow-up commands land back in the store.

#[cfg(test)]
mod tests {
    use crate::fixtures::{api_client, project, task, RestRig, ScriptedServer};
    use http::header::AUTHORIZATION;
    use http::Method;
    use serde_json::Value;
    use shared_types::{
        AuthResponse, LoginRequest, PaginatedResponse, ProjectStatus, TaskStatus, User,
    };
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tf_02_request_middleware::{NoAuthToken, NotificationLevel, RecordingNotifier};
    use tf_03_state::{AuthCommand, Command, ProjectListCommand, ProjectListState, TasksCommand};
    use tf_04_derived_views::Views;
    use tf_05_effects::{EffectFamily, EffectPhase, ProjectsApi, RestBackend};

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_invisible_to_the_store() {
        let server = ScriptedServer::new();
        server.fail(Method::GET, "/tasks", 503, 1).respond(
            Method::GET,
            "/tasks",
            vec![task("a", TaskStatus::Todo, 0), task("b", TaskStatus::Done, 0)],
        );
        let rig = RestRig::start(server);

        rig.store.dispatch(TasksCommand::Load);
        rig.settle().await;

        let state = rig.store.state();
        assert_eq!(state.tasks.entities.len(), 2);
        assert!(state.tasks.error.is_none());
        assert!(!state.tasks.loading);
        assert_eq!(rig.server.requests_to(Method::GET, "/tasks").len(), 2);
        assert!(rig.notifier.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_become_failure_command() {
        let server = ScriptedServer::new();
        server.fail(Method::GET, "/tasks", 500, 1);
        let rig = RestRig::start(server);

        rig.store.dispatch(TasksCommand::Load);
        rig.settle().await;

        let state = rig.store.state();
        assert_eq!(
            state.tasks.error.as_deref(),
            Some("Internal server error. Please try again later.")
        );
        assert!(!state.tasks.loading);
        assert_eq!(rig.server.requests_to(Method::GET, "/tasks").len(), 4);
        assert_eq!(rig.notifier.count(NotificationLevel::Error), 1);

        let family = EffectFamily::of(&Command::from(TasksCommand::Load));
        assert_eq!(rig.runtime.phases().phase(family), EffectPhase::Idle);
        assert_eq!(rig.runtime.phases().last_outcome(family), Some(EffectPhase::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_token_carried_by_later_requests() {
        let server = ScriptedServer::new();
        server
            .respond(
                Method::POST,
                "/auth/login",
                AuthResponse {
                    user: User::new("ada@example.com", "Ada"),
                    token: "session-token".into(),
                    refresh_token: Some("refresh-1".into()),
                },
            )
            .respond(Method::GET, "/tasks", vec![task("a", TaskStatus::Todo, 0)]);
        let rig = RestRig::start(server);

        rig.store.dispatch(AuthCommand::Login(LoginRequest {
            email: "ada@example.com".into(),
            password: "pw".into(),
        }));
        rig.settle().await;
        assert!(rig.store.select(|s| s.auth.is_authenticated));

        rig.store.dispatch(TasksCommand::Load);
        rig.settle().await;

        let login = &rig.server.requests_to(Method::POST, "/auth/login")[0];
        assert!(login.headers.get(AUTHORIZATION).is_none());
        let load = &rig.server.requests_to(Method::GET, "/tasks")[0];
        assert_eq!(load.headers[AUTHORIZATION], "Bearer session-token");
        assert_eq!(rig.notifier.count(NotificationLevel::Success), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kanban_reorder_round_trip() {
        let server = ScriptedServer::new();
        server.respond(
            Method::POST,
            "/tasks/reorder",
            vec![
                task("b", TaskStatus::Todo, 0),
                task("c", TaskStatus::Todo, 1),
                task("a", TaskStatus::Todo, 2),
            ],
        );
        let rig = RestRig::start(server);
        rig.store.dispatch(TasksCommand::LoadSuccess(vec![
            task("a", TaskStatus::Todo, 0),
            task("b", TaskStatus::Todo, 1),
            task("c", TaskStatus::Todo, 2),
            task("d", TaskStatus::Done, 0),
        ]));

        rig.store.dispatch(TasksCommand::ReorderColumn {
            status: TaskStatus::Todo,
            from: 0,
            to: 2,
        });
        rig.settle().await;

        let sent = rig.server.requests_to(Method::POST, "/tasks/reorder");
        let body = sent[0].body.clone().unwrap_or(Value::Null);
        let orders: HashMap<String, u64> = body["tasks"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| Some((item["id"].as_str()?.to_string(), item["order"].as_u64()?)))
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(orders.len(), 3);
        assert_eq!(orders["b"], 0);
        assert_eq!(orders["c"], 1);
        assert_eq!(orders["a"], 2);

        let board = Views::new().kanban(&rig.store.state());
        let todo: Vec<&str> = board
            .columns
            .iter()
            .find(|(status, _)| *status == TaskStatus::Todo)
            .map(|(_, cards)| cards.iter().map(|t| t.id.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(todo, vec!["b", "c", "a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_typing_refetches_once() {
        let server = ScriptedServer::new();
        server.respond_raw(
            Method::GET,
            "/projects",
            PaginatedResponse::new(vec![project("alpha", ProjectStatus::Active)], 1, 12, 1),
        );
        let rig = RestRig::start(server);

        for term in ["al", "alp", "alpha"] {
            rig.store
                .dispatch(ProjectListCommand::UpdateSearchTerm(term.to_string()));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;
        rig.settle().await;

        let loads = rig.server.requests_to(Method::GET, "/projects");
        assert_eq!(loads.len(), 1);
        let query = loads[0].query.clone().unwrap_or_default();
        assert!(query.contains("search=alpha"));
        assert!(query.contains("page=1"));

        let state = rig.store.state();
        assert_eq!(state.project_list.entities.len(), 1);
        assert!(!state.project_list.pagination.has_more);
    }

    #[tokio::test(start_paused = true)]
    async fn test_project_lookups_over_rest() {
        let server = ScriptedServer::new();
        server
            .respond(Method::GET, "/projects/search", vec![project("alpha", ProjectStatus::Active)])
            .respond_text(Method::GET, "/projects/export/csv", "id,name\nalpha,Alpha\n");
        let client = api_client(&server, Arc::new(RecordingNotifier::new()), Arc::new(NoAuthToken));
        let backend = RestBackend::new(client);

        let hits = backend.search("web app").await.unwrap();
        assert_eq!(hits[0].id, "alpha");

        let query = ProjectListState::default().query(3);
        let csv = backend.export_csv(&query).await.unwrap();
        assert_eq!(csv, "id,name\nalpha,Alpha\n");

        let search = &server.requests_to(Method::GET, "/projects/search")[0];
        assert_eq!(search.query.as_deref(), Some("query=web+app"));
        let export = &server.requests_to(Method::GET, "/projects/export/csv")[0];
        let export_query = export.query.clone().unwrap_or_default();
        assert!(export_query.contains("sortBy="));
        assert!(!export_query.contains("page="));
        assert!(!export_query.contains("limit="));
    }
}
