//! # Request Middleware Chain End to End
//!
//! `ApiClient` over the full default chain, with a scripted server as the
//! transport. Covers the retry boundary, input sanitization and the headers
//! every request leaves with.

#[cfg(test)]
mod tests {
    use crate::fixtures::{api_client, project, FixedToken, ScriptedServer, CSRF_TOKEN};
    use http::header::AUTHORIZATION;
    use http::Method;
    use serde_json::{json, Value};
    use shared_types::{CreateProjectRequest, Project, ProjectStatus};
    use std::sync::Arc;
    use std::time::Duration;
    use tf_02_request_middleware::middleware::security_headers::SECURITY_HEADERS;
    use tf_02_request_middleware::{
        sanitize_input, ApiClient, NoAuthToken, NotificationLevel, RecordingNotifier,
    };

    fn client(server: &ScriptedServer) -> (Arc<RecordingNotifier>, Arc<ApiClient>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let client = api_client(server, Arc::clone(&notifier), Arc::new(NoAuthToken));
        (notifier, client)
    }

    fn millis(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|ms| Duration::from_millis(*ms)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_retried_three_times_with_backoff() {
        let server = ScriptedServer::new();
        server.fail(Method::GET, "/projects/p1", 500, 1);
        let (notifier, client) = client(&server);

        let result: Result<Project, _> = client.get("/projects/p1", &[]).await;
        let error = result.unwrap_err();
        assert_eq!(error.status, 500);
        assert_eq!(error.message, "Internal server error. Please try again later.");

        assert_eq!(server.requests_to(Method::GET, "/projects/p1").len(), 4);
        assert_eq!(server.gaps(Method::GET, "/projects/p1"), millis(&[1_000, 2_000, 4_000]));
        assert_eq!(notifier.count(NotificationLevel::Error), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let server = ScriptedServer::new();
        let (notifier, client) = client(&server);

        let result: Result<Project, _> = client.get("/projects/missing", &[]).await;
        assert_eq!(result.unwrap_err().status, 404);
        assert_eq!(server.requests().len(), 1);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retried_until_success() {
        let server = ScriptedServer::new();
        server
            .fail(Method::GET, "/projects", 429, 2)
            .respond(Method::GET, "/projects", Vec::<Project>::new());
        let (notifier, client) = client(&server);

        let projects: Vec<Project> = client.get("/projects", &[]).await.unwrap();
        assert!(projects.is_empty());
        assert_eq!(server.gaps(Method::GET, "/projects"), millis(&[1_000, 2_000]));
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_body_is_sanitized_before_sending() {
        assert_eq!(sanitize_input("<script>alert(1)</script>"), "scriptalert(1)/script");

        let server = ScriptedServer::new();
        server.respond(Method::POST, "/projects", project("p1", ProjectStatus::Active));
        let (_, client) = client(&server);

        let request = CreateProjectRequest {
            name: "<script>alert(1)</script>".into(),
            description: Some("  click javascript:void(0) onclick=run  ".into()),
            tags: vec!["\"quoted\"".into()],
            ..Default::default()
        };
        let _: Project = client.post("/projects", &request).await.unwrap();

        let sent = server.requests_to(Method::POST, "/projects");
        let body = sent[0].body.clone().unwrap_or(Value::Null);
        assert_eq!(body["name"], json!("scriptalert(1)/script"));
        assert_eq!(body["description"], json!("click void(0) run"));
        assert_eq!(body["tags"], json!(["quoted"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_outgoing_headers() {
        let server = ScriptedServer::new();
        server
            .respond(Method::GET, "/projects", Vec::<Project>::new())
            .respond(Method::DELETE, "/projects/p1", Value::Null);
        let notifier = Arc::new(RecordingNotifier::new());
        let client = api_client(&server, notifier, Arc::new(FixedToken("abc.def.ghi")));

        let _: Vec<Project> = client.get("/projects", &[]).await.unwrap();
        let _: Option<Value> = client.delete("/projects/p1").await.unwrap();

        let requests = server.requests();
        for request in &requests {
            assert_eq!(request.headers[AUTHORIZATION], "Bearer abc.def.ghi");
            for (name, value) in SECURITY_HEADERS {
                assert_eq!(request.headers[name], value);
            }
        }
        assert!(requests[0].headers.get("x-csrf-token").is_none());
        assert_eq!(requests[1].headers["x-csrf-token"], CSRF_TOKEN);
    }
}
