//! # TaskFlow Client Runtime
//!
//! Headless driver for the client layer: restores or opens a session, loads
//! the workspace and logs a dashboard summary, then keeps the effect
//! pipeline running until Ctrl+C.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `TASKFLOW_CONFIG` file, `TASKFLOW_*` env)
//! 2. Install logging
//! 3. Wire store, middleware chain and effect handlers
//! 4. Sign in with `TASKFLOW_EMAIL` / `TASKFLOW_PASSWORD` if no session was restored
//! 5. Load projects, the first project-list page, tasks and time entries

use anyhow::{Context, Result};
use chrono::Utc;
use client_runtime::{logging, ClientConfig, ClientContainer};
use shared_types::LoginRequest;
use std::time::Duration;
use tf_03_state::{AuthCommand, ProjectListCommand, ProjectsCommand, TasksCommand, TimeTrackingCommand};
use tracing::{info, warn};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

async fn sign_in(client: &ClientContainer) -> bool {
    if client.is_signed_in() {
        return true;
    }
    let credentials = (std::env::var("TASKFLOW_EMAIL"), std::env::var("TASKFLOW_PASSWORD"));
    let (Ok(email), Ok(password)) = credentials else {
        info!("no stored session and no credentials, staying signed out");
        return false;
    };

    client.store().dispatch(AuthCommand::Login(LoginRequest { email, password }));
    if !client.settle(SETTLE_TIMEOUT).await {
        warn!("login still pending after {:?}", SETTLE_TIMEOUT);
    }
    let signed_in = client.is_signed_in();
    if !signed_in {
        let error = client.store().select(|state| state.auth.error.clone());
        warn!(error = ?error, "login failed");
    }
    signed_in
}

async fn load_workspace(client: &ClientContainer) {
    let store = client.store();
    store.dispatch(ProjectsCommand::Load);
    let first_page = store.select(|state| state.project_list.query(1));
    store.dispatch(ProjectListCommand::Load {
        query: first_page,
        append: false,
    });
    store.dispatch(TasksCommand::Load);
    store.dispatch(TimeTrackingCommand::Load { task_id: None });

    if !client.settle(SETTLE_TIMEOUT).await {
        warn!("workspace load still pending after {:?}", SETTLE_TIMEOUT);
    }

    let summary = client.dashboard(Utc::now());
    info!(
        projects = summary.projects.total,
        completion_rate = summary.projects.completion_rate,
        tasks = summary.tasks.total,
        tasks_done = summary.tasks.done,
        minutes_today = summary.time.today,
        minutes_this_week = summary.time.this_week,
        "workspace loaded"
    );
    for load in &summary.busiest_projects {
        info!("busy project: {:?}", load);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::load().context("failed to load configuration")?;
    logging::init(&config.log_level, config.log_json)?;

    info!("===========================================");
    info!("  TaskFlow Client Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let client = ClientContainer::start(config)?;
    if sign_in(&client).await {
        load_workspace(&client).await;
    }

    info!("Client is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    client.shutdown().await;
    Ok(())
}
