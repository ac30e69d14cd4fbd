//! # TaskFlow Client State Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | tf-01 Entity Store | `upsert_one` into a loaded slice | < 10µs |
//! | tf-03 State | `Store::dispatch` of a follow-up command | < 50µs |
//! | tf-04 Derived Views | memo hit on unchanged input | < 1µs |
//! | tf-02 Middleware | `sanitize_value` on a form body | < 20µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use serde_json::json;
use shared_types::{Project, ProjectStatus, Task, TaskStatus};
use std::sync::Arc;
use tf_01_entity_store::EntityState;
use tf_02_request_middleware::sanitize_value;
use tf_03_state::{AppState, ProjectsCommand, Store, TasksCommand};
use tf_04_derived_views::Views;
use tf_05_effects::plan_reorder;

fn random_projects(count: usize) -> Vec<Project> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let mut p = Project::new(format!("Project {i}"), "owner-1");
            p.id = format!("p{i}");
            p.status = ProjectStatus::ALL[rng.gen_range(0..ProjectStatus::ALL.len())];
            p.progress = rng.gen_range(0..=100);
            p
        })
        .collect()
}

fn column(count: usize) -> Vec<Arc<Task>> {
    (0..count)
        .map(|i| {
            let mut t = Task::new(format!("Task {i}"), "p0", "owner-1");
            t.id = format!("t{i}");
            t.status = TaskStatus::Todo;
            t.order = i as u32;
            Arc::new(t)
        })
        .collect()
}

// ============================================================================
// tf-01: Entity Store
// ============================================================================

fn bench_entity_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("tf-01-entity-store");

    for size in [100, 1_000, 10_000] {
        let loaded = EntityState::new().set_all(random_projects(size));
        let mut changed = random_projects(1).remove(0);
        changed.id = format!("p{}", size / 2);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("upsert_existing", size), &size, |b, _| {
            b.iter(|| black_box(loaded.clone().upsert_one(changed.clone())))
        });
        group.bench_with_input(BenchmarkId::new("remove_one", size), &size, |b, _| {
            b.iter(|| black_box(loaded.clone().remove_one(&changed.id)))
        });
    }

    group.finish();
}

// ============================================================================
// tf-03: Store dispatch
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("tf-03-state");
    let store = Store::new(AppState::default());
    store.dispatch(ProjectsCommand::LoadSuccess(random_projects(1_000)));
    let mut updated = random_projects(1).remove(0);
    updated.id = "p500".into();

    group.bench_function("dispatch_update_success", |b| {
        b.iter(|| black_box(store.dispatch(ProjectsCommand::UpdateSuccess(updated.clone()))))
    });
    group.bench_function("dispatch_unrelated_slice", |b| {
        b.iter(|| black_box(store.dispatch(TasksCommand::ClearError)))
    });

    group.finish();
}

// ============================================================================
// tf-04: Derived views
// ============================================================================

fn bench_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("tf-04-derived-views");
    let store = Store::new(AppState::default());
    let state = store.dispatch(ProjectsCommand::LoadSuccess(random_projects(5_000)));

    let views = Views::new();
    views.project_statistics(&state);
    group.bench_function("statistics_memo_hit", |b| {
        b.iter(|| black_box(views.project_statistics(&state)))
    });

    group.bench_function("statistics_recompute", |b| {
        b.iter(|| {
            let fresh = Views::new();
            black_box(fresh.project_statistics(&state))
        })
    });

    group.bench_function("projects_by_status", |b| {
        b.iter(|| black_box(Views::new().projects_by_status(&state)))
    });

    group.finish();
}

// ============================================================================
// tf-02 / tf-05: request preparation
// ============================================================================

fn bench_request_preparation(c: &mut Criterion) {
    let mut group = c.benchmark_group("request-preparation");

    let body = json!({
        "name": "<script>alert(1)</script>",
        "description": "  javascript:void(0) onclick=run  ",
        "tags": ["\"a\"", "<b>", "c & d"],
        "budget": 1200.5,
    });
    group.bench_function("sanitize_form_body", |b| {
        b.iter(|| black_box(sanitize_value(body.clone())))
    });

    for size in [10, 100, 500] {
        let cards = column(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("plan_reorder", size), &size, |b, &size| {
            b.iter(|| black_box(plan_reorder(&cards, 0, size - 1)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_entity_store,
    bench_dispatch,
    bench_views,
    bench_request_preparation,
);
criterion_main!(benches);
