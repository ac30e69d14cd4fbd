//! # TF-04 Derived Views
//!
//! Read-only projections of [`AppState`](tf_03_state::AppState).
//!
//! ```text
//! Store ──watch──► ViewSubscription ──► collaborator
//!                        │
//!                    Views (memoized)
//!                        │
//!                  views::* (pure fns)
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | `views::tasks` | filter, sort, kanban columns, stats, by project / assignee, overdue |
//! | `views::projects` | filter + search, groupings, recent, statistics |
//! | `views::project_list` | pagination info, selection flags, filter labels, local filter + sort |
//! | `views::time_tracking` | by task / user, totals, calendar stats, running timer |
//! | `views::dashboard` | cross-slice summary |
//!
//! Views never mutate their inputs and are safe to call on every read.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod memo;
pub mod selectors;
pub mod views;
pub mod watch;

pub use memo::{Memo, MemoInput};
pub use selectors::Views;
pub use views::dashboard::{DashboardSummary, ProjectLoad};
pub use views::project_list::PaginationInfo;
pub use views::projects::{Grouped, ProjectStatistics, StatusCounts};
pub use views::tasks::{KanbanBoard, TaskStats};
pub use views::time_tracking::TimeStats;
pub use watch::ViewSubscription;
