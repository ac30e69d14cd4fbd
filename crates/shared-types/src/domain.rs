//! # Domain Topics
//!
//! Each slice of the client store is owned by one domain. Commands on the
//! bus are routed by the domain they belong to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slice owner, used as the bus topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Auth,
    Projects,
    ProjectList,
    Tasks,
    TimeTracking,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Auth,
        Domain::Projects,
        Domain::ProjectList,
        Domain::Tasks,
        Domain::TimeTracking,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Auth => "auth",
            Domain::Projects => "projects",
            Domain::ProjectList => "project-list",
            Domain::Tasks => "tasks",
            Domain::TimeTracking => "time-tracking",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
