//! Pure projection functions. Nothing here caches; see [`crate::selectors`]
//! for the memoized surface.

pub mod dashboard;
pub mod project_list;
pub mod projects;
pub mod tasks;
pub mod time_tracking;

use shared_types::SortDirection;
use std::cmp::Ordering;

/// Apply a sort direction to an ascending comparison.
pub(crate) fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
