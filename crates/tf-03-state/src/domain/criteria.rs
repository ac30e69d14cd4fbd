//! Filter and sort criteria carried by the slices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{ProjectSortField, SortDirection};

/// A filter predicate that is either inactive ("all") or pinned to a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue<T> {
    All,
    Only(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        FilterValue::All
    }
}

impl<T: PartialEq> FilterValue<T> {
    /// `All` matches everything.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Only(expected) => expected == value,
        }
    }

    /// Like `matches`, for optional attributes. An unset attribute only
    /// matches `All`.
    pub fn matches_opt(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (FilterValue::All, _) => true,
            (FilterValue::Only(expected), Some(actual)) => expected == actual,
            (FilterValue::Only(_), None) => false,
        }
    }
}

impl<T> FilterValue<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            FilterValue::All => None,
            FilterValue::Only(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for FilterValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::All, FilterValue::Only)
    }
}

/// Inclusive creation-date bounds. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// Sort order of project collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectSort {
    pub field: ProjectSortField,
    pub direction: SortDirection,
}

impl ProjectSort {
    pub fn new(field: ProjectSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Keys the task list can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskSortKey {
    #[default]
    Created,
    Updated,
    Priority,
    DueDate,
    Title,
}

impl TaskSortKey {
    /// Direction the key reads naturally in: newest, most urgent and
    /// earliest-due first, titles A to Z.
    pub fn natural_direction(self) -> SortDirection {
        match self {
            TaskSortKey::Created | TaskSortKey::Updated | TaskSortKey::Priority => {
                SortDirection::Desc
            }
            TaskSortKey::DueDate | TaskSortKey::Title => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskSort {
    pub key: TaskSortKey,
    pub direction: SortDirection,
}

impl TaskSort {
    /// Sort by `key` in its natural direction.
    pub fn by(key: TaskSortKey) -> Self {
        Self {
            key,
            direction: key.natural_direction(),
        }
    }
}

impl Default for TaskSort {
    fn default() -> Self {
        Self::by(TaskSortKey::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filter_all_matches_everything() {
        let filter: FilterValue<u8> = FilterValue::All;
        assert!(filter.matches(&1));
        assert!(filter.matches_opt(None));
    }

    #[test]
    fn test_filter_only() {
        let filter = FilterValue::Only("u1".to_string());
        assert!(filter.matches(&"u1".to_string()));
        assert!(!filter.matches(&"u2".to_string()));
        assert!(!filter.matches_opt(None));
    }

    #[test]
    fn test_date_range_inclusive() {
        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let range = DateRange::new(Some(day(10)), Some(day(20)));
        assert!(range.contains(day(10)));
        assert!(range.contains(day(20)));
        assert!(!range.contains(day(9)));
        assert!(!range.contains(day(21)));
        assert!(DateRange::default().contains(day(1)));
    }

    #[test]
    fn test_task_sort_natural_direction() {
        assert_eq!(TaskSort::by(TaskSortKey::DueDate).direction, SortDirection::Asc);
        assert_eq!(TaskSort::default().direction, SortDirection::Desc);
    }
}
