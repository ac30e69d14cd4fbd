//! Time-entry projections. Calendar boundaries are UTC; weeks start on
//! Sunday.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use shared_types::TimeEntry;
use std::sync::Arc;
use tf_01_entity_store::EntityState;
use tf_03_state::ActiveTimer;

pub fn entries_by_task(entries: &EntityState<TimeEntry>, task_id: &str) -> Vec<Arc<TimeEntry>> {
    entries
        .iter()
        .filter(|e| e.task_id == task_id)
        .cloned()
        .collect()
}

pub fn entries_by_user(entries: &EntityState<TimeEntry>, user_id: &str) -> Vec<Arc<TimeEntry>> {
    entries
        .iter()
        .filter(|e| e.user_id == user_id)
        .cloned()
        .collect()
}

/// Sum of durations in minutes.
pub fn total_minutes<'a>(entries: impl IntoIterator<Item = &'a Arc<TimeEntry>>) -> u64 {
    entries.into_iter().map(|e| u64::from(e.duration)).sum()
}

/// Minute totals by calendar window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeStats {
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
    pub entries: usize,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl TimeStats {
    /// Totals as seen on `today`. Windows are keyed on entry start time.
    pub fn compute(entries: &EntityState<TimeEntry>, today: NaiveDate) -> Self {
        let start_of_day = midnight(today);
        let start_of_week = midnight(
            today
                .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
                .unwrap_or(today),
        );
        let start_of_month = midnight(today.with_day(1).unwrap_or(today));

        entries.iter().fold(Self::default(), |mut stats, entry| {
            let minutes = u64::from(entry.duration);
            stats.total += minutes;
            stats.entries += 1;
            if entry.start_time >= start_of_day {
                stats.today += minutes;
            }
            if entry.start_time >= start_of_week {
                stats.this_week += minutes;
            }
            if entry.start_time >= start_of_month {
                stats.this_month += minutes;
            }
            stats
        })
    }
}

/// Minutes on the running timer at `now`, zero when none runs.
pub fn active_elapsed_minutes(timer: Option<&ActiveTimer>, now: DateTime<Utc>) -> u32 {
    timer.map_or(0, |t| t.elapsed_minutes(now))
}
