//! Per-family effect phase.
//!
//! ```text
//!   Idle ──trigger──→ Pending ──┬──→ Succeeded ──→ Idle
//!                               └──→ Failed    ──→ Idle
//! ```
//!
//! Families can overlap (two loads in flight), so a family only returns to
//! `Idle` once its last in-flight call resolves. The outcome of the most
//! recent resolution stays readable through [`PhaseTracker::last_outcome`].

use dashmap::DashMap;
use shared_bus::BusMessage;
use shared_types::Domain;
use std::fmt;
use tf_03_state::Command;

/// An effect family: the triggering command kind within its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectFamily {
    pub domain: Domain,
    pub name: &'static str,
}

impl EffectFamily {
    pub const fn new(domain: Domain, name: &'static str) -> Self {
        Self { domain, name }
    }

    /// Family triggered by `command`.
    pub fn of(command: &Command) -> Self {
        Self::new(command.topic(), command.name())
    }
}

impl fmt::Display for EffectFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.domain, self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EffectPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Default)]
struct FamilyStatus {
    in_flight: u32,
    last_outcome: Option<EffectPhase>,
    completed: u64,
}

/// Observable phase of every effect family.
#[derive(Debug, Default)]
pub struct PhaseTracker {
    families: DashMap<EffectFamily, FamilyStatus>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin(&self, family: EffectFamily) {
        self.families.entry(family).or_default().in_flight += 1;
    }

    pub(crate) fn finish(&self, family: EffectFamily, succeeded: bool) {
        let mut status = self.families.entry(family).or_default();
        status.in_flight = status.in_flight.saturating_sub(1);
        status.completed += 1;
        status.last_outcome = Some(if succeeded {
            EffectPhase::Succeeded
        } else {
            EffectPhase::Failed
        });
    }

    /// Resolution that produced no follow-up (superseded response).
    pub(crate) fn abandon(&self, family: EffectFamily) {
        if let Some(mut status) = self.families.get_mut(&family) {
            status.in_flight = status.in_flight.saturating_sub(1);
        }
    }

    /// `Pending` while any call of the family is in flight, `Idle` otherwise.
    pub fn phase(&self, family: EffectFamily) -> EffectPhase {
        match self.families.get(&family) {
            Some(status) if status.in_flight > 0 => EffectPhase::Pending,
            _ => EffectPhase::Idle,
        }
    }

    /// `Succeeded` or `Failed` for the most recent resolution.
    pub fn last_outcome(&self, family: EffectFamily) -> Option<EffectPhase> {
        self.families.get(&family).and_then(|s| s.last_outcome)
    }

    /// Resolutions that emitted a follow-up.
    pub fn completed(&self, family: EffectFamily) -> u64 {
        self.families.get(&family).map_or(0, |s| s.completed)
    }

    /// Whether no family has a call in flight.
    pub fn is_quiet(&self) -> bool {
        self.families.iter().all(|entry| entry.in_flight == 0)
    }
}
