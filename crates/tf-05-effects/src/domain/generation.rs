//! Request generations for families whose newer requests supersede older
//! ones (reloads of the same list).

use super::config::StaleResponsePolicy;
use super::phase::EffectFamily;
use dashmap::DashMap;

/// Generation handed out when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub family: EffectFamily,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: DashMap<EffectFamily, u64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier one of the family.
    pub fn issue(&self, family: EffectFamily) -> Ticket {
        let mut latest = self.latest.entry(family).or_insert(0);
        *latest += 1;
        Ticket {
            family,
            generation: *latest,
        }
    }

    /// Ticket for a request that depends on the latest one of the family
    /// without superseding it. Any later [`issue`](Self::issue) makes it
    /// stale.
    pub fn follow(&self, family: EffectFamily) -> Ticket {
        let generation = self.latest.get(&family).map_or(0, |latest| *latest);
        Ticket { family, generation }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest
            .get(&ticket.family)
            .map_or(0, |latest| *latest)
            == ticket.generation
    }

    /// Whether the response for `ticket` should produce a follow-up.
    pub fn admits(&self, ticket: Ticket, policy: StaleResponsePolicy) -> bool {
        match policy {
            StaleResponsePolicy::ApplyAll => true,
            StaleResponsePolicy::DiscardSuperseded => self.is_current(ticket),
        }
    }
}
