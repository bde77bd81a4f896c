use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::decode::{DecodedEvent, Pair, Player};

/// One dimension of a filter: either every value, or an explicit allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allowed<T: Ord> {
    Any,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Allowed<T> {
    fn default() -> Self {
        Allowed::Any
    }
}

impl<T: Ord> Allowed<T> {
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Allowed::Only(values.into_iter().collect())
    }

    pub fn contains(&self, value: &T) -> bool {
        match self {
            Allowed::Any => true,
            Allowed::Only(values) => values.contains(value),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Allowed::Any)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub sets: Allowed<u32>,
    pub games: Allowed<u32>,
    pub servers: Allowed<Player>,
    pub invert_result: bool,
}

impl FilterSpec {
    pub fn keeps(&self, event: &DecodedEvent) -> bool {
        self.sets.contains(&event.set)
            && self.games.contains(&event.game)
            && self.servers.contains(&event.server)
    }

    /// Side whose wins count as `result == true` after filtering.
    pub fn perspective(&self) -> Pair {
        if self.invert_result {
            Pair::FredrikOlle
        } else {
            Pair::AntonSimon
        }
    }
}

/// Returns the kept events in their original order, with results negated when
/// the spec asks for the opposing pair's view. `events` is left untouched.
pub fn filter_events(events: &[DecodedEvent], spec: &FilterSpec) -> Vec<DecodedEvent> {
    events
        .iter()
        .filter(|event| spec.keeps(event))
        .map(|event| {
            if spec.invert_result {
                event.inverted()
            } else {
                event.clone()
            }
        })
        .collect()
}
