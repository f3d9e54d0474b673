//! Diagnostics about one encoding run, serialisable for downstream tools.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constraint::{ConstraintKind, ConstraintSet};
use crate::event::{Event, EventId, EventKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingSummary {
    pub model: String,
    pub events: usize,
    pub events_by_kind: BTreeMap<EventKind, usize>,
    pub threads: usize,
    pub atomic_sections: usize,
    pub declarations: usize,
    pub constraints: usize,
    pub constraints_by_kind: BTreeMap<ConstraintKind, usize>,
    /// Reads no write can reach; their values are unconstrained.
    pub unconstrained_reads: Vec<EventId>,
}

impl EncodingSummary {
    pub fn new(model: &str, trace: &[Event], set: &ConstraintSet) -> Self {
        let mut events_by_kind = BTreeMap::new();
        for e in trace {
            *events_by_kind.entry(e.kind).or_insert(0) += 1;
        }
        let threads = 1 + events_by_kind.get(&EventKind::Spawn).copied().unwrap_or(0);
        let atomic_sections = events_by_kind.get(&EventKind::AtomicBegin).copied().unwrap_or(0);
        Self {
            model: model.to_string(),
            events: trace.len(),
            events_by_kind,
            threads,
            atomic_sections,
            declarations: set.declarations().len(),
            constraints: set.len(),
            constraints_by_kind: set.counts(),
            unconstrained_reads: set.unconstrained_reads().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
