//! The memory-model interface and the closed set of selectable models.

use std::fmt;

use symex_mm_smtlib::term::Term;

use crate::constraint::ConstraintSet;
use crate::error::EncodeError;
use crate::event::{Event, EventId, EventKind};
use crate::partial_order::PartialOrder;
use crate::sc::SequentialConsistency;

/// A concurrency memory model that turns a trace into ordering and value
/// constraints.
///
/// Implementations only describe how to constrain an already validated
/// partial order; [`MemoryModel::apply`] takes care of building it.
pub trait MemoryModel {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this model can constrain events of `kind`.
    ///
    /// Only consulted for correctness-sensitive kinds; markers are skipped
    /// regardless.
    fn supports(&self, kind: EventKind) -> bool {
        let _ = kind;
        true
    }

    /// Ordering of two events as a formula: a literal when the partial
    /// order decides it, a solver-decided comparison otherwise.
    fn before(&self, po: &PartialOrder<'_>, first: EventId, second: EventId) -> Term;

    /// Whether the solver may reorder two events of the same thread.
    fn program_order_is_relaxed(&self, po: &PartialOrder<'_>, first: EventId, second: EventId)
    -> bool;

    /// Emit every constraint of the model for a validated partial order.
    fn encode(&self, po: &PartialOrder<'_>) -> ConstraintSet;

    /// Validate `trace` and encode it.
    fn apply(&self, trace: &[Event]) -> Result<ConstraintSet, EncodeError> {
        let po = PartialOrder::build(trace)?;
        if let Some((event, e)) = trace
            .iter()
            .enumerate()
            .find(|(_, e)| e.kind.is_correctness_sensitive() && !self.supports(e.kind))
        {
            return Err(EncodeError::UnsupportedEvent {
                event,
                kind: e.kind,
                model: self.name(),
            });
        }
        Ok(self.encode(&po))
    }
}

/// Memory models that can be selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryModelKind {
    /// Sequential consistency.
    #[default]
    SequentialConsistency,
}

impl MemoryModelKind {
    pub const ALL: [MemoryModelKind; 1] = [MemoryModelKind::SequentialConsistency];

    /// Instantiate the model.
    pub fn model(self) -> Box<dyn MemoryModel> {
        match self {
            MemoryModelKind::SequentialConsistency => Box::new(SequentialConsistency),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MemoryModelKind::SequentialConsistency => "sc",
        }
    }
}

impl fmt::Display for MemoryModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for MemoryModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sc" | "sequential-consistency" => Ok(MemoryModelKind::SequentialConsistency),
            _ => Err(format!("Unknown memory model: {s}. Valid options: sc")),
        }
    }
}
