//! Sequential consistency.
//!
//! Every ordering-relevant event gets an integer clock `clk_e`; a solution
//! picks one interleaving by assigning clocks. Program order and spawn
//! order are hard clock constraints, so every static happens-before fact
//! also holds between the clocks, and `before` may answer with a literal
//! whenever the partial order decides a pair.

use symex_mm_smtlib::term::Term;

use crate::constraint::{ConstraintKind, ConstraintSet};
use crate::event::{Event, EventId};
use crate::memory_model::MemoryModel;
use crate::partial_order::{PartialOrder, Precedence};
use crate::read_from;
use crate::variables::{clock, clock_var, declare_int};
use crate::write_serialization::{self, Scope};

/// The sequentially consistent memory model.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialConsistency;

/// Events that carry a clock under SC. Barriers are no-ops here.
fn is_clocked(event: &Event) -> bool {
    event.is_ordering_relevant() && !event.is_memory_barrier()
}

impl SequentialConsistency {
    /// Program order, spawn order and atomic-section constraints, plus the
    /// clock declarations every later pass relies on.
    pub fn ordering(&self, po: &PartialOrder<'_>) -> ConstraintSet {
        let mut set = ConstraintSet::new();

        for (id, _) in po.events().iter().enumerate().filter(|(_, e)| is_clocked(e)) {
            set.declare(declare_int(clock_var(id)));
        }

        for thread in po.thread_ids() {
            let clocked: Vec<EventId> = po
                .relevant_events(thread)
                .filter(|&e| !po.event(e).is_memory_barrier())
                .collect();
            for pair in clocked.windows(2) {
                debug_assert!(!self.program_order_is_relaxed(po, pair[0], pair[1]));
                set.push(
                    ConstraintKind::ProgramOrder,
                    pair[1],
                    clock(pair[0]).lt(clock(pair[1])),
                );
            }
        }

        for (&spawn, &child) in po.spawn_map() {
            for &e in po.thread_events(child) {
                if is_clocked(po.event(e)) {
                    set.push(ConstraintKind::Spawn, e, clock(spawn).lt(clock(e)));
                }
            }
        }

        for section in po.atomic_sections() {
            for (other, event) in po.events().iter().enumerate() {
                if event.thread_id == section.thread_id || !is_clocked(event) {
                    continue;
                }
                set.push(
                    ConstraintKind::Atomic,
                    section.begin,
                    Term::or(vec![
                        self.before(po, other, section.begin),
                        self.before(po, section.end, other),
                    ]),
                );
            }
        }

        tracing::debug!(
            constraints = set.len(),
            atomic_sections = po.atomic_sections().len(),
            "Encoded program order"
        );
        set
    }
}

impl MemoryModel for SequentialConsistency {
    fn name(&self) -> &'static str {
        "sc"
    }

    fn before(&self, po: &PartialOrder<'_>, first: EventId, second: EventId) -> Term {
        match po.is_before(first, second) {
            Precedence::Yes => Term::bool(true),
            Precedence::No => Term::bool(false),
            Precedence::Unknown => clock(first).lt(clock(second)),
        }
    }

    fn program_order_is_relaxed(
        &self,
        _po: &PartialOrder<'_>,
        _first: EventId,
        _second: EventId,
    ) -> bool {
        false
    }

    fn encode(&self, po: &PartialOrder<'_>) -> ConstraintSet {
        let scope = Scope::build(po);
        ConstraintSet::concat([
            self.ordering(po),
            read_from::encode(self, po),
            write_serialization::encode(self, po, &scope),
            write_serialization::from_read(self, po, &scope),
        ])
    }
}
