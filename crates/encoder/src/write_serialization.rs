//! Write serialization and from-read.
//!
//! Writes that another thread can observe are put in a single total order
//! (`ws_a_b`): exactly one direction per pair, transitive, agreeing with
//! static happens-before, and agreeing with the interleaving whenever both
//! writes execute on the same location. From-read then places a read
//! before every write serialized after the one it reads from.

use std::collections::BTreeSet;

use symex_mm_smtlib::term::Term;

use crate::alias::{Alias, address_equal, may_alias};
use crate::constraint::{ConstraintKind, ConstraintSet};
use crate::event::EventId;
use crate::memory_model::MemoryModel;
use crate::partial_order::{Access, PartialOrder, Precedence};
use crate::read_from::candidates;
use crate::simplify::is_statically_false;
use crate::variables::{declare_bool, selected, serialized, ws_var};

/// Pairs of writes that take part in serialization.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    writes: Vec<EventId>,
    pairs: BTreeSet<(EventId, EventId)>,
}

impl Scope {
    /// Writes that may alias and where at least one of the two is
    /// observable by another thread.
    pub fn build(po: &PartialOrder<'_>) -> Self {
        let writes: Vec<Access<'_>> = po
            .writes()
            .filter(|w| !is_statically_false(w.guard))
            .collect();
        let observable: Vec<bool> = writes.iter().map(|w| observable(po, w)).collect();

        let mut pairs = BTreeSet::new();
        let mut paired = BTreeSet::new();
        for (i, a) in writes.iter().enumerate() {
            for (j, b) in writes.iter().enumerate().skip(i + 1) {
                if (observable[i] || observable[j])
                    && may_alias(a.address, b.address) != Alias::Never
                {
                    pairs.insert((a.id, b.id));
                    paired.insert(a.id);
                    paired.insert(b.id);
                }
            }
        }

        Self {
            writes: paired.into_iter().collect(),
            pairs,
        }
    }

    /// Whether the unordered pair is serialized.
    pub fn contains(&self, a: EventId, b: EventId) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    /// Pairs in trace order, smaller id first.
    pub fn pairs(&self) -> impl Iterator<Item = (EventId, EventId)> + '_ {
        self.pairs.iter().copied()
    }

    /// Writes that appear in some pair.
    pub fn writes(&self) -> &[EventId] {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Some access of another thread may touch the same location.
fn observable(po: &PartialOrder<'_>, write: &Access<'_>) -> bool {
    po.reads().chain(po.writes()).any(|o| {
        o.thread_id != write.thread_id && may_alias(o.address, write.address) != Alias::Never
    })
}

pub fn encode<M: MemoryModel + ?Sized>(
    model: &M,
    po: &PartialOrder<'_>,
    scope: &Scope,
) -> ConstraintSet {
    let mut set = ConstraintSet::new();

    for (a, b) in scope.pairs() {
        set.declare(declare_bool(ws_var(a, b)));
        set.declare(declare_bool(ws_var(b, a)));
        set.push(
            ConstraintKind::WsTotal,
            b,
            serialized(a, b).xor(serialized(b, a)),
        );

        match po.is_before(a, b) {
            Precedence::Yes => set.push(ConstraintKind::WsHappensBefore, b, serialized(a, b)),
            Precedence::No => set.push(ConstraintKind::WsHappensBefore, b, serialized(b, a)),
            Precedence::Unknown => {
                let (ea, eb) = (po.event(a), po.event(b));
                let (Some(addr_a), Some(addr_b)) = (ea.address.as_ref(), eb.address.as_ref())
                else {
                    continue;
                };
                let executed_alias = Term::and(vec![
                    ea.guard.clone(),
                    eb.guard.clone(),
                    address_equal(addr_a, addr_b),
                ]);
                for (first, second) in [(a, b), (b, a)] {
                    set.push(
                        ConstraintKind::WsOrder,
                        b,
                        Term::and(vec![serialized(first, second), executed_alias.clone()])
                            .implies(model.before(po, first, second)),
                    );
                }
            }
        }
    }

    let writes = scope.writes();
    for &a in writes {
        for &b in writes {
            if a == b || !scope.contains(a, b) {
                continue;
            }
            for &c in writes {
                if c == a || c == b || !scope.contains(b, c) || !scope.contains(a, c) {
                    continue;
                }
                set.push(
                    ConstraintKind::WsTransitive,
                    c,
                    Term::and(vec![serialized(a, b), serialized(b, c)]).implies(serialized(a, c)),
                );
            }
        }
    }

    tracing::debug!(
        pairs = scope.pairs.len(),
        constraints = set.len(),
        "Encoded write serialization"
    );
    set
}

/// From-read: a read that takes its value from `w` happens before every
/// executed aliasing write serialized after `w`.
pub fn from_read<M: MemoryModel + ?Sized>(
    model: &M,
    po: &PartialOrder<'_>,
    scope: &Scope,
) -> ConstraintSet {
    let mut set = ConstraintSet::new();
    if scope.is_empty() {
        return set;
    }

    for read in po.reads() {
        if is_statically_false(read.guard) {
            continue;
        }
        let writes = candidates(po, &read);
        let later: Vec<Access<'_>> = po
            .writes()
            .filter(|w| !is_statically_false(w.guard))
            .filter(|w| may_alias(w.address, read.address) != Alias::Never)
            .collect();

        for source in &writes {
            for other in later.iter().filter(|o| o.id != source.id) {
                if !scope.contains(source.id, other.id) {
                    continue;
                }
                set.push(
                    ConstraintKind::FromRead,
                    read.id,
                    Term::and(vec![
                        selected(source.id, read.id),
                        serialized(source.id, other.id),
                        other.guard.clone(),
                        address_equal(other.address, read.address),
                    ])
                    .implies(model.before(po, read.id, other.id)),
                );
            }
        }
    }

    tracing::debug!(constraints = set.len(), "Encoded from-read");
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::sc::SequentialConsistency;
    use crate::variables::clock;

    fn w(thread: usize, seq: u64, addr: &str, val: i128) -> Event {
        Event::write(thread, seq, Term::var(addr), Term::int(val))
    }

    fn r(thread: usize, seq: u64, addr: &str) -> Event {
        Event::read(thread, seq, Term::var(addr), Term::var(format!("v{seq}")))
    }

    #[test]
    fn writes_no_other_thread_can_touch_are_not_serialized() {
        let trace = vec![
            w(0, 0, "x", 1),
            w(0, 1, "x", 2),
            Event::spawn(0, 2),
            w(1, 3, "y", 3),
        ];
        let po = PartialOrder::build(&trace).unwrap();
        let scope = Scope::build(&po);
        // "x" and "y" are distinct symbols, so they may still alias.
        assert!(scope.contains(0, 3));
        assert!(scope.contains(1, 3));

        let trace = vec![
            Event::write(0, 0, Term::int(8), Term::int(1)),
            Event::write(0, 1, Term::int(8), Term::int(2)),
            Event::spawn(0, 2),
            Event::write(1, 3, Term::int(16), Term::int(3)),
        ];
        let po = PartialOrder::build(&trace).unwrap();
        assert!(Scope::build(&po).is_empty());
    }

    #[test]
    fn pairs_need_one_observable_write() {
        let trace = vec![
            w(0, 0, "x", 1),
            Event::spawn(0, 1),
            r(1, 2, "x"),
            w(0, 3, "x", 2),
        ];
        let po = PartialOrder::build(&trace).unwrap();
        let scope = Scope::build(&po);
        assert_eq!(scope.pairs().collect::<Vec<_>>(), vec![(0, 3)]);
        assert!(scope.contains(3, 0));
        assert_eq!(scope.writes(), &[0, 3]);
    }

    #[test]
    fn happens_before_fixes_direction() {
        let trace = vec![
            w(0, 0, "x", 1),
            Event::spawn(0, 1),
            w(1, 2, "x", 2),
            r(1, 3, "x"),
        ];
        let po = PartialOrder::build(&trace).unwrap();
        let set = encode(&SequentialConsistency, &po, &Scope::build(&po));
        let hb: Vec<_> = set
            .of_kind(ConstraintKind::WsHappensBefore)
            .map(|c| c.term.clone())
            .collect();
        assert_eq!(hb, vec![serialized(0, 2)]);
        assert_eq!(set.of_kind(ConstraintKind::WsOrder).count(), 0);
        assert_eq!(set.of_kind(ConstraintKind::WsTotal).count(), 1);
    }

    #[test]
    fn concurrent_writes_follow_the_interleaving() {
        let trace = vec![Event::spawn(0, 0), w(0, 1, "x", 1), w(1, 2, "x", 2)];
        let po = PartialOrder::build(&trace).unwrap();
        let set = encode(&SequentialConsistency, &po, &Scope::build(&po)).simplified();
        let order: Vec<_> = set
            .of_kind(ConstraintKind::WsOrder)
            .map(|c| c.term.clone())
            .collect();
        assert_eq!(
            order,
            vec![
                serialized(1, 2).implies(clock(1).lt(clock(2))),
                serialized(2, 1).implies(clock(2).lt(clock(1))),
            ]
        );
    }

    #[test]
    fn transitivity_covers_ordered_triples() {
        let trace = vec![
            Event::spawn(0, 0),
            Event::spawn(0, 1),
            w(0, 2, "x", 1),
            w(1, 3, "x", 2),
            w(2, 4, "x", 3),
        ];
        let po = PartialOrder::build(&trace).unwrap();
        let set = encode(&SequentialConsistency, &po, &Scope::build(&po));
        assert_eq!(set.of_kind(ConstraintKind::WsTransitive).count(), 6);
        assert!(set.is_declared("ws_2_4"));
        assert!(set.is_declared("ws_4_2"));
    }

    #[test]
    fn from_read_orders_read_before_overwrite() {
        let trace = vec![
            Event::spawn(0, 0),
            w(0, 1, "x", 1),
            r(0, 2, "x"),
            w(1, 3, "x", 2),
        ];
        let po = PartialOrder::build(&trace).unwrap();
        let set = from_read(&SequentialConsistency, &po, &Scope::build(&po)).simplified();
        let fr: Vec<_> = set.constraints().iter().map(|c| c.term.clone()).collect();
        assert!(fr.contains(
            &Term::and(vec![selected(1, 2), serialized(1, 3)]).implies(clock(2).lt(clock(3)))
        ));
    }
}
