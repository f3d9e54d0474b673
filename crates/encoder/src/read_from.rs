//! Read-from: bind every executed read to exactly one candidate write.
//!
//! The selected write (`rf_w_r`) must be executed, alias the read, precede
//! it, supply its value, and be the latest such write. Initial memory
//! contents reach a read only as ordinary writes recorded in the trace; a
//! read no write can reach keeps a free value.

use symex_mm_smtlib::term::Term;

use crate::alias::{Alias, address_equal, may_alias};
use crate::constraint::{ConstraintKind, ConstraintSet};
use crate::memory_model::MemoryModel;
use crate::partial_order::{Access, PartialOrder, Precedence};
use crate::simplify::is_statically_false;
use crate::variables::{declare_bool, rf_var, selected};

/// Writes a read may take its value from, in trace order.
///
/// Excludes writes that can never execute, never alias the read, or are
/// known to come after it.
pub fn candidates<'a>(po: &PartialOrder<'a>, read: &Access<'a>) -> Vec<Access<'a>> {
    po.writes()
        .filter(|w| !is_statically_false(w.guard))
        .filter(|w| may_alias(w.address, read.address) != Alias::Never)
        .filter(|w| po.is_before(w.id, read.id) != Precedence::No)
        .collect()
}

/// A candidate is executed and writes to the read's location.
fn hits(write: &Access<'_>, read: &Access<'_>) -> Term {
    Term::and(vec![
        write.guard.clone(),
        address_equal(write.address, read.address),
    ])
}

pub fn encode<M: MemoryModel + ?Sized>(model: &M, po: &PartialOrder<'_>) -> ConstraintSet {
    let mut set = ConstraintSet::new();

    for read in po.reads() {
        if is_statically_false(read.guard) {
            tracing::debug!(read = read.id, "Skipping read that never executes");
            continue;
        }

        let writes = candidates(po, &read);
        if writes.is_empty() {
            tracing::debug!(read = read.id, "Read has no candidate write; value left free");
            set.mark_unconstrained(read.id);
            continue;
        }

        for w in &writes {
            set.declare(declare_bool(rf_var(w.id, read.id)));
        }

        // Some candidate is chosen whenever the read executes.
        let options: Vec<Term> = writes.iter().map(|w| selected(w.id, read.id)).collect();
        set.push(
            ConstraintKind::RfSome,
            read.id,
            read.guard.clone().implies(Term::or(options.clone())),
        );

        // A chosen write supplies the value.
        for w in &writes {
            set.push(
                ConstraintKind::RfSome,
                read.id,
                selected(w.id, read.id).implies(Term::and(vec![
                    read.guard.clone(),
                    hits(w, &read),
                    model.before(po, w.id, read.id),
                    read.value.clone().eq(w.value.clone()),
                ])),
            );
        }

        let mut exclusive = Vec::new();
        for (i, a) in options.iter().enumerate() {
            for b in &options[i + 1..] {
                exclusive.push(Term::and(vec![a.clone(), b.clone()]).not());
            }
        }
        set.push(ConstraintKind::RfUnique, read.id, Term::and(exclusive));

        for w in &writes {
            for other in writes.iter().filter(|o| o.id != w.id) {
                set.push(
                    ConstraintKind::RfLatest,
                    read.id,
                    selected(w.id, read.id).implies(
                        Term::and(vec![
                            hits(other, &read),
                            model.before(po, w.id, other.id),
                            model.before(po, other.id, read.id),
                        ])
                        .not(),
                    ),
                );
            }
        }
    }

    tracing::debug!(
        constraints = set.len(),
        unconstrained_reads = set.unconstrained_reads().len(),
        "Encoded read-from"
    );
    set
}
