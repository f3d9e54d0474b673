//! Constraint fragments produced by the encoding passes.
//!
//! Every pass returns its own [`ConstraintSet`]; the memory model appends
//! them in a fixed order. Constraints are never removed once emitted,
//! except that simplification may drop ones that fold to `true`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use symex_mm_smtlib::command::Command;
use symex_mm_smtlib::script::Script;
use symex_mm_smtlib::term::Term;

use crate::event::EventId;
use crate::simplify::simplify_term;

/// Category of an emitted constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConstraintKind {
    /// Consecutive events of one thread.
    #[serde(rename = "po")]
    ProgramOrder,
    /// SPAWN before every event of the spawned thread.
    #[serde(rename = "spawn")]
    Spawn,
    /// No foreign event inside an atomic section.
    #[serde(rename = "atomic")]
    Atomic,
    /// An executed read selects some source.
    #[serde(rename = "rf-some")]
    RfSome,
    /// At most one source per read.
    #[serde(rename = "rf-unique")]
    RfUnique,
    /// The selected write is the latest aliasing write before the read.
    #[serde(rename = "rf-latest")]
    RfLatest,
    /// Exactly one direction per pair of serialized writes.
    #[serde(rename = "ws-total")]
    WsTotal,
    /// Serialization agrees with static happens-before.
    #[serde(rename = "ws-hb")]
    WsHappensBefore,
    /// Serialization implies interleaving order for executed aliasing writes.
    #[serde(rename = "ws-order")]
    WsOrder,
    /// Transitivity of write serialization.
    #[serde(rename = "ws-trans")]
    WsTransitive,
    /// A read happens before writes serialized after its source.
    #[serde(rename = "fr")]
    FromRead,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 11] = [
        ConstraintKind::ProgramOrder,
        ConstraintKind::Spawn,
        ConstraintKind::Atomic,
        ConstraintKind::RfSome,
        ConstraintKind::RfUnique,
        ConstraintKind::RfLatest,
        ConstraintKind::WsTotal,
        ConstraintKind::WsHappensBefore,
        ConstraintKind::WsOrder,
        ConstraintKind::WsTransitive,
        ConstraintKind::FromRead,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConstraintKind::ProgramOrder => "po",
            ConstraintKind::Spawn => "spawn",
            ConstraintKind::Atomic => "atomic",
            ConstraintKind::RfSome => "rf-some",
            ConstraintKind::RfUnique => "rf-unique",
            ConstraintKind::RfLatest => "rf-latest",
            ConstraintKind::WsTotal => "ws-total",
            ConstraintKind::WsHappensBefore => "ws-hb",
            ConstraintKind::WsOrder => "ws-order",
            ConstraintKind::WsTransitive => "ws-trans",
            ConstraintKind::FromRead => "fr",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One formula together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    /// Event the constraint was emitted for.
    pub event: EventId,
    pub term: Term,
}

/// Append-only fragment: declarations, constraints, and the reads left
/// without any source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    declarations: Vec<Command>,
    declared: BTreeSet<String>,
    constraints: Vec<Constraint>,
    unconstrained_reads: Vec<EventId>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ConstraintKind, event: EventId, term: Term) {
        self.constraints.push(Constraint { kind, event, term });
    }

    /// Add a declaration unless the same name is already declared.
    pub fn declare(&mut self, decl: Command) {
        if let Some(name) = decl.declared_name()
            && !self.declared.insert(name.to_string())
        {
            return;
        }
        self.declarations.push(decl);
    }

    pub fn mark_unconstrained(&mut self, read: EventId) {
        self.unconstrained_reads.push(read);
    }

    /// Append another fragment after this one.
    pub fn append(&mut self, other: ConstraintSet) {
        for decl in other.declarations {
            self.declare(decl);
        }
        self.constraints.extend(other.constraints);
        self.unconstrained_reads.extend(other.unconstrained_reads);
    }

    /// Concatenate fragments in order.
    pub fn concat(fragments: impl IntoIterator<Item = ConstraintSet>) -> Self {
        let mut out = Self::new();
        for fragment in fragments {
            out.append(fragment);
        }
        out
    }

    pub fn declarations(&self) -> &[Command] {
        &self.declarations
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn unconstrained_reads(&self) -> &[EventId] {
        &self.unconstrained_reads
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// Constraints of one category.
    pub fn of_kind(&self, kind: ConstraintKind) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(move |c| c.kind == kind)
    }

    /// Number of constraints per category, categories without any omitted.
    pub fn counts(&self) -> BTreeMap<ConstraintKind, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.constraints {
            *counts.entry(c.kind).or_insert(0) += 1;
        }
        counts
    }

    /// The whole set as a single formula.
    pub fn conjunction(&self) -> Term {
        Term::And(self.constraints.iter().map(|c| c.term.clone()).collect())
    }

    /// Fold constant structure and drop constraints that become `true`.
    pub fn simplified(self) -> Self {
        let mut constraints = Vec::with_capacity(self.constraints.len());
        for c in self.constraints {
            let term = simplify_term(&c.term);
            if term.is_true() {
                continue;
            }
            if term.is_false() {
                tracing::warn!(
                    kind = %c.kind,
                    event = c.event,
                    "Constraint simplifies to false; the trace admits no execution"
                );
            }
            constraints.push(Constraint { term, ..c });
        }
        Self {
            constraints,
            ..self
        }
    }

    /// Render as an SMT-LIB script: logic, declarations, assertions.
    pub fn to_script(&self, logic: &str, annotate: bool) -> Script {
        let mut script = Script::new();
        script.push(Command::SetLogic(logic.to_string()));
        script.extend(self.declarations.iter().cloned());
        for c in &self.constraints {
            if annotate {
                script.push(Command::Comment(format!("{} @ event {}", c.kind, c.event)));
            }
            script.push(Command::Assert(c.term.clone()));
        }
        script
    }
}
