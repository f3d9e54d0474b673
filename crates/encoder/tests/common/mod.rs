//! Shared helpers for the encoder integration tests.
//!
//! `TraceBuilder` assigns sequence numbers so tests only state threads and
//! operations. `solutions` is a brute-force oracle: it tries every
//! interleaving of the clocked events together with every assignment of the
//! Boolean selection variables and the supplied free trace variables, and
//! keeps the assignments under which all emitted constraints hold. It is
//! only usable on traces with a handful of events.

#![allow(dead_code)]

use std::collections::HashMap;

use symex_mm_encoder::{ConstraintKind, ConstraintSet, Event, ThreadId};
use symex_mm_smtlib::command::Command;
use symex_mm_smtlib::sort::Sort;
use symex_mm_smtlib::term::Term;

// ---------------------------------------------------------------------------
// Trace construction
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TraceBuilder {
    events: Vec<Event>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.events.len() as u64 * 10
    }

    fn push(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn write(self, thread: ThreadId, addr: &str, value: i128) -> Self {
        let seq = self.next_seq();
        self.push(Event::write(thread, seq, Term::var(addr), Term::int(value)))
    }

    pub fn guarded_write(self, thread: ThreadId, addr: &str, value: i128, guard: &str) -> Self {
        let seq = self.next_seq();
        self.push(Event::write(thread, seq, Term::var(addr), Term::int(value)).with_guard(Term::var(guard)))
    }

    pub fn read(self, thread: ThreadId, addr: &str, into: &str) -> Self {
        let seq = self.next_seq();
        self.push(Event::read(thread, seq, Term::var(addr), Term::var(into)))
    }

    /// Write to a fixed numeric location.
    pub fn write_at(self, thread: ThreadId, addr: i128, value: i128) -> Self {
        let seq = self.next_seq();
        self.push(Event::write(thread, seq, Term::int(addr), Term::int(value)))
    }

    /// Read from a fixed numeric location.
    pub fn read_at(self, thread: ThreadId, addr: i128, into: &str) -> Self {
        let seq = self.next_seq();
        self.push(Event::read(thread, seq, Term::int(addr), Term::var(into)))
    }

    pub fn spawn(self, thread: ThreadId) -> Self {
        let seq = self.next_seq();
        self.push(Event::spawn(thread, seq))
    }

    pub fn begin(self, thread: ThreadId) -> Self {
        let seq = self.next_seq();
        self.push(Event::atomic_begin(thread, seq))
    }

    pub fn end(self, thread: ThreadId) -> Self {
        let seq = self.next_seq();
        self.push(Event::atomic_end(thread, seq))
    }

    pub fn build(self) -> Vec<Event> {
        self.events
    }
}

// ---------------------------------------------------------------------------
// Brute-force evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i128),
}

impl Value {
    pub fn as_bool(self) -> bool {
        match self {
            Value::Bool(b) => b,
            Value::Int(n) => panic!("expected a Bool, found {n}"),
        }
    }

    pub fn as_int(self) -> i128 {
        match self {
            Value::Int(n) => n,
            Value::Bool(b) => panic!("expected an Int, found {b}"),
        }
    }
}

pub type Model = HashMap<String, Value>;

pub fn eval(term: &Term, model: &Model) -> Value {
    let b = |t: &Term| eval(t, model).as_bool();
    let i = |t: &Term| eval(t, model).as_int();
    match term {
        Term::BoolLit(v) => Value::Bool(*v),
        Term::IntLit(n) => Value::Int(*n),
        Term::Const(name) => *model
            .get(name)
            .unwrap_or_else(|| panic!("no value for {name}")),
        Term::Not(t) => Value::Bool(!b(t)),
        Term::And(ts) => Value::Bool(ts.iter().all(b)),
        Term::Or(ts) => Value::Bool(ts.iter().any(b)),
        Term::Implies(p, q) => Value::Bool(!b(p) || b(q)),
        Term::Iff(p, q) => Value::Bool(b(p) == b(q)),
        Term::Eq(x, y) => Value::Bool(eval(x, model) == eval(y, model)),
        Term::Ite(c, t, e) => {
            if b(c) {
                eval(t, model)
            } else {
                eval(e, model)
            }
        }
        Term::IntAdd(x, y) => Value::Int(i(x) + i(y)),
        Term::IntSub(x, y) => Value::Int(i(x) - i(y)),
        Term::IntLt(x, y) => Value::Bool(i(x) < i(y)),
        Term::IntLe(x, y) => Value::Bool(i(x) <= i(y)),
        Term::IntGt(x, y) => Value::Bool(i(x) > i(y)),
        Term::IntGe(x, y) => Value::Bool(i(x) >= i(y)),
        other => panic!("evaluator does not support {other:?}"),
    }
}

fn permutations(n: usize) -> Vec<Vec<i128>> {
    fn go(prefix: &mut Vec<i128>, used: &mut [bool], out: &mut Vec<Vec<i128>>) {
        if prefix.len() == used.len() {
            out.push(prefix.clone());
            return;
        }
        for k in 0..used.len() {
            if !used[k] {
                used[k] = true;
                prefix.push(k as i128);
                go(prefix, used, out);
                prefix.pop();
                used[k] = false;
            }
        }
    }
    let mut out = Vec::new();
    go(&mut Vec::new(), &mut vec![false; n], &mut out);
    out
}

/// Every assignment satisfying the whole constraint set.
///
/// Declared Int variables are clocks and range over all interleavings;
/// declared Bool variables range over both values; `free` lists the
/// trace variables (read values, guards) with their candidate values.
pub fn solutions(set: &ConstraintSet, free: &[(&str, Vec<Value>)]) -> Vec<Model> {
    let mut clocks = Vec::new();
    let mut flags = Vec::new();
    for decl in set.declarations() {
        match decl {
            Command::DeclareFun(name, params, Sort::Int) if params.is_empty() => {
                clocks.push(name.clone())
            }
            Command::DeclareFun(name, params, Sort::Bool) if params.is_empty() => {
                flags.push(name.clone())
            }
            other => panic!("unexpected declaration {other}"),
        }
    }
    assert!(flags.len() <= 16, "too many Boolean variables for brute force");
    assert!(clocks.len() <= 8, "too many clocks for brute force");

    let formula = set.conjunction();
    // Ordering constraints mention clocks only; they prune interleavings
    // before the Boolean variables are enumerated.
    let ordering: Vec<&Term> = set
        .constraints()
        .iter()
        .filter(|c| {
            matches!(
                c.kind,
                ConstraintKind::ProgramOrder | ConstraintKind::Spawn | ConstraintKind::Atomic
            )
        })
        .map(|c| &c.term)
        .collect();
    let orders: Vec<Vec<i128>> = permutations(clocks.len())
        .into_iter()
        .filter(|order| {
            let model: Model = clocks
                .iter()
                .zip(order)
                .map(|(name, pos)| (name.clone(), Value::Int(*pos)))
                .collect();
            ordering.iter().all(|t| eval(t, &model).as_bool())
        })
        .collect();
    let mut free_assignments: Vec<Vec<(String, Value)>> = vec![Vec::new()];
    for (name, values) in free {
        free_assignments = free_assignments
            .into_iter()
            .flat_map(|prefix| {
                values.iter().map(move |v| {
                    let mut next = prefix.clone();
                    next.push((name.to_string(), *v));
                    next
                })
            })
            .collect();
    }

    let mut found = Vec::new();
    for order in &orders {
        for bits in 0u32..(1 << flags.len()) {
            for assignment in &free_assignments {
                let mut model = Model::new();
                for (name, pos) in clocks.iter().zip(order) {
                    model.insert(name.clone(), Value::Int(*pos));
                }
                for (k, name) in flags.iter().enumerate() {
                    model.insert(name.clone(), Value::Bool(bits & (1 << k) != 0));
                }
                for (name, v) in assignment {
                    model.insert(name.clone(), *v);
                }
                if eval(&formula, &model).as_bool() {
                    found.push(model);
                }
            }
        }
    }
    found
}

pub fn ints(values: &[i128]) -> Vec<Value> {
    values.iter().map(|&n| Value::Int(n)).collect()
}

pub fn bools() -> Vec<Value> {
    vec![Value::Bool(false), Value::Bool(true)]
}

/// Value of a variable in a model; `false` for Bool variables the
/// constraint set never declared.
pub fn flag(model: &Model, name: &str) -> bool {
    model.get(name).is_some_and(|v| v.as_bool())
}

pub fn int(model: &Model, name: &str) -> i128 {
    model[name].as_int()
}
