//! Partial-order infrastructure shared by every memory model.
//!
//! Built once per trace in a single pass: per-thread event sequences, the
//! spawn map, and atomic-section membership. Events live in the borrowed
//! trace and are referred to by [`EventId`] (their trace position), so the
//! structure holds no pointers between events and is freely shared by the
//! encoding passes.

use std::collections::BTreeMap;

use symex_mm_smtlib::term::Term;

use crate::error::EncodeError;
use crate::event::{Event, EventId, EventKind, ThreadId};

/// Answer of the static happens-before query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Known to happen before.
    Yes,
    /// Known not to happen before (the reverse holds, or it is the same event).
    No,
    /// Not decided statically; left to the solver.
    Unknown,
}

/// A bracketed run of one thread's events, markers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicSection {
    pub thread_id: ThreadId,
    /// The ATOMIC-BEGIN event.
    pub begin: EventId,
    /// The ATOMIC-END event.
    pub end: EventId,
    /// Every event of the thread from `begin` to `end`, inclusive, in order.
    pub members: Vec<EventId>,
}

/// A READ or WRITE with its operands resolved.
#[derive(Debug, Clone, Copy)]
pub struct Access<'a> {
    pub id: EventId,
    pub thread_id: ThreadId,
    pub guard: &'a Term,
    pub address: &'a Term,
    pub value: &'a Term,
}

/// Navigable view of a trace: threads, spawns, atomic sections.
#[derive(Debug, Clone)]
pub struct PartialOrder<'a> {
    events: &'a [Event],
    threads: BTreeMap<ThreadId, Vec<EventId>>,
    spawn_map: BTreeMap<EventId, ThreadId>,
    spawner: BTreeMap<ThreadId, EventId>,
    atomic_sections: Vec<AtomicSection>,
}

impl<'a> PartialOrder<'a> {
    /// Single pass over the trace in sequence-number order.
    ///
    /// The k-th SPAWN event of the trace creates thread k.
    pub fn build(trace: &'a [Event]) -> Result<Self, EncodeError> {
        let mut threads: BTreeMap<ThreadId, Vec<EventId>> = BTreeMap::new();
        threads.insert(0, Vec::new());
        let mut spawn_map = BTreeMap::new();
        let mut spawner = BTreeMap::new();
        let mut open: BTreeMap<ThreadId, (EventId, Vec<EventId>)> = BTreeMap::new();
        let mut atomic_sections = Vec::new();
        let mut previous: Option<u64> = None;

        for (id, event) in trace.iter().enumerate() {
            if let Some(prev) = previous
                && event.sequence_number <= prev
            {
                return Err(EncodeError::NonMonotonicSequence {
                    event: id,
                    sequence_number: event.sequence_number,
                    previous: prev,
                });
            }
            previous = Some(event.sequence_number);

            let thread = event.thread_id;
            if thread != 0 && !spawner.contains_key(&thread) {
                return Err(EncodeError::ThreadBeforeSpawn { event: id, thread });
            }

            if event.kind.is_memory_access() {
                let missing = if event.address.is_none() {
                    Some("address")
                } else if event.value.is_none() {
                    Some("value")
                } else {
                    None
                };
                if let Some(operand) = missing {
                    return Err(EncodeError::MissingOperand {
                        event: id,
                        kind: event.kind,
                        operand,
                    });
                }
            }

            threads.entry(thread).or_default().push(id);

            if event.is_spawn() {
                let child = spawn_map.len() + 1;
                spawn_map.insert(id, child);
                spawner.insert(child, id);
                threads.entry(child).or_default();
            } else if event.kind.is_atomic_begin() {
                if let Some((begin, _)) = open.get(&thread) {
                    return Err(EncodeError::NestedAtomicSection {
                        event: id,
                        thread,
                        open: *begin,
                    });
                }
                open.insert(thread, (id, Vec::new()));
            }

            if let Some((_, members)) = open.get_mut(&thread) {
                members.push(id);
            }

            if event.kind.is_atomic_end() {
                let Some((begin, members)) = open.remove(&thread) else {
                    return Err(EncodeError::UnmatchedAtomicEnd { event: id, thread });
                };
                atomic_sections.push(AtomicSection {
                    thread_id: thread,
                    begin,
                    end: id,
                    members,
                });
            }
        }

        if let Some((begin, thread)) = open.iter().map(|(t, (b, _))| (*b, *t)).min() {
            return Err(EncodeError::UnclosedAtomicSection { begin, thread });
        }

        atomic_sections.sort_by_key(|s| s.begin);

        tracing::debug!(
            events = trace.len(),
            threads = threads.len(),
            spawns = spawn_map.len(),
            atomic_sections = atomic_sections.len(),
            "Built partial order"
        );

        Ok(Self {
            events: trace,
            threads,
            spawn_map,
            spawner,
            atomic_sections,
        })
    }

    pub fn events(&self) -> &'a [Event] {
        self.events
    }

    pub fn event(&self, id: EventId) -> &'a Event {
        &self.events[id]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn thread_ids(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.threads.keys().copied()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// All events of a thread in program order.
    pub fn thread_events(&self, thread: ThreadId) -> &[EventId] {
        self.threads.get(&thread).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ordering-relevant events of a thread in program order.
    pub fn relevant_events(&self, thread: ThreadId) -> impl Iterator<Item = EventId> + '_ {
        self.thread_events(thread)
            .iter()
            .copied()
            .filter(|&e| self.events[e].is_ordering_relevant())
    }

    pub fn spawn_map(&self) -> &BTreeMap<EventId, ThreadId> {
        &self.spawn_map
    }

    /// SPAWN event that created a thread; `None` for thread 0.
    pub fn spawner_of(&self, thread: ThreadId) -> Option<EventId> {
        self.spawner.get(&thread).copied()
    }

    pub fn atomic_sections(&self) -> &[AtomicSection] {
        &self.atomic_sections
    }

    fn accesses(&self, kind: EventKind) -> impl Iterator<Item = Access<'a>> + '_ {
        let events = self.events;
        events.iter().enumerate().filter_map(move |(id, e)| {
            if e.kind != kind {
                return None;
            }
            Some(Access {
                id,
                thread_id: e.thread_id,
                guard: &e.guard,
                address: e.address.as_ref()?,
                value: e.value.as_ref()?,
            })
        })
    }

    /// Shared reads in trace order.
    pub fn reads(&self) -> impl Iterator<Item = Access<'a>> + '_ {
        self.accesses(EventKind::Read)
    }

    /// Shared writes in trace order.
    pub fn writes(&self) -> impl Iterator<Item = Access<'a>> + '_ {
        self.accesses(EventKind::Write)
    }

    /// Program order: same thread, `a` strictly first.
    pub fn po(&self, a: EventId, b: EventId) -> bool {
        let (ea, eb) = (&self.events[a], &self.events[b]);
        ea.thread_id == eb.thread_id && ea.sequence_number < eb.sequence_number
    }

    /// Static happens-before from program order and spawn chains.
    pub fn is_before(&self, a: EventId, b: EventId) -> Precedence {
        if a == b {
            Precedence::No
        } else if self.precedes(a, b) {
            Precedence::Yes
        } else if self.precedes(b, a) {
            Precedence::No
        } else {
            Precedence::Unknown
        }
    }

    /// `a` precedes `b` in program order, or `a` is at or before a SPAWN
    /// that (transitively) created `b`'s thread.
    fn precedes(&self, a: EventId, b: EventId) -> bool {
        let ea = &self.events[a];
        let eb = &self.events[b];
        if ea.thread_id == eb.thread_id {
            return self.po(a, b);
        }

        let mut thread = eb.thread_id;
        while let Some(&spawn) = self.spawner.get(&thread) {
            let es = &self.events[spawn];
            if es.thread_id == ea.thread_id {
                return ea.sequence_number <= es.sequence_number;
            }
            thread = es.thread_id;
        }
        false
    }
}
