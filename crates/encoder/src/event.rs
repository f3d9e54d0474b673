//! Trace events as recorded by symbolic execution.
//!
//! An [`Event`] is pure data. Classification predicates are functions of
//! the event kind only; nothing here looks at guards or values.

use std::fmt;

use serde::Serialize;
use symex_mm_smtlib::term::Term;

/// Position of an event in the trace; doubles as its arena index.
pub type EventId = usize;

/// Thread of execution. The initial thread is 0.
pub type ThreadId = usize;

/// Kind of a trace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum EventKind {
    Read,
    Write,
    Assume,
    Assert,
    Location,
    Spawn,
    FunctionEntry,
    FunctionExit,
    AtomicBegin,
    AtomicEnd,
    Input,
    Output,
    MemoryBarrier,
}

impl EventKind {
    pub fn is_shared_read(self) -> bool {
        self == EventKind::Read
    }

    pub fn is_shared_write(self) -> bool {
        self == EventKind::Write
    }

    pub fn is_memory_access(self) -> bool {
        matches!(self, EventKind::Read | EventKind::Write)
    }

    pub fn is_spawn(self) -> bool {
        self == EventKind::Spawn
    }

    pub fn is_atomic_begin(self) -> bool {
        self == EventKind::AtomicBegin
    }

    pub fn is_atomic_end(self) -> bool {
        self == EventKind::AtomicEnd
    }

    pub fn is_memory_barrier(self) -> bool {
        self == EventKind::MemoryBarrier
    }

    /// Events that take part in the happens-before relation at all.
    /// Everything else is a marker with no ordering effect.
    pub fn is_ordering_relevant(self) -> bool {
        matches!(
            self,
            EventKind::Read
                | EventKind::Write
                | EventKind::Spawn
                | EventKind::AtomicBegin
                | EventKind::AtomicEnd
                | EventKind::MemoryBarrier
        )
    }

    /// Kinds a memory model must be able to constrain; encoding fails if it
    /// cannot.
    pub fn is_correctness_sensitive(self) -> bool {
        matches!(
            self,
            EventKind::Read
                | EventKind::Write
                | EventKind::Spawn
                | EventKind::AtomicBegin
                | EventKind::AtomicEnd
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Read => "READ",
            EventKind::Write => "WRITE",
            EventKind::Assume => "ASSUME",
            EventKind::Assert => "ASSERT",
            EventKind::Location => "LOCATION",
            EventKind::Spawn => "SPAWN",
            EventKind::FunctionEntry => "FUNCTION-ENTRY",
            EventKind::FunctionExit => "FUNCTION-EXIT",
            EventKind::AtomicBegin => "ATOMIC-BEGIN",
            EventKind::AtomicEnd => "ATOMIC-END",
            EventKind::Input => "INPUT",
            EventKind::Output => "OUTPUT",
            EventKind::MemoryBarrier => "MEMORY-BARRIER",
        };
        write!(f, "{name}")
    }
}

/// One step of the symbolic trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub thread_id: ThreadId,
    /// The event has an effect only in solutions where the guard holds.
    pub guard: Term,
    /// Location touched (READ/WRITE only).
    pub address: Option<Term>,
    /// Value read or written (READ/WRITE only).
    pub value: Option<Term>,
    /// Position in the global trace; strictly increasing.
    pub sequence_number: u64,
}

impl Event {
    /// An event without memory operands and an unconditional guard.
    pub fn new(kind: EventKind, thread_id: ThreadId, sequence_number: u64) -> Self {
        Self {
            kind,
            thread_id,
            guard: Term::BoolLit(true),
            address: None,
            value: None,
            sequence_number,
        }
    }

    pub fn read(thread_id: ThreadId, sequence_number: u64, address: Term, value: Term) -> Self {
        Self::new(EventKind::Read, thread_id, sequence_number).with_access(address, value)
    }

    pub fn write(thread_id: ThreadId, sequence_number: u64, address: Term, value: Term) -> Self {
        Self::new(EventKind::Write, thread_id, sequence_number).with_access(address, value)
    }

    pub fn spawn(thread_id: ThreadId, sequence_number: u64) -> Self {
        Self::new(EventKind::Spawn, thread_id, sequence_number)
    }

    pub fn atomic_begin(thread_id: ThreadId, sequence_number: u64) -> Self {
        Self::new(EventKind::AtomicBegin, thread_id, sequence_number)
    }

    pub fn atomic_end(thread_id: ThreadId, sequence_number: u64) -> Self {
        Self::new(EventKind::AtomicEnd, thread_id, sequence_number)
    }

    pub fn with_guard(mut self, guard: Term) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_access(mut self, address: Term, value: Term) -> Self {
        self.address = Some(address);
        self.value = Some(value);
        self
    }

    pub fn is_shared_read(&self) -> bool {
        self.kind.is_shared_read()
    }

    pub fn is_shared_write(&self) -> bool {
        self.kind.is_shared_write()
    }

    pub fn is_spawn(&self) -> bool {
        self.kind.is_spawn()
    }

    pub fn is_memory_barrier(&self) -> bool {
        self.kind.is_memory_barrier()
    }

    pub fn is_ordering_relevant(&self) -> bool {
        self.kind.is_ordering_relevant()
    }
}
