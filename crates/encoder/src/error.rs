//! Errors reported while building the partial order or encoding a trace.
//!
//! Every error is fatal for the whole trace: there is no safe partial
//! constraint set, so callers must fix the trace upstream.

use crate::event::{EventId, EventKind, ThreadId};

/// A malformed trace or an event the selected memory model cannot constrain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Sequence numbers must be strictly increasing in trace order.
    #[error("event {event}: sequence number {sequence_number} does not follow {previous}")]
    NonMonotonicSequence {
        event: EventId,
        sequence_number: u64,
        previous: u64,
    },

    /// A thread id appeared before the SPAWN event that creates it.
    #[error("event {event}: thread {thread} is used before it is spawned")]
    ThreadBeforeSpawn { event: EventId, thread: ThreadId },

    /// ATOMIC-END without an open ATOMIC-BEGIN in the same thread.
    #[error("event {event}: atomic end in thread {thread} without a matching atomic begin")]
    UnmatchedAtomicEnd { event: EventId, thread: ThreadId },

    /// ATOMIC-BEGIN while a section of the same thread is still open.
    #[error("event {event}: nested atomic begin in thread {thread} (section opened at event {open})")]
    NestedAtomicSection {
        event: EventId,
        thread: ThreadId,
        open: EventId,
    },

    /// The trace ended while an atomic section was still open.
    #[error("event {begin}: atomic section in thread {thread} is never closed")]
    UnclosedAtomicSection { begin: EventId, thread: ThreadId },

    /// READ/WRITE without its address or value.
    #[error("event {event}: {kind} carries no {operand}")]
    MissingOperand {
        event: EventId,
        kind: EventKind,
        operand: &'static str,
    },

    /// A correctness-sensitive event the active memory model cannot constrain.
    #[error("event {event}: memory model {model} cannot constrain {kind} events")]
    UnsupportedEvent {
        event: EventId,
        kind: EventKind,
        model: &'static str,
    },
}

impl EncodeError {
    /// Whether the error describes an ill-formed trace (as opposed to a
    /// trace the selected model does not handle).
    pub fn is_malformed_trace(&self) -> bool {
        !matches!(self, EncodeError::UnsupportedEvent { .. })
    }
}
