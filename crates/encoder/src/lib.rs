//! # symex-mm-encoder
//!
//! Memory-model constraints for the concurrent traces of a bounded model
//! checker.
//!
//! Symbolic execution records a guarded trace of [`Event`]s. This crate
//! builds a [`PartialOrder`] over that trace once and lets a
//! [`MemoryModel`] emit the ordering and value constraints that restrict
//! solver solutions to executions the model permits. Only sequential
//! consistency is implemented.
//!
//! Encoding is a pure function of the trace: it never solves and never
//! inspects a solution. Malformed traces are reported as [`EncodeError`].
//!
//! ```ignore
//! let set = symex_mm_encoder::encode(&trace, &EncoderConfig::default())?;
//! println!("{}", set.to_script("ALL", true));
//! ```

pub mod alias;
pub mod config;
pub mod constraint;
pub mod error;
pub mod event;
pub mod memory_model;
pub mod partial_order;
pub mod read_from;
pub mod sc;
pub mod simplify;
pub mod summary;
pub mod variables;
pub mod write_serialization;

pub use config::EncoderConfig;
pub use constraint::{Constraint, ConstraintKind, ConstraintSet};
pub use error::EncodeError;
pub use event::{Event, EventId, EventKind, ThreadId};
pub use memory_model::{MemoryModel, MemoryModelKind};
pub use partial_order::{PartialOrder, Precedence};
pub use sc::SequentialConsistency;
pub use summary::EncodingSummary;

use symex_mm_smtlib::script::Script;

/// Encode `trace` under the configured memory model.
pub fn encode(trace: &[Event], config: &EncoderConfig) -> Result<ConstraintSet, EncodeError> {
    let model = config.model.model();
    tracing::info!(
        model = model.name(),
        events = trace.len(),
        "Encoding memory-model constraints"
    );

    let mut set = model.apply(trace)?;
    if config.simplify {
        set = set.simplified();
    }

    tracing::info!(
        model = model.name(),
        declarations = set.declarations().len(),
        constraints = set.len(),
        unconstrained_reads = set.unconstrained_reads().len(),
        "Encoded memory-model constraints"
    );
    Ok(set)
}

/// Encode `trace` and render the result as an SMT-LIB script.
pub fn encode_to_script(trace: &[Event], config: &EncoderConfig) -> Result<Script, EncodeError> {
    let set = encode(trace, config)?;
    Ok(set.to_script(&config.logic, config.annotate))
}

/// Encode `trace` and summarise the result.
pub fn summarize(trace: &[Event], config: &EncoderConfig) -> Result<EncodingSummary, EncodeError> {
    let set = encode(trace, config)?;
    Ok(EncodingSummary::new(config.model.name(), trace, &set))
}
