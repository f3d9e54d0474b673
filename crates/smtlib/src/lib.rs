//! # symex-mm-smtlib
//!
//! SMT-LIB2 abstract syntax shared by the memory-model encoder.
//!
//! Guards, addresses and values recorded by symbolic execution are [`Term`]s,
//! and so is every constraint the encoder emits. Every type renders as
//! SMT-LIB2 text through `Display`; a [`Script`] prints one command per line.

pub mod command;
pub mod script;
pub mod sort;
pub mod term;

pub use command::Command;
pub use script::Script;
pub use sort::Sort;
pub use term::Term;
