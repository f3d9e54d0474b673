//! Naming conventions for the fresh solver variables:
//! - `clk_e`: position of event e in the chosen interleaving (Int)
//! - `rf_w_r`: read r takes its value from write w (Bool)
//! - `ws_a_b`: write a is serialized before write b (Bool)

use symex_mm_smtlib::command::Command;
use symex_mm_smtlib::sort::Sort;
use symex_mm_smtlib::term::Term;

use crate::event::EventId;

pub fn clock_var(event: EventId) -> String {
    format!("clk_{event}")
}

pub fn rf_var(write: EventId, read: EventId) -> String {
    format!("rf_{write}_{read}")
}

pub fn ws_var(first: EventId, second: EventId) -> String {
    format!("ws_{first}_{second}")
}

pub fn clock(event: EventId) -> Term {
    Term::Const(clock_var(event))
}

/// `selected(w, r)`.
pub fn selected(write: EventId, read: EventId) -> Term {
    Term::Const(rf_var(write, read))
}

/// `serialized_before(a, b)` as a variable.
pub fn serialized(first: EventId, second: EventId) -> Term {
    Term::Const(ws_var(first, second))
}

pub fn declare_bool(name: String) -> Command {
    Command::DeclareFun(name, vec![], Sort::Bool)
}

pub fn declare_int(name: String) -> Command {
    Command::DeclareFun(name, vec![], Sort::Int)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable() {
        assert_eq!(clock_var(4), "clk_4");
        assert_eq!(rf_var(1, 7), "rf_1_7");
        assert_eq!(ws_var(2, 3), "ws_2_3");
    }

    #[test]
    fn declarations_have_expected_sorts() {
        let cmd = declare_int(clock_var(0));
        assert!(matches!(cmd, Command::DeclareFun(name, params, Sort::Int)
            if name == "clk_0" && params.is_empty()));
        let cmd = declare_bool(rf_var(0, 1));
        assert!(matches!(cmd, Command::DeclareFun(name, _, Sort::Bool) if name == "rf_0_1"));
    }
}
