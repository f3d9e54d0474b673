use std::fmt;

use crate::command::Command;
use crate::term::Term;

/// Commands in the order they are sent to a solver. Commands are only
/// ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }

    pub fn extend(&mut self, cmds: impl IntoIterator<Item = Command>) {
        self.commands.extend(cmds);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Asserted terms, in script order.
    pub fn assertions(&self) -> impl Iterator<Item = &Term> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Assert(term) => Some(term),
            _ => None,
        })
    }

    /// Whether the script declares or defines `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.commands
            .iter()
            .any(|cmd| cmd.declared_name() == Some(name))
    }
}

impl FromIterator<Command> for Script {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

/// One command per line, no trailing newline.
impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands = self.commands.iter();
        if let Some(first) = commands.next() {
            write!(f, "{first}")?;
        }
        for cmd in commands {
            write!(f, "\n{cmd}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Sort;

    fn clock_script() -> Script {
        [
            Command::SetLogic("ALL".to_string()),
            Command::DeclareFun("clk_0".to_string(), vec![], Sort::Int),
            Command::DeclareFun("clk_1".to_string(), vec![], Sort::Int),
            Command::Comment("po @ event 1".to_string()),
            Command::Assert(Term::var("clk_0").lt(Term::var("clk_1"))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn new_script_is_empty() {
        let script = Script::new();
        assert!(script.is_empty());
        assert_eq!(script.assertions().count(), 0);
        assert_eq!(script.to_string(), "");
    }

    #[test]
    fn push_and_extend_preserve_order() {
        let mut script = Script::new();
        script.push(Command::SetLogic("QF_LIA".to_string()));
        script.extend([Command::CheckSat, Command::Exit]);
        assert_eq!(script.len(), 3);
        assert_eq!(script.commands()[2], Command::Exit);
    }

    #[test]
    fn assertions_skip_declarations_and_comments() {
        let script = clock_script();
        let asserted: Vec<&Term> = script.assertions().collect();
        assert_eq!(asserted.len(), 1);
        assert!(matches!(asserted[0], Term::IntLt(_, _)));
    }

    #[test]
    fn declares_finds_declared_names() {
        let script = clock_script();
        assert!(script.declares("clk_0"));
        assert!(!script.declares("clk_2"));
    }

    #[test]
    fn renders_one_command_per_line() {
        let expected = "\
(set-logic ALL)
(declare-fun clk_0 () Int)
(declare-fun clk_1 () Int)
;; po @ event 1
(assert (< clk_0 clk_1))";
        assert_eq!(clock_script().to_string(), expected);
    }
}
