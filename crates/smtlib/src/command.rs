use std::fmt;

use crate::sort::Sort;
use crate::term::Term;

/// One top-level SMT-LIB command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetLogic(String),
    /// Option name without the leading colon, and its value.
    SetOption(String, String),
    DeclareConst(String, Sort),
    /// Name, parameter sorts, result sort.
    DeclareFun(String, Vec<Sort>, Sort),
    /// Name, parameters, result sort, body.
    DefineFun(String, Vec<(String, Sort)>, Sort, Term),
    Assert(Term),
    CheckSat,
    GetModel,
    Push(u32),
    Pop(u32),
    /// Rendered as a `;;` line.
    Comment(String),
    Exit,
}

impl Command {
    /// Name introduced by a declaration or definition, if any.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Command::DeclareConst(name, _)
            | Command::DeclareFun(name, _, _)
            | Command::DefineFun(name, _, _, _) => Some(name),
            _ => None,
        }
    }
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetLogic(logic) => write!(f, "(set-logic {logic})"),
            Command::SetOption(key, value) => write!(f, "(set-option :{key} {value})"),
            Command::DeclareConst(name, sort) => write!(f, "(declare-const {name} {sort})"),
            Command::DeclareFun(name, params, result) => {
                write!(f, "(declare-fun {name} ({}) {result})", join(params))
            }
            Command::DefineFun(name, params, result, body) => {
                let params = join(params.iter().map(|(p, sort)| format!("({p} {sort})")));
                write!(f, "(define-fun {name} ({params}) {result} {body})")
            }
            Command::Assert(term) => write!(f, "(assert {term})"),
            Command::CheckSat => f.write_str("(check-sat)"),
            Command::GetModel => f.write_str("(get-model)"),
            Command::Push(levels) => write!(f, "(push {levels})"),
            Command::Pop(levels) => write!(f, "(pop {levels})"),
            Command::Comment(text) => write!(f, ";; {text}"),
            Command::Exit => f.write_str("(exit)"),
        }
    }
}
