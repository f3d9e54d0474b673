use std::fmt;

/// Sort of a declared symbol.
///
/// The encoder itself only declares `Bool` selection variables and `Int`
/// clocks; the other sorts appear in addresses and values produced by
/// symbolic execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sort {
    Bool,
    Int,
    /// `(_ BitVec n)`.
    BitVec(u32),
    /// `(Array index element)`.
    Array(Box<Sort>, Box<Sort>),
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => f.write_str("Bool"),
            Sort::Int => f.write_str("Int"),
            Sort::BitVec(width) => write!(f, "(_ BitVec {width})"),
            Sort::Array(index, element) => write!(f, "(Array {index} {element})"),
        }
    }
}
