use std::fmt;

/// An SMT-LIB expression.
///
/// Trace guards, addresses and values arrive as terms, and every emitted
/// ordering or read-from constraint is built from them. Nodes own their
/// children; sharing is by cloning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    BoolLit(bool),
    /// Unbounded integer.
    IntLit(i128),
    /// Value and width in bits. Negative values denote two's complement.
    BitVecLit(i128, u32),
    /// A free symbol: a trace variable or a fresh encoder variable.
    Const(String),

    Not(Box<Term>),
    And(Vec<Term>),
    Or(Vec<Term>),
    Implies(Box<Term>, Box<Term>),
    /// Boolean equivalence, written `=` in SMT-LIB.
    Iff(Box<Term>, Box<Term>),

    Eq(Box<Term>, Box<Term>),
    Distinct(Vec<Term>),
    Ite(Box<Term>, Box<Term>, Box<Term>),

    IntAdd(Box<Term>, Box<Term>),
    IntSub(Box<Term>, Box<Term>),
    IntLt(Box<Term>, Box<Term>),
    IntLe(Box<Term>, Box<Term>),
    IntGt(Box<Term>, Box<Term>),
    IntGe(Box<Term>, Box<Term>),

    BvAdd(Box<Term>, Box<Term>),
    BvULt(Box<Term>, Box<Term>),
    BvULe(Box<Term>, Box<Term>),
    BvSLt(Box<Term>, Box<Term>),
    BvSLe(Box<Term>, Box<Term>),

    /// Array read `(select a i)`.
    Select(Box<Term>, Box<Term>),
    /// Array update `(store a i v)`.
    Store(Box<Term>, Box<Term>, Box<Term>),

    /// Uninterpreted function application; nullary applications print as
    /// a bare symbol.
    App(String, Vec<Term>),
}

#[allow(clippy::should_implement_trait)]
impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Const(name.into())
    }

    pub fn bool(b: bool) -> Self {
        Term::BoolLit(b)
    }

    pub fn int(n: i128) -> Self {
        Term::IntLit(n)
    }

    pub fn not(self) -> Self {
        Term::Not(Box::new(self))
    }

    pub fn and(terms: Vec<Term>) -> Self {
        Term::And(terms)
    }

    pub fn or(terms: Vec<Term>) -> Self {
        Term::Or(terms)
    }

    pub fn implies(self, other: Term) -> Self {
        Term::Implies(Box::new(self), Box::new(other))
    }

    pub fn iff(self, other: Term) -> Self {
        Term::Iff(Box::new(self), Box::new(other))
    }

    /// Exclusive or, expressed as `(not (= a b))`.
    pub fn xor(self, other: Term) -> Self {
        self.iff(other).not()
    }

    pub fn eq(self, other: Term) -> Self {
        Term::Eq(Box::new(self), Box::new(other))
    }

    /// Integer `<`; clock comparisons use this.
    pub fn lt(self, other: Term) -> Self {
        Term::IntLt(Box::new(self), Box::new(other))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Term::BoolLit(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Term::BoolLit(false))
    }

    /// Boolean, integer or bitvector literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Term::BoolLit(_) | Term::IntLit(_) | Term::BitVecLit(_, _)
        )
    }

    /// Compare two literals by the value they denote.
    ///
    /// Bitvector literals are compared modulo their width, so `-1` and
    /// `255` at width 8 are equal. `None` when either side is not a
    /// literal or the two literals have different sorts.
    pub fn literal_eq(&self, other: &Term) -> Option<bool> {
        match (self, other) {
            (Term::BoolLit(a), Term::BoolLit(b)) => Some(a == b),
            (Term::IntLit(a), Term::IntLit(b)) => Some(a == b),
            (Term::BitVecLit(a, wa), Term::BitVecLit(b, wb)) if wa == wb => {
                Some(twos_complement(*a, *wa) == twos_complement(*b, *wb))
            }
            _ => None,
        }
    }

    /// Head symbol of an operator node; `None` for literals and constants.
    pub fn symbol(&self) -> Option<&str> {
        let symbol: &str = match self {
            Term::BoolLit(_) | Term::IntLit(_) | Term::BitVecLit(_, _) | Term::Const(_) => {
                return None;
            }
            Term::Not(_) => "not",
            Term::And(_) => "and",
            Term::Or(_) => "or",
            Term::Implies(_, _) => "=>",
            Term::Iff(_, _) | Term::Eq(_, _) => "=",
            Term::Distinct(_) => "distinct",
            Term::Ite(_, _, _) => "ite",
            Term::IntAdd(_, _) => "+",
            Term::IntSub(_, _) => "-",
            Term::IntLt(_, _) => "<",
            Term::IntLe(_, _) => "<=",
            Term::IntGt(_, _) => ">",
            Term::IntGe(_, _) => ">=",
            Term::BvAdd(_, _) => "bvadd",
            Term::BvULt(_, _) => "bvult",
            Term::BvULe(_, _) => "bvule",
            Term::BvSLt(_, _) => "bvslt",
            Term::BvSLe(_, _) => "bvsle",
            Term::Select(_, _) => "select",
            Term::Store(_, _, _) => "store",
            Term::App(name, _) => name,
        };
        Some(symbol)
    }

    /// Direct subterms in argument order.
    pub fn operands(&self) -> Vec<&Term> {
        match self {
            Term::BoolLit(_) | Term::IntLit(_) | Term::BitVecLit(_, _) | Term::Const(_) => {
                Vec::new()
            }
            Term::Not(a) => vec![&**a],
            Term::And(ts) | Term::Or(ts) | Term::Distinct(ts) | Term::App(_, ts) => {
                ts.iter().collect()
            }
            Term::Implies(a, b)
            | Term::Iff(a, b)
            | Term::Eq(a, b)
            | Term::IntAdd(a, b)
            | Term::IntSub(a, b)
            | Term::IntLt(a, b)
            | Term::IntLe(a, b)
            | Term::IntGt(a, b)
            | Term::IntGe(a, b)
            | Term::BvAdd(a, b)
            | Term::BvULt(a, b)
            | Term::BvULe(a, b)
            | Term::BvSLt(a, b)
            | Term::BvSLe(a, b)
            | Term::Select(a, b) => vec![&**a, &**b],
            Term::Ite(a, b, c) | Term::Store(a, b, c) => vec![&**a, &**b, &**c],
        }
    }
}

/// Unsigned representation of a bitvector literal of the given width.
pub fn twos_complement(value: i128, width: u32) -> u128 {
    let mask = if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    };
    (value as u128) & mask
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::BoolLit(b) => write!(f, "{b}"),
            Term::IntLit(n) if *n < 0 => write!(f, "(- {})", n.unsigned_abs()),
            Term::IntLit(n) => write!(f, "{n}"),
            Term::BitVecLit(value, width) => {
                write!(f, "(_ bv{} {width})", twos_complement(*value, *width))
            }
            Term::Const(name) => f.write_str(name),
            // Units of the n-ary connectives.
            Term::And(ts) if ts.is_empty() => f.write_str("true"),
            Term::Or(ts) if ts.is_empty() => f.write_str("false"),
            Term::And(ts) | Term::Or(ts) if ts.len() == 1 => write!(f, "{}", ts[0]),
            Term::App(name, args) if args.is_empty() => f.write_str(name),
            _ => {
                let Some(symbol) = self.symbol() else {
                    return Ok(());
                };
                write!(f, "({symbol}")?;
                for operand in self.operands() {
                    write!(f, " {operand}")?;
                }
                f.write_str(")")
            }
        }
    }
}
