//! Static address comparison.
//!
//! Addresses are symbolic, so two of them are usually only conditionally
//! equal. The static check decides the trivial cases and leaves everything
//! else to the solver as an `address_equal` term.

use symex_mm_smtlib::term::Term;

/// Outcome of comparing two symbolic addresses without a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alias {
    /// Syntactically identical, or literals denoting the same value.
    Must,
    /// Two literals denoting different values.
    Never,
    /// Decided by the solver.
    May,
}

/// Compare two addresses statically.
pub fn may_alias(a: &Term, b: &Term) -> Alias {
    if a == b {
        return Alias::Must;
    }
    match a.literal_eq(b) {
        Some(true) => Alias::Must,
        Some(false) => Alias::Never,
        None => Alias::May,
    }
}

/// The condition under which both addresses denote the same location.
pub fn address_equal(a: &Term, b: &Term) -> Term {
    match may_alias(a, b) {
        Alias::Must => Term::BoolLit(true),
        Alias::Never => Term::BoolLit(false),
        Alias::May => Term::Eq(Box::new(a.clone()), Box::new(b.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_addresses_must_alias() {
        assert_eq!(may_alias(&Term::var("&x"), &Term::var("&x")), Alias::Must);
        assert_eq!(address_equal(&Term::int(8), &Term::int(8)), Term::BoolLit(true));
    }

    #[test]
    fn distinct_literals_never_alias() {
        assert_eq!(may_alias(&Term::int(8), &Term::int(16)), Alias::Never);
        assert_eq!(
            may_alias(&Term::BitVecLit(8, 64), &Term::BitVecLit(9, 64)),
            Alias::Never
        );
        assert_eq!(address_equal(&Term::int(1), &Term::int(2)), Term::BoolLit(false));
    }

    #[test]
    fn bitvector_addresses_compare_by_value() {
        let wrapped = Term::BitVecLit(-1, 8);
        let unsigned = Term::BitVecLit(255, 8);
        assert_eq!(may_alias(&wrapped, &unsigned), Alias::Must);
        assert_eq!(address_equal(&unsigned, &wrapped), Term::BoolLit(true));
        assert_eq!(
            may_alias(&Term::BitVecLit(-1, 8), &Term::BitVecLit(-1, 16)),
            Alias::May
        );
    }

    #[test]
    fn symbolic_addresses_are_deferred() {
        let p = Term::var("p");
        let lit = Term::int(8);
        assert_eq!(may_alias(&p, &lit), Alias::May);
        assert_eq!(
            address_equal(&p, &lit),
            Term::Eq(Box::new(p.clone()), Box::new(lit))
        );
        assert_eq!(may_alias(&Term::var("p"), &Term::var("q")), Alias::May);
    }
}
