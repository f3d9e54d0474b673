//! Formula simplification for emitted constraints.
//!
//! Most ordering facts are decided statically for same-thread and
//! spawn-related pairs, so the encoders produce many `true`/`false`
//! subterms. Folding them keeps the constraint set small and lets the
//! constraint set drop assertions that are trivially satisfied.
//!
//! - Constant folding of Boolean connectives
//! - Double negation elimination
//! - Equality of syntactically identical terms and of literals
//! - ITE simplification with constant conditions

use symex_mm_smtlib::term::Term;

/// Fold an n-ary connective. `absorbing` is the literal that decides the
/// whole connective (`false` for AND, `true` for OR).
fn fold_nary(terms: &[Term], absorbing: bool, rebuild: fn(Vec<Term>) -> Term) -> Term {
    let mut kept = Vec::with_capacity(terms.len());
    for t in terms {
        match simplify_term(t) {
            Term::BoolLit(b) if b == absorbing => return Term::BoolLit(absorbing),
            Term::BoolLit(_) => {}
            other => {
                if !kept.contains(&other) {
                    kept.push(other);
                }
            }
        }
    }
    match kept.len() {
        0 => Term::BoolLit(!absorbing),
        1 => kept.pop().unwrap_or(Term::BoolLit(!absorbing)),
        _ => rebuild(kept),
    }
}

/// Simplify a single term recursively. The result is equivalent to the input.
pub fn simplify_term(term: &Term) -> Term {
    match term {
        Term::BoolLit(_) | Term::IntLit(_) | Term::BitVecLit(_, _) | Term::Const(_) => {
            term.clone()
        }

        Term::Not(inner) => match simplify_term(inner) {
            Term::BoolLit(b) => Term::BoolLit(!b),
            Term::Not(inner2) => *inner2,
            other => Term::Not(Box::new(other)),
        },

        Term::And(terms) => fold_nary(terms, false, Term::And),
        Term::Or(terms) => fold_nary(terms, true, Term::Or),

        Term::Implies(a, b) => {
            let a_simp = simplify_term(a);
            let b_simp = simplify_term(b);
            match (&a_simp, &b_simp) {
                (Term::BoolLit(true), _) => b_simp,
                (Term::BoolLit(false), _) | (_, Term::BoolLit(true)) => Term::BoolLit(true),
                (_, Term::BoolLit(false)) => simplify_term(&Term::Not(Box::new(a_simp))),
                _ if a_simp == b_simp => Term::BoolLit(true),
                _ => Term::Implies(Box::new(a_simp), Box::new(b_simp)),
            }
        }

        Term::Iff(a, b) => {
            let a_simp = simplify_term(a);
            let b_simp = simplify_term(b);
            match (&a_simp, &b_simp) {
                (Term::BoolLit(true), _) => b_simp,
                (_, Term::BoolLit(true)) => a_simp,
                (Term::BoolLit(false), _) => simplify_term(&Term::Not(Box::new(b_simp))),
                (_, Term::BoolLit(false)) => simplify_term(&Term::Not(Box::new(a_simp))),
                _ if a_simp == b_simp => Term::BoolLit(true),
                _ => Term::Iff(Box::new(a_simp), Box::new(b_simp)),
            }
        }

        Term::Eq(a, b) => {
            let a_simp = simplify_term(a);
            let b_simp = simplify_term(b);
            if a_simp == b_simp {
                return Term::BoolLit(true);
            }
            match a_simp.literal_eq(&b_simp) {
                Some(equal) => Term::BoolLit(equal),
                None => Term::Eq(Box::new(a_simp), Box::new(b_simp)),
            }
        }

        Term::Distinct(terms) => Term::Distinct(terms.iter().map(simplify_term).collect()),

        Term::Ite(cond, then_branch, else_branch) => match simplify_term(cond) {
            Term::BoolLit(true) => simplify_term(then_branch),
            Term::BoolLit(false) => simplify_term(else_branch),
            cond_simp => Term::Ite(
                Box::new(cond_simp),
                Box::new(simplify_term(then_branch)),
                Box::new(simplify_term(else_branch)),
            ),
        },

        Term::IntLt(a, b) => {
            let a_simp = simplify_term(a);
            let b_simp = simplify_term(b);
            match (&a_simp, &b_simp) {
                (Term::IntLit(v1), Term::IntLit(v2)) => Term::BoolLit(v1 < v2),
                _ if a_simp == b_simp => Term::BoolLit(false),
                _ => Term::IntLt(Box::new(a_simp), Box::new(b_simp)),
            }
        }
        Term::IntLe(a, b) => {
            let a_simp = simplify_term(a);
            let b_simp = simplify_term(b);
            match (&a_simp, &b_simp) {
                (Term::IntLit(v1), Term::IntLit(v2)) => Term::BoolLit(v1 <= v2),
                _ if a_simp == b_simp => Term::BoolLit(true),
                _ => Term::IntLe(Box::new(a_simp), Box::new(b_simp)),
            }
        }

        // Remaining operators only recurse.
        Term::IntAdd(a, b) => Term::IntAdd(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::IntSub(a, b) => Term::IntSub(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::IntGt(a, b) => Term::IntGt(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::IntGe(a, b) => Term::IntGe(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::BvAdd(a, b) => Term::BvAdd(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::BvULt(a, b) => Term::BvULt(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::BvULe(a, b) => Term::BvULe(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::BvSLt(a, b) => Term::BvSLt(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::BvSLe(a, b) => Term::BvSLe(Box::new(simplify_term(a)), Box::new(simplify_term(b))),
        Term::Select(a, i) => Term::Select(Box::new(simplify_term(a)), Box::new(simplify_term(i))),
        Term::Store(a, i, v) => Term::Store(
            Box::new(simplify_term(a)),
            Box::new(simplify_term(i)),
            Box::new(simplify_term(v)),
        ),
        Term::App(name, args) => Term::App(name.clone(), args.iter().map(simplify_term).collect()),
    }
}

/// Whether a guard can never hold, judged without a solver.
pub fn is_statically_false(term: &Term) -> bool {
    simplify_term(term).is_false()
}
