/*!
An AST-level Boolean formula, used only by the non-core "simple BMC" debug path: the core
interpolation engine works directly on CNF via [`crate::encode`] and never builds one of these.

Kept as a single recursive tagged enum rather than a small class hierarchy; the four named
helpers (`invert`, `simplify_negations`, `remove_latches`, `tseitin`) are plain functions over it
rather than methods of a base type.
*/

use crate::cnf::ClauseSink;
use crate::sat::Lit;

/// A Boolean formula over opaque atoms (`Var`) and a single latch construct retained for
/// rendering a circuit's gate network without fully unrolling it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Formula {
    True,
    False,
    Var(u32),
    Negate(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    /// A latch's current value `q`, optionally paired with its (still-unremoved) next-state
    /// formula for later unwinding.
    Latch {
        q: u32,
        next: Option<Box<Formula>>,
    },
}

impl Formula {
    pub fn var(v: u32) -> Formula {
        Formula::Var(v)
    }

    pub fn and(a: Formula, b: Formula) -> Formula {
        Formula::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Formula, b: Formula) -> Formula {
        Formula::Or(Box::new(a), Box::new(b))
    }

    pub fn not(a: Formula) -> Formula {
        Formula::Negate(Box::new(a))
    }

    pub fn latch(q: u32, next: Option<Formula>) -> Formula {
        Formula::Latch {
            q,
            next: next.map(Box::new),
        }
    }
}

/// `¬f`, collapsing the obvious cases (`True`/`False`/double negation) instead of piling on a
/// further `Negate` layer.
pub fn invert(f: &Formula) -> Formula {
    match f {
        Formula::True => Formula::False,
        Formula::False => Formula::True,
        Formula::Negate(inner) => (**inner).clone(),
        other => Formula::Negate(Box::new(other.clone())),
    }
}

/// Pushes negations down to the leaves via De Morgan's laws, eliminating double negation along
/// the way.
pub fn simplify_negations(f: &Formula) -> Formula {
    match f {
        Formula::Negate(inner) => match inner.as_ref() {
            Formula::Negate(doubly_inner) => simplify_negations(doubly_inner),
            Formula::True => Formula::False,
            Formula::False => Formula::True,
            Formula::And(a, b) => Formula::Or(
                Box::new(simplify_negations(&invert(a))),
                Box::new(simplify_negations(&invert(b))),
            ),
            Formula::Or(a, b) => Formula::And(
                Box::new(simplify_negations(&invert(a))),
                Box::new(simplify_negations(&invert(b))),
            ),
            other => Formula::Negate(Box::new(simplify_negations(other))),
        },
        Formula::And(a, b) => Formula::And(
            Box::new(simplify_negations(a)),
            Box::new(simplify_negations(b)),
        ),
        Formula::Or(a, b) => Formula::Or(
            Box::new(simplify_negations(a)),
            Box::new(simplify_negations(b)),
        ),
        Formula::Latch { q, next } => Formula::Latch {
            q: *q,
            next: next.as_ref().map(|n| Box::new(simplify_negations(n))),
        },
        other => other.clone(),
    }
}

/// Replaces every `Latch` node with a bare reference to its current value, dropping the
/// next-state child. Used to render a single-cycle snapshot of the circuit rather than an
/// unrolled trace.
pub fn remove_latches(f: &Formula) -> Formula {
    match f {
        Formula::Latch { q, .. } => Formula::Var(*q),
        Formula::Negate(inner) => Formula::Negate(Box::new(remove_latches(inner))),
        Formula::And(a, b) => {
            Formula::And(Box::new(remove_latches(a)), Box::new(remove_latches(b)))
        }
        Formula::Or(a, b) => Formula::Or(Box::new(remove_latches(a)), Box::new(remove_latches(b))),
        other => other.clone(),
    }
}

/// Tseitin-transforms `f` into `sink`, returning a literal equi-satisfiable with `f`. `atom`
/// resolves a `Var`/`Latch` id to the solver literal it denotes at whatever step the caller has
/// in mind.
pub fn tseitin(f: &Formula, sink: &mut impl ClauseSink, atom: &impl Fn(u32) -> Lit) -> Lit {
    match f {
        Formula::True => {
            let t = Lit::new(sink.alloc_var(), false);
            sink.add_unit(t);
            t
        }
        Formula::False => {
            let t = Lit::new(sink.alloc_var(), false);
            sink.add_unit(!t);
            t
        }
        Formula::Var(v) => atom(*v),
        Formula::Latch { q, .. } => atom(*q),
        Formula::Negate(inner) => !tseitin(inner, sink, atom),
        Formula::And(a, b) => {
            let la = tseitin(a, sink, atom);
            let lb = tseitin(b, sink, atom);
            let t = Lit::new(sink.alloc_var(), false);
            sink.add_binary(!t, la);
            sink.add_binary(!t, lb);
            sink.add_ternary(!la, !lb, t);
            t
        }
        Formula::Or(a, b) => {
            let la = tseitin(a, sink, atom);
            let lb = tseitin(b, sink, atom);
            let t = Lit::new(sink.alloc_var(), false);
            sink.add_binary(!la, t);
            sink.add_binary(!lb, t);
            sink.add_ternary(la, lb, !t);
            t
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::{BufferedCnf, SolverSink};
    use crate::sat::{SolveResult, Solver};

    #[test]
    fn invert_collapses_double_negation() {
        let f = Formula::var(1);
        assert_eq!(invert(&invert(&f)), f);
    }

    #[test]
    fn simplify_negations_applies_de_morgan() {
        let f = Formula::not(Formula::and(Formula::var(1), Formula::var(2)));
        let simplified = simplify_negations(&f);
        assert_eq!(
            simplified,
            Formula::or(Formula::not(Formula::var(1)), Formula::not(Formula::var(2)))
        );
    }

    #[test]
    fn remove_latches_drops_the_next_state_child() {
        let f = Formula::latch(7, Some(Formula::var(9)));
        assert_eq!(remove_latches(&f), Formula::var(7));
    }

    #[test]
    fn tseitin_of_and_is_satisfiable_only_when_both_operands_hold() {
        let f = Formula::and(Formula::var(1), Formula::var(2));
        let atom = |v: u32| Lit::new(v, false);

        let mut sat_solver = Solver::new();
        sat_solver.new_var();
        sat_solver.new_var();
        let t = {
            let mut sink = SolverSink::new(&mut sat_solver, true);
            tseitin(&f, &mut sink, &atom)
        };
        sat_solver.add_unit(Lit::new(1, false), true);
        sat_solver.add_unit(Lit::new(2, false), true);
        assert_eq!(sat_solver.solve(&[t]), SolveResult::Satisfiable);

        let mut unsat_solver = Solver::new();
        unsat_solver.new_var();
        unsat_solver.new_var();
        let t2 = {
            let mut sink = SolverSink::new(&mut unsat_solver, true);
            tseitin(&f, &mut sink, &atom)
        };
        unsat_solver.add_unit(Lit::new(1, true), true);
        assert_eq!(unsat_solver.solve(&[t2]), SolveResult::Unsatisfiable);
    }

    #[test]
    fn tseitin_can_target_a_buffered_cnf_too() {
        let f = Formula::or(Formula::var(1), Formula::var(2));
        let atom = |v: u32| Lit::new(v, false);
        let mut buf = BufferedCnf::new();
        let _t = tseitin(&f, &mut buf, &atom);
        assert!(!buf.is_empty());
    }
}
