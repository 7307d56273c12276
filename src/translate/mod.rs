/*!
The variable translator: the bijection between `(AIGER literal, time step)` pairs and
contiguous SAT solver variables.

One solver variable, `RESERVED`, is set aside to encode the two constants: its positive occurrence
is `true_lit()`, its negated occurrence is `false_lit()`. Every other variable is carved out of a
single contiguous block starting at `FIRST`, indexed by `(v - 1) + step * num_vars`, so that the
step of a variable can be recovered by pure arithmetic rather than a lookup table.
*/

use crate::sat::{Lit, Solver, Var};
use crate::types::err::TranslationError;

/// The first non-reserved variable. Fixed by the translator's contract: `first == 2` after reset.
pub const FIRST: Var = 2;

/// The variable whose polarity encodes the boolean constants.
pub const RESERVED: Var = 1;

/// Translates between AIGER literals at a time step and solver variables.
#[derive(Clone, Debug, Default)]
pub struct VarTranslator {
    num_vars: Option<usize>,
    k: usize,
}

impl VarTranslator {
    pub fn new() -> VarTranslator {
        VarTranslator::default()
    }

    /// Reserves solver variables `[FIRST, FIRST + num_vars*(k+2))`, allocating them on `solver`
    /// if they don't already exist.
    ///
    /// # Errors
    /// Returns [`TranslationError::InconsistentReset`] if this translator was already reset with
    /// a different `num_vars`. Resetting with a different `k` on the same `num_vars` is allowed
    /// (a wider block is simply allocated).
    pub fn reset(
        &mut self,
        solver: &mut Solver,
        num_vars: usize,
        k: usize,
    ) -> Result<(), TranslationError> {
        if let Some(existing) = self.num_vars {
            if existing != num_vars {
                return Err(TranslationError::InconsistentReset {
                    first: existing,
                    second: num_vars,
                });
            }
        }
        self.num_vars = Some(num_vars);
        self.k = k;

        let exclusive_bound = FIRST as usize + num_vars * (k + 2);
        solver.ensure_vars_up_to((exclusive_bound - 1) as Var);
        Ok(())
    }

    fn num_vars(&self) -> usize {
        self.num_vars
            .expect("VarTranslator::reset must be called before use")
    }

    /// The bound `k` this translator was last reset with.
    pub fn bound(&self) -> usize {
        self.k
    }

    /// Translates an AIGER literal at `step` into a solver literal. Constants `0`/`1` map to
    /// [`VarTranslator::false_lit`]/[`VarTranslator::true_lit`] regardless of `step`.
    pub fn to_lit(&self, aiger_lit: u32, step: usize) -> Lit {
        if aiger_lit == 0 {
            return self.false_lit();
        }
        if aiger_lit == 1 {
            return self.true_lit();
        }
        let v = (aiger_lit / 2) as usize;
        let negated = aiger_lit % 2 == 1;
        let var = FIRST + (v as Var - 1) + (step as Var) * self.num_vars() as Var;
        Lit::new(var, negated)
    }

    pub fn false_lit(&self) -> Lit {
        Lit::new(RESERVED, true)
    }

    pub fn true_lit(&self) -> Lit {
        Lit::new(RESERVED, false)
    }

    /// The time step a (non-reserved) literal was produced at. The reserved constant's step is
    /// defined as `0`.
    pub fn time_index(&self, lit: Lit) -> usize {
        if lit.var() == RESERVED {
            return 0;
        }
        ((lit.var() - FIRST) / self.num_vars() as Var) as usize
    }

    /// Produces the literal for the same AIGER variable `delta` steps away from `lit`.
    ///
    /// # Errors
    /// Returns [`TranslationError::ConstantNotShiftable`] for the reserved constant literal.
    pub fn time_shift(&self, lit: Lit, delta: i64) -> Result<Lit, TranslationError> {
        if lit.var() == RESERVED {
            return Err(TranslationError::ConstantNotShiftable);
        }
        let num_vars = self.num_vars() as i64;
        let offset = lit.var() as i64 - FIRST as i64;
        let within_step = offset % num_vars;
        let step = offset / num_vars;
        let new_var = FIRST as i64 + within_step + (step + delta) * num_vars;
        Ok(Lit::new(new_var as Var, lit.is_negated()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_constants_are_complementary() {
        let t = VarTranslator::new();
        assert_eq!(t.true_lit(), !t.false_lit());
    }

    #[test]
    fn bijection_holds_across_steps_and_variables() {
        let mut solver = Solver::new();
        let mut t = VarTranslator::new();
        t.reset(&mut solver, 3, 4).unwrap();

        let mut seen = std::collections::HashSet::new();
        for step in 0..=5usize {
            for v in 1..=3u32 {
                let lit = t.to_lit(2 * v, step);
                assert_eq!(t.time_index(lit), step);
                assert_eq!(t.to_lit(2 * v + 1, step), !lit);
                assert!(seen.insert(lit.var()), "variable reused across (v, step) pairs");
            }
        }
    }

    #[test]
    fn time_shift_round_trips() {
        let mut solver = Solver::new();
        let mut t = VarTranslator::new();
        t.reset(&mut solver, 2, 3).unwrap();

        let lit = t.to_lit(4, 2);
        let shifted = t.time_shift(lit, 1).unwrap();
        assert_eq!(t.time_index(shifted), 3);
        let back = t.time_shift(shifted, -1).unwrap();
        assert_eq!(back, lit);
    }

    #[test]
    fn time_shift_rejects_the_reserved_constant() {
        let mut solver = Solver::new();
        let mut t = VarTranslator::new();
        t.reset(&mut solver, 1, 1).unwrap();
        assert!(t.time_shift(t.true_lit(), 1).is_err());
    }

    #[test]
    fn resetting_with_a_different_num_vars_is_rejected() {
        let mut solver = Solver::new();
        let mut t = VarTranslator::new();
        t.reset(&mut solver, 2, 1).unwrap();
        assert!(t.reset(&mut solver, 3, 1).is_err());
    }
}
