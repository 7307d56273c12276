/*!
Variables and literals for the embedded SAT engine.

Variables are contiguous `u32`s starting at `1` (`0` is never a valid variable, mirroring the
DIMACS convention used by the rest of the ecosystem this crate belongs to). A literal is a signed
wrapper around a variable: positive for the non-negated occurrence, negative for the negated one.
*/

use std::fmt;
use std::ops::Not;

/// A solver variable. `1`-based; `0` is never allocated.
pub type Var = u32;

/// A literal: a variable paired with a polarity, represented as a signed integer in the same
/// convention as DIMACS (`v` for the positive occurrence of variable `v`, `-v` for the negated
/// occurrence).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(i32);

impl Lit {
    /// Constructs the literal for `var` with the given polarity (`negated = true` for `¬var`).
    ///
    /// # Panics
    /// Panics if `var` is `0`.
    pub fn new(var: Var, negated: bool) -> Lit {
        assert!(var != 0, "variable 0 is never valid");
        let signed = var as i32;
        Lit(if negated { -signed } else { signed })
    }

    /// The variable this literal is over.
    pub fn var(self) -> Var {
        self.0.unsigned_abs()
    }

    /// Whether this is the negated occurrence.
    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    /// A dense index suitable for indexing per-literal arrays: `2*(var-1) + negated`.
    pub fn code(self) -> usize {
        let v = (self.var() - 1) as usize;
        2 * v + usize::from(self.is_negated())
    }

    /// The literal's DIMACS-style signed integer representation.
    pub fn as_dimacs(self) -> i32 {
        self.0
    }
}

impl Not for Lit {
    type Output = Lit;
    fn not(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_round_trips() {
        let l = Lit::new(5, false);
        assert_eq!(!!l, l);
        assert_eq!(!l, Lit::new(5, true));
        assert_eq!(l.var(), 5);
        assert!(!l.is_negated());
        assert!((!l).is_negated());
    }

    #[test]
    fn code_is_dense_and_distinct() {
        let codes: Vec<usize> = (1..=4u32)
            .flat_map(|v| [Lit::new(v, false).code(), Lit::new(v, true).code()])
            .collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
