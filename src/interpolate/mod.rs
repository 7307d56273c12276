/*!
McMillan interpolant construction: walks a completed [`ProofDag`] and produces a CNF,
written into any [`ClauseSink`], whose root literal is a Craig interpolant for the `A`/`B` split
recorded on the proof's root vertices.

Implemented as a [`ProofTraverser`] so it rides [`ProofDag::replay`]'s existing insertion-order
walk; `literals` is indexed by vertex ID and memoizes each vertex's literal, since a chain can
only reference a strictly smaller ID.
*/

use crate::cnf::{BufferedCnf, ClauseSink};
use crate::sat::{Lit, ProofDag, ProofTraverser, VertexId};
use crate::types::err::SolverError;

/// Computes the Craig interpolant of the UNSAT proof `proof`, for the `A`/`B` partition recorded
/// on its root vertices, emitting its defining clauses into `sink`.
///
/// `vars_a`/`vars_b` must be the variable-recording [`BufferedCnf`]s (or equivalent) used to build
/// the `A`/`B` formulas that produced `proof`, so that `global(lit)` can be answered in O(1).
///
/// `tolerate_deleted` controls what happens if the traversal reaches a vertex marked deleted: when
/// `true`, its interpolant literal is taken as `false_lit` and a warning is logged; when `false`,
/// the traversal still completes but this function returns
/// [`SolverError::DeletedProofVertex`] instead of a literal.
///
/// Returns the literal that is true in a model of `sink` exactly when the interpolant holds.
pub fn interpolate<S: ClauseSink>(
    proof: &ProofDag,
    vars_a: &BufferedCnf,
    vars_b: &BufferedCnf,
    sink: &mut S,
    false_lit: Lit,
    true_lit: Lit,
    tolerate_deleted: bool,
) -> Result<Lit, SolverError> {
    let mut builder = InterpolantBuilder {
        sink,
        vars_a,
        vars_b,
        literals: Vec::with_capacity(proof.len()),
        false_lit,
        true_lit,
        tolerate_deleted,
        deleted_error: None,
    };
    proof.replay(&mut builder);
    if let Some(e) = builder.deleted_error {
        return Err(e);
    }
    Ok(*builder
        .literals
        .last()
        .expect("a completed refutation has at least one vertex"))
}

struct InterpolantBuilder<'a, S: ClauseSink> {
    sink: &'a mut S,
    vars_a: &'a BufferedCnf,
    vars_b: &'a BufferedCnf,
    /// `literals[id]` is the interpolant literal of vertex `id`; filled in exactly once per
    /// vertex, in the same order `replay` visits them.
    literals: Vec<Lit>,
    false_lit: Lit,
    true_lit: Lit,
    tolerate_deleted: bool,
    /// Set on the first intolerant `deleted` callback; checked once `replay` finishes.
    deleted_error: Option<SolverError>,
}

impl<S: ClauseSink> InterpolantBuilder<'_, S> {
    fn is_global(&self, lit: Lit) -> bool {
        self.vars_a.contains(lit) && self.vars_b.contains(lit)
    }

    fn is_b_variable(&self, var: u32) -> bool {
        self.vars_b.contains(Lit::new(var, false))
    }

    fn literal_of(&self, id: VertexId) -> Lit {
        self.literals[id as usize]
    }

    /// `t ↔ (a ∧ b)`, short-circuiting the obvious cases.
    fn and_lit(&mut self, a: Lit, b: Lit) -> Lit {
        if a == self.false_lit || b == self.false_lit {
            return self.false_lit;
        }
        if a == self.true_lit {
            return b;
        }
        if b == self.true_lit {
            return a;
        }
        let t = Lit::new(self.sink.alloc_var(), false);
        self.sink.add_binary(!t, a);
        self.sink.add_binary(!t, b);
        self.sink.add_ternary(!a, !b, t);
        t
    }

    /// `t ↔ (a ∨ b)`, short-circuiting the obvious cases.
    fn or_lit(&mut self, a: Lit, b: Lit) -> Lit {
        if a == self.true_lit || b == self.true_lit {
            return self.true_lit;
        }
        if a == self.false_lit {
            return b;
        }
        if b == self.false_lit {
            return a;
        }
        let t = Lit::new(self.sink.alloc_var(), false);
        self.sink.add_binary(!a, t);
        self.sink.add_binary(!b, t);
        self.sink.add_ternary(a, b, !t);
        t
    }
}

impl<S: ClauseSink> ProofTraverser for InterpolantBuilder<'_, S> {
    fn root(&mut self, clause: &[Lit], part_of_a: bool) {
        let lit = if part_of_a {
            let global_literals: Vec<Lit> = clause
                .iter()
                .copied()
                .filter(|&l| self.is_global(l))
                .collect();
            if global_literals.is_empty() {
                self.false_lit
            } else {
                let t = Lit::new(self.sink.alloc_var(), false);
                for &l in &global_literals {
                    self.sink.add_binary(!l, t);
                }
                let mut wide = global_literals;
                wide.push(!t);
                self.sink.add_clause(wide);
                t
            }
        } else {
            self.true_lit
        };
        self.literals.push(lit);
    }

    fn chain(&mut self, antecedents: &[VertexId], pivots: &[u32]) {
        let mut pc = self.literal_of(antecedents[0]);
        for (i, &pivot_var) in pivots.iter().enumerate() {
            let pc2 = self.literal_of(antecedents[i + 1]);
            pc = if self.is_b_variable(pivot_var) {
                self.and_lit(pc, pc2)
            } else {
                self.or_lit(pc, pc2)
            };
        }
        self.literals.push(pc);
    }

    fn deleted(&mut self, id: VertexId) {
        if self.tolerate_deleted {
            log::warn!(
                target: "interpolate",
                "proof references deleted vertex {id}; substituting false_lit"
            );
        } else if self.deleted_error.is_none() {
            self.deleted_error = Some(SolverError::DeletedProofVertex(id));
        }
        self.literals.push(self.false_lit);
    }

    fn done(&mut self) {}
}
