/*!
A small proof-producing CDCL solver: two-watched-literal propagation, 1-UIP conflict analysis,
VSIDS-style decisions, and Luby restarts.

It is treated as a self-contained collaborator — the model-checking driver only ever talks to it
through [`Solver::add_clause`], [`Solver::new_var`], [`Solver::solve`], and [`Solver::proof`]. Its
internals (the clause arena, the trail, watch lists) are never reached into from outside this
module.

# Proof recording

Conflict analysis naturally produces a resolution derivation of the learnt clause from its
antecedents: this is exactly a chain vertex of the proof DAG. When [`Solver::solve`]
concludes UNSAT, the *same* analysis routine is run one more time without the early
first-UIP cutoff, which — because every trail literal at decision level 0 carries a reason
clause — necessarily bottoms out in the literal empty clause. That final chain vertex is what
[`crate::sat::proof::ProofDag::last_id`] returns after an UNSAT solve.
*/

use rand::Rng;

use crate::sat::activity::ActivityHeap;
use crate::sat::clause::{Clause, ClauseId};
use crate::sat::literal::{Lit, Var};
use crate::sat::proof::{ProofDag, VertexId};
use crate::sat::restart::Luby;
use crate::types::err::SolverError;

/// Default chance of assigning a freshly decided atom `true` rather than `false`, mirroring
/// `polarity_lean` in the reference solver's decision procedure.
const DEFAULT_POLARITY_LEAN: f64 = 0.5;

/// Conflicts allowed before the first restart; later restarts scale this by the Luby sequence.
const RESTART_UNIT: u64 = 100;

/// The outcome of a [`Solver::solve`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveResult {
    Satisfiable,
    Unsatisfiable,
}

/// A proof-producing CDCL solver, scoped to a single sequence of clause additions followed by
/// (conventionally, one) `solve` call.
pub struct Solver {
    num_vars: u32,

    clauses: Vec<Clause>,
    /// Parallel to `clauses`: the proof vertex each clause was registered under, if proof
    /// recording is enabled.
    proof_ids: Vec<Option<VertexId>>,

    /// `watches[lit.code()]` holds clauses watching `lit`, i.e. clauses to re-examine when `lit`
    /// becomes false.
    watches: Vec<Vec<ClauseId>>,

    value: Vec<Option<bool>>,
    level: Vec<i32>,
    reason: Vec<Option<ClauseId>>,

    trail: Vec<Lit>,
    trail_lim: Vec<usize>,
    qhead: usize,

    heap: ActivityHeap,
    luby: Luby,
    /// Conflicts seen since the last restart; compared against `restart_threshold`.
    conflicts_since_restart: u64,
    /// Conflicts to allow before the next restart: the current Luby term times `RESTART_UNIT`.
    restart_threshold: u64,
    /// Chance of deciding a freshly chosen atom `true`, mirroring `polarity_lean` in the
    /// reference solver's decision procedure.
    polarity_lean: f64,

    assumption_queue: Vec<Lit>,
    assumption_idx: usize,

    /// Set when a clause added before any `solve` call is already falsified (e.g. two
    /// contradictory unit clauses, or the empty clause).
    pending_conflict: Option<ClauseId>,

    proof: Option<ProofDag>,
    /// Becomes `true` on the first `new_var`; `enable_proof_recording` after this point is
    /// rejected, since a traverser must be installed before any variable is allocated.
    proof_locked: bool,
    /// Whether a `solve` call has completed since the last clause was added; `value_of` requires
    /// this to answer meaningfully.
    solved: bool,
}

impl Solver {
    pub fn new() -> Solver {
        Solver {
            num_vars: 0,
            clauses: Vec::new(),
            proof_ids: Vec::new(),
            watches: Vec::new(),
            value: Vec::new(),
            level: Vec::new(),
            reason: Vec::new(),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            qhead: 0,
            heap: ActivityHeap::new(),
            luby: Luby::new(),
            conflicts_since_restart: 0,
            restart_threshold: RESTART_UNIT,
            polarity_lean: DEFAULT_POLARITY_LEAN,
            assumption_queue: Vec::new(),
            assumption_idx: 0,
            pending_conflict: None,
            proof: None,
            proof_locked: false,
            solved: false,
        }
    }

    /// Enables proof recording. Must be called before the first [`Solver::new_var`].
    pub fn enable_proof_recording(&mut self) -> Result<(), crate::types::err::SolverError> {
        if self.proof_locked {
            return Err(crate::types::err::SolverError::TraverserInstalledLate);
        }
        self.proof = Some(ProofDag::new());
        Ok(())
    }

    /// The completed proof DAG, once an UNSAT `solve` has run with recording enabled.
    pub fn proof(&self) -> Option<&ProofDag> {
        self.proof.as_ref()
    }

    /// Allocates a fresh variable. Variables are handed out `1, 2, 3, …`.
    pub fn new_var(&mut self) -> Var {
        self.proof_locked = true;
        self.num_vars += 1;
        self.value.push(None);
        self.level.push(-1);
        self.reason.push(None);
        self.watches.push(Vec::new());
        self.watches.push(Vec::new());
        self.heap.ensure_var(self.num_vars);
        self.num_vars
    }

    /// The number of variables allocated so far.
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Sets the chance (in `[0.0, 1.0]`) of a freshly decided atom being assigned `true` rather
    /// than `false`. Defaults to `0.5`.
    pub fn set_polarity_lean(&mut self, lean: f64) {
        self.polarity_lean = lean;
    }

    /// Allocates variables until at least `max_var` exist. Used by the solver-backed clause sink,
    /// which must guarantee variables are allocated before referencing them.
    pub fn ensure_vars_up_to(&mut self, max_var: Var) {
        while self.num_vars < max_var {
            self.new_var();
        }
    }

    /// Adds a clause, tagging it for the interpolation partition it belongs to (ignored unless
    /// proof recording is enabled). Must be called before [`Solver::solve`].
    pub fn add_clause(&mut self, literals: Vec<Lit>, part_of_a: bool) -> ClauseId {
        self.solved = false;
        let id = self.clauses.len() as ClauseId;
        let proof_id = self
            .proof
            .as_mut()
            .map(|p| p.push_root(literals.clone(), part_of_a));
        self.proof_ids.push(proof_id);

        match literals.len() {
            0 => {
                self.clauses.push(Clause::new(literals, false));
                self.pending_conflict.get_or_insert(id);
            }
            1 => {
                let unit = literals[0];
                self.clauses.push(Clause::new(literals, false));
                if !self.enqueue(unit, Some(id)) {
                    self.pending_conflict.get_or_insert(id);
                }
            }
            _ => {
                self.watch_literal(literals[0], id);
                self.watch_literal(literals[1], id);
                self.clauses.push(Clause::new(literals, false));
            }
        }
        id
    }

    pub fn add_unit(&mut self, a: Lit, part_of_a: bool) -> ClauseId {
        self.add_clause(vec![a], part_of_a)
    }

    pub fn add_binary(&mut self, a: Lit, b: Lit, part_of_a: bool) -> ClauseId {
        self.add_clause(vec![a, b], part_of_a)
    }

    pub fn add_ternary(&mut self, a: Lit, b: Lit, c: Lit, part_of_a: bool) -> ClauseId {
        self.add_clause(vec![a, b, c], part_of_a)
    }

    /// The current value of a literal in the most recent solve's model, or `None` if its
    /// variable is unassigned.
    ///
    /// Errs with [`SolverError::UnknownVariable`] if `lit`'s variable was never allocated, or
    /// with [`SolverError::NoSolveYet`] if no `solve` has completed since the last clause was
    /// added.
    pub fn value_of(&self, lit: Lit) -> Result<Option<bool>, SolverError> {
        if lit.var() > self.num_vars {
            return Err(SolverError::UnknownVariable(lit.var()));
        }
        if !self.solved {
            return Err(SolverError::NoSolveYet);
        }
        Ok(self.raw_value_of(lit))
    }

    /// Infallible value lookup for internal use during a solve, where the variable is always
    /// known to be allocated and "solved" has no bearing on an in-progress search.
    fn raw_value_of(&self, lit: Lit) -> Option<bool> {
        self.value[(lit.var() - 1) as usize].map(|v| v == !lit.is_negated())
    }

    fn lit_is_true(&self, lit: Lit) -> bool {
        self.value[(lit.var() - 1) as usize] == Some(!lit.is_negated())
    }

    fn lit_is_false(&self, lit: Lit) -> bool {
        self.value[(lit.var() - 1) as usize] == Some(lit.is_negated())
    }

    fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }

    fn watch_literal(&mut self, watched: Lit, clause: ClauseId) {
        self.watches[(!watched).code()].push(clause);
    }

    /// Assigns `lit` true if unassigned; returns `false` (without changing state) if `lit` was
    /// already assigned false.
    fn enqueue(&mut self, lit: Lit, reason: Option<ClauseId>) -> bool {
        let idx = (lit.var() - 1) as usize;
        match self.value[idx] {
            Some(v) => v == !lit.is_negated(),
            None => {
                self.value[idx] = Some(!lit.is_negated());
                self.level[idx] = self.decision_level() as i32;
                self.reason[idx] = reason;
                self.trail.push(lit);
                true
            }
        }
    }

    fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    fn backtrack_to(&mut self, target_level: usize) {
        if self.decision_level() <= target_level {
            return;
        }
        let bound = self.trail_lim[target_level];
        for i in (bound..self.trail.len()).rev() {
            let var = self.trail[i].var();
            let idx = (var - 1) as usize;
            self.value[idx] = None;
            self.level[idx] = -1;
            self.reason[idx] = None;
            self.heap.ensure_var(var);
        }
        self.trail.truncate(bound);
        self.trail_lim.truncate(target_level);
        self.qhead = self.trail.len();
    }

    /// Unit-propagates everything implied by the current trail. Returns the first violated
    /// clause, if propagation reaches a conflict.
    fn propagate(&mut self) -> Option<ClauseId> {
        let mut conflict = None;
        while self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;

            let watchers = std::mem::take(&mut self.watches[p.code()]);
            let mut kept = Vec::with_capacity(watchers.len());

            for cid in watchers {
                if conflict.is_some() {
                    kept.push(cid);
                    continue;
                }

                let clause = &mut self.clauses[cid as usize];
                if clause.literals[0] == !p {
                    clause.literals.swap(0, 1);
                }
                let other = clause.literals[0];

                if self.lit_is_true(other) {
                    kept.push(cid);
                    continue;
                }

                let mut relocated = false;
                for k in 2..clause.literals.len() {
                    let candidate = clause.literals[k];
                    if !self.lit_is_false(candidate) {
                        clause.literals.swap(1, k);
                        relocated = true;
                        break;
                    }
                }

                if relocated {
                    let new_watch = self.clauses[cid as usize].literals[1];
                    self.watches[(!new_watch).code()].push(cid);
                } else {
                    kept.push(cid);
                    if !self.enqueue(other, Some(cid)) {
                        conflict = Some(cid);
                    }
                }
            }

            self.watches[p.code()] = kept;
        }
        conflict
    }

    /// The shared resolution routine behind both ordinary 1-UIP learning (`stop_at_uip = true`)
    /// and the final derivation of the empty clause once a decision-level-0 conflict is found
    /// (`stop_at_uip = false`, see the module doc comment).
    ///
    /// Returns the derived clause (empty iff `!stop_at_uip`) and, when proof recording is
    /// enabled, the proof vertex for the derivation.
    fn resolve_chain(&mut self, start: ClauseId, stop_at_uip: bool) -> (Vec<Lit>, Option<VertexId>) {
        let recording = self.proof.is_some();
        let current_level = self.decision_level();

        let mut seen = vec![false; self.num_vars as usize + 1];
        let mut counter: i64 = 0;
        let mut learnt: Vec<Lit> = Vec::new();
        let mut cs: Vec<VertexId> = Vec::new();
        let mut xs: Vec<u32> = Vec::new();

        let mut cur = start;
        let mut p: Option<Lit> = None;
        let mut index = self.trail.len();

        loop {
            if recording {
                cs.push(self.proof_ids[cur as usize].expect("clause lacks a proof vertex"));
            }

            let lits = self.clauses[cur as usize].literals.clone();
            for q in lits {
                if Some(q) == p {
                    continue;
                }
                let v = q.var() as usize;
                if !seen[v] {
                    seen[v] = true;
                    self.heap.bump(q.var());
                    let lvl = self.level[v - 1];
                    if stop_at_uip && (lvl as usize) < current_level {
                        learnt.push(q);
                    } else {
                        counter += 1;
                    }
                }
            }

            p = None;
            while index > 0 {
                index -= 1;
                if seen[self.trail[index].var() as usize] {
                    p = Some(self.trail[index]);
                    break;
                }
            }

            let pivot = match p {
                None => break,
                Some(pl) => pl,
            };
            seen[pivot.var() as usize] = false;
            counter -= 1;

            if stop_at_uip && counter == 0 {
                learnt.insert(0, !pivot);
                break;
            }

            cur = self.reason[(pivot.var() - 1) as usize]
                .expect("a non-decision trail literal must carry a reason clause");
            if recording {
                xs.push(pivot.var());
            }
        }

        let chain_id = if recording {
            Some(self.proof.as_mut().unwrap().push_chain(cs, xs))
        } else {
            None
        };
        (learnt, chain_id)
    }

    /// 1-UIP conflict analysis: the learnt clause, the level to backtrack to, and (if recording)
    /// the clause's proof vertex.
    fn analyze(&mut self, conflict: ClauseId) -> (Vec<Lit>, usize, Option<VertexId>) {
        let (mut learnt, chain_id) = self.resolve_chain(conflict, true);

        let backtrack_level = if learnt.len() <= 1 {
            0
        } else {
            let mut max_i = 1;
            for i in 2..learnt.len() {
                if self.level[(learnt[i].var() - 1) as usize]
                    > self.level[(learnt[max_i].var() - 1) as usize]
                {
                    max_i = i;
                }
            }
            learnt.swap(1, max_i);
            self.level[(learnt[1].var() - 1) as usize] as usize
        };

        (learnt, backtrack_level, chain_id)
    }

    fn assert_learnt(&mut self, learnt: Vec<Lit>, chain_id: Option<VertexId>) {
        let cid = self.clauses.len() as ClauseId;
        self.proof_ids.push(chain_id);

        if learnt.len() >= 2 {
            self.watch_literal(learnt[0], cid);
            self.watch_literal(learnt[1], cid);
        }
        let asserted = learnt[0];
        self.clauses.push(Clause::new(learnt, true));
        self.enqueue(asserted, Some(cid));
    }

    /// Completes proof recording (if enabled) by deriving the literal empty clause from
    /// `conflict`, and reports unsatisfiability.
    fn conclude_unsat(&mut self, conflict: ClauseId) -> SolveResult {
        if self.proof.is_some() {
            let (empty, _chain_id) = self.resolve_chain(conflict, false);
            debug_assert!(empty.is_empty(), "a level-0 conflict must resolve to the empty clause");
        }
        SolveResult::Unsatisfiable
    }

    fn pick_decision(&mut self) -> Option<Lit> {
        let Solver {
            heap,
            value,
            polarity_lean,
            ..
        } = self;
        let var = heap.pop_unassigned(|v| value[(v - 1) as usize].is_some())?;
        let positive = rand::thread_rng().gen_bool(*polarity_lean);
        Some(Lit::new(var, !positive))
    }

    /// Solves the current formula under `assumptions`.
    ///
    /// Every literal in `assumptions` is pushed as its own decision, in order; a conflict
    /// purely among assumptions (with no clausal antecedent — e.g. the same variable assumed
    /// both ways) is not supported and will panic rather than report a result, since the
    /// resolution proof has nothing to resolve against. In this crate `assumptions` is always
    /// exactly `{true_lit()}`, so this restriction is never exercised.
    pub fn solve(&mut self, assumptions: &[Lit]) -> SolveResult {
        let result = self.solve_inner(assumptions);
        self.solved = true;
        result
    }

    fn solve_inner(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.backtrack_to(0);
        self.assumption_queue = assumptions.to_vec();
        self.assumption_idx = 0;

        if let Some(c) = self.pending_conflict.take() {
            return self.conclude_unsat(c);
        }

        loop {
            if let Some(conflict) = self.propagate() {
                if self.decision_level() == 0 {
                    return self.conclude_unsat(conflict);
                }
                let (learnt, backtrack_level, chain_id) = self.analyze(conflict);
                self.backtrack_to(backtrack_level);
                self.assumption_idx = self.assumption_idx.min(backtrack_level);
                self.assert_learnt(learnt, chain_id);
                self.heap.decay_activity();

                self.conflicts_since_restart += 1;
                if self.conflicts_since_restart >= self.restart_threshold {
                    self.backtrack_to(0);
                    self.assumption_idx = 0;
                    self.conflicts_since_restart = 0;
                    self.restart_threshold = self.luby.next() * RESTART_UNIT;
                }
                continue;
            }

            if self.assumption_idx < self.assumption_queue.len() {
                let a = self.assumption_queue[self.assumption_idx];
                self.assumption_idx += 1;
                match self.raw_value_of(a) {
                    Some(true) => continue,
                    Some(false) => {
                        let conflicting = self.reason[(a.var() - 1) as usize]
                            .expect("a falsified assumption must be explained by a clause");
                        return self.conclude_unsat(conflicting);
                    }
                    None => {
                        self.new_decision_level();
                        self.enqueue(a, None);
                        continue;
                    }
                }
            }

            match self.pick_decision() {
                Some(lit) => {
                    self.new_decision_level();
                    self.enqueue(lit, None);
                }
                None => return SolveResult::Satisfiable,
            }
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(vars_and_signs: &[(Var, bool)]) -> Vec<Lit> {
        vars_and_signs
            .iter()
            .map(|&(v, neg)| Lit::new(v, neg))
            .collect()
    }

    #[test]
    fn trivial_satisfiable() {
        let mut s = Solver::new();
        let a = s.new_var();
        s.add_clause(lits(&[(a, false)]), true);
        assert_eq!(s.solve(&[]), SolveResult::Satisfiable);
        assert_eq!(s.value_of(Lit::new(a, false)), Ok(Some(true)));
    }

    #[test]
    fn value_of_errors_before_any_solve_has_run() {
        let mut s = Solver::new();
        let a = s.new_var();
        s.add_unit(Lit::new(a, false), true);
        assert_eq!(s.value_of(Lit::new(a, false)), Err(SolverError::NoSolveYet));
    }

    #[test]
    fn value_of_errors_for_an_unallocated_variable() {
        let mut s = Solver::new();
        let a = s.new_var();
        s.add_unit(Lit::new(a, false), true);
        s.solve(&[]);
        assert_eq!(
            s.value_of(Lit::new(a + 1, false)),
            Err(SolverError::UnknownVariable(a + 1))
        );
    }

    #[test]
    fn value_of_goes_stale_once_the_formula_is_extended() {
        let mut s = Solver::new();
        let a = s.new_var();
        s.add_unit(Lit::new(a, false), true);
        s.solve(&[]);
        assert!(s.value_of(Lit::new(a, false)).is_ok());
        s.add_unit(Lit::new(a, false), true);
        assert_eq!(s.value_of(Lit::new(a, false)), Err(SolverError::NoSolveYet));
    }

    #[test]
    fn trivial_unsatisfiable() {
        let mut s = Solver::new();
        s.enable_proof_recording().unwrap();
        let a = s.new_var();
        s.add_unit(Lit::new(a, false), true);
        s.add_unit(Lit::new(a, true), false);
        assert_eq!(s.solve(&[]), SolveResult::Unsatisfiable);
        let proof = s.proof().unwrap();
        assert!(proof.len() >= 2);
    }

    #[test]
    fn pigeonhole_like_unsat_via_resolution() {
        // (a ∨ b) ∧ (¬a ∨ b) ∧ (a ∨ ¬b) ∧ (¬a ∨ ¬b) is unsatisfiable.
        let mut s = Solver::new();
        s.enable_proof_recording().unwrap();
        let a = s.new_var();
        let b = s.new_var();
        s.add_binary(Lit::new(a, false), Lit::new(b, false), true);
        s.add_binary(Lit::new(a, true), Lit::new(b, false), true);
        s.add_binary(Lit::new(a, false), Lit::new(b, true), false);
        s.add_binary(Lit::new(a, true), Lit::new(b, true), false);
        assert_eq!(s.solve(&[]), SolveResult::Unsatisfiable);
        let proof = s.proof().unwrap();
        assert!(proof.last_id().is_some());
    }

    #[test]
    fn assumption_driven_unsat() {
        let mut s = Solver::new();
        s.enable_proof_recording().unwrap();
        let a = s.new_var();
        let b = s.new_var();
        // a -> b, and a is assumed, but ¬b is also a root clause.
        s.add_binary(Lit::new(a, true), Lit::new(b, false), true);
        s.add_unit(Lit::new(b, true), false);
        assert_eq!(
            s.solve(&[Lit::new(a, false)]),
            SolveResult::Unsatisfiable
        );
    }

    #[test]
    fn three_sat_clause_is_satisfiable() {
        let mut s = Solver::new();
        let a = s.new_var();
        let b = s.new_var();
        let c = s.new_var();
        s.add_ternary(Lit::new(a, true), Lit::new(b, false), Lit::new(c, true), true);
        assert_eq!(s.solve(&[]), SolveResult::Satisfiable);
    }

    #[test]
    fn ensure_vars_up_to_allocates_missing_variables() {
        let mut s = Solver::new();
        s.ensure_vars_up_to(5);
        assert_eq!(s.num_vars(), 5);
        s.ensure_vars_up_to(3);
        assert_eq!(s.num_vars(), 5);
    }

    #[test]
    fn enabling_proof_recording_after_allocating_a_variable_fails() {
        let mut s = Solver::new();
        s.new_var();
        assert!(s.enable_proof_recording().is_err());
    }
}
