/*!
The clause-sink abstraction: a single capability interface — allocate a variable, add a
clause — with three implementations. Everything in `encode` and `interpolate` is written against
[`ClauseSink`] alone, so the same code builds `I`/`T`/`F` directly into the solver, into an
in-memory buffer, or straight out to DIMACS text.
*/

use std::collections::HashSet;
use std::io::{self, Write};

use crate::sat::{Lit, Solver, Var};

/// A destination for clauses: add-clause in its n-ary, unit, binary and ternary shapes, plus
/// variable allocation. Sinks are passed by unique reference; none of them are ever owned by the
/// code that builds clauses into them.
pub trait ClauseSink {
    fn alloc_var(&mut self) -> Var;
    fn add_clause(&mut self, literals: Vec<Lit>);
    fn num_vars(&self) -> Var;

    /// Grows the sink's notion of its variable range to include `max_var`, without adding a
    /// clause. Solver-backed sinks forward to the solver; in-memory sinks just bump a counter.
    fn ensure_vars_up_to(&mut self, max_var: Var);

    fn add_unit(&mut self, a: Lit) {
        self.add_clause(vec![a]);
    }

    fn add_binary(&mut self, a: Lit, b: Lit) {
        self.add_clause(vec![a, b]);
    }

    fn add_ternary(&mut self, a: Lit, b: Lit, c: Lit) {
        self.add_clause(vec![a, b, c]);
    }
}

/// An append-only in-memory CNF. Used to build `A`, `B`, and the persistent reachability set `R`
/// before they are copied into a solver.
#[derive(Clone, Debug, Default)]
pub struct BufferedCnf {
    clauses: Vec<Vec<Lit>>,
    num_vars: Var,
    record_vars: bool,
    vars_seen: HashSet<Var>,
}

impl BufferedCnf {
    pub fn new() -> BufferedCnf {
        BufferedCnf::default()
    }

    /// A buffer that also records every variable it has ever been given, so [`BufferedCnf::contains`]
    /// is O(1) amortized instead of an O(clauses) scan. Must be chosen before any clause is added.
    pub fn with_variable_recording() -> BufferedCnf {
        BufferedCnf {
            record_vars: true,
            ..BufferedCnf::default()
        }
    }

    /// A buffer whose `alloc_var` counter starts above `floor` instead of `0`, so fresh variables
    /// it allocates are guaranteed disjoint from some other numbering already in use — the
    /// interpolation loop's fresh-variable counter must stay clear of the translator's own
    /// time-indexed range.
    pub fn with_variable_floor(floor: Var) -> BufferedCnf {
        BufferedCnf {
            num_vars: floor,
            ..BufferedCnf::default()
        }
    }

    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether `lit`'s variable was ever mentioned in a clause added to this buffer. Requires
    /// [`BufferedCnf::with_variable_recording`]; returns `false` unconditionally otherwise, which
    /// is always wrong to rely on — a naive scan-all-clauses fallback must not be used in
    /// production.
    pub fn contains(&self, lit: Lit) -> bool {
        self.vars_seen.contains(&lit.var())
    }

    /// Replays every clause into `sink`, and bumps its variable count to cover this buffer's.
    pub fn copy_to(&self, sink: &mut impl ClauseSink) {
        sink.ensure_vars_up_to(self.num_vars);
        for clause in &self.clauses {
            sink.add_clause(clause.clone());
        }
    }

    /// Tseitin-reifies this buffer into `sink`: for each clause `C_i`, a fresh `t_i` with
    /// `t_i ↔ C_i`; if there is more than one clause, a further fresh `t` with
    /// `t ↔ (t_1 ∧ … ∧ t_n)`. Returns the literal that is true in a model of `sink` exactly when
    /// this buffer's CNF is satisfied.
    pub fn copy_as_tseitin(&self, sink: &mut impl ClauseSink) -> Lit {
        if self.clauses.is_empty() {
            // Vacuously true; assert it so the returned literal behaves like `true_lit()` to
            // every caller that only ever reads it as an assumption or conjunct.
            let v = sink.alloc_var();
            let t = Lit::new(v, false);
            sink.add_unit(t);
            return t;
        }

        let mut per_clause = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            let t_i = Lit::new(sink.alloc_var(), false);
            for &x in clause {
                sink.add_binary(!x, t_i);
            }
            let mut wide = clause.clone();
            wide.push(!t_i);
            sink.add_clause(wide);
            per_clause.push(t_i);
        }

        if per_clause.len() == 1 {
            return per_clause[0];
        }

        let t = Lit::new(sink.alloc_var(), false);
        for &t_i in &per_clause {
            sink.add_binary(!t, t_i);
        }
        let mut all_true_implies_t: Vec<Lit> = per_clause.iter().map(|&t_i| !t_i).collect();
        all_true_implies_t.push(t);
        sink.add_clause(all_true_implies_t);
        t
    }
}

impl ClauseSink for BufferedCnf {
    fn alloc_var(&mut self) -> Var {
        self.num_vars += 1;
        self.num_vars
    }

    fn add_clause(&mut self, literals: Vec<Lit>) {
        if self.record_vars {
            for l in &literals {
                self.vars_seen.insert(l.var());
            }
        }
        if let Some(max_in_clause) = literals.iter().map(|l| l.var()).max() {
            if max_in_clause > self.num_vars {
                self.num_vars = max_in_clause;
            }
        }
        self.clauses.push(literals);
    }

    fn num_vars(&self) -> Var {
        self.num_vars
    }

    fn ensure_vars_up_to(&mut self, max_var: Var) {
        if max_var > self.num_vars {
            self.num_vars = max_var;
        }
    }
}

/// A sink that forwards straight to the embedded solver, tagging every clause it adds with which
/// interpolation partition (`A`/`B`) it belongs to.
pub struct SolverSink<'s> {
    solver: &'s mut Solver,
    part_of_a: bool,
}

impl<'s> SolverSink<'s> {
    pub fn new(solver: &'s mut Solver, part_of_a: bool) -> SolverSink<'s> {
        SolverSink { solver, part_of_a }
    }
}

impl ClauseSink for SolverSink<'_> {
    fn alloc_var(&mut self) -> Var {
        self.solver.new_var()
    }

    fn add_clause(&mut self, literals: Vec<Lit>) {
        if let Some(max_var) = literals.iter().map(|l| l.var()).max() {
            self.solver.ensure_vars_up_to(max_var);
        }
        self.solver.add_clause(literals, self.part_of_a);
    }

    fn num_vars(&self) -> Var {
        self.solver.num_vars()
    }

    fn ensure_vars_up_to(&mut self, max_var: Var) {
        self.solver.ensure_vars_up_to(max_var);
    }
}

/// Streams clauses out as DIMACS text: one clause per line, space-separated signed integers,
/// terminated by `0`. No `p cnf` header, since the final variable/clause counts aren't known
/// upfront.
pub struct DimacsSink<W: Write> {
    writer: W,
    num_vars: Var,
}

impl<W: Write> DimacsSink<W> {
    pub fn new(writer: W) -> DimacsSink<W> {
        DimacsSink { writer, num_vars: 0 }
    }

    fn write_clause(&mut self, literals: &[Lit]) -> io::Result<()> {
        for l in literals {
            write!(self.writer, "{} ", l.as_dimacs())?;
        }
        writeln!(self.writer, "0")
    }
}

impl<W: Write> ClauseSink for DimacsSink<W> {
    fn alloc_var(&mut self) -> Var {
        self.num_vars += 1;
        self.num_vars
    }

    fn add_clause(&mut self, literals: Vec<Lit>) {
        self.write_clause(&literals)
            .expect("writing DIMACS output failed");
    }

    fn num_vars(&self) -> Var {
        self.num_vars
    }

    fn ensure_vars_up_to(&mut self, max_var: Var) {
        if max_var > self.num_vars {
            self.num_vars = max_var;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::SolveResult;

    #[test]
    fn buffered_cnf_tracks_variables_when_recording() {
        let mut cnf = BufferedCnf::with_variable_recording();
        cnf.add_binary(Lit::new(1, false), Lit::new(2, true));
        assert!(cnf.contains(Lit::new(1, false)));
        assert!(cnf.contains(Lit::new(2, false)));
        assert!(!cnf.contains(Lit::new(3, false)));
    }

    #[test]
    fn buffered_cnf_without_recording_never_contains_anything() {
        let mut cnf = BufferedCnf::new();
        cnf.add_unit(Lit::new(1, false));
        assert!(!cnf.contains(Lit::new(1, false)));
    }

    #[test]
    fn copy_to_replays_clauses_and_bumps_variable_count() {
        let mut src = BufferedCnf::new();
        src.add_binary(Lit::new(1, false), Lit::new(5, true));

        let mut dst = BufferedCnf::new();
        src.copy_to(&mut dst);
        assert_eq!(dst.clauses().len(), 1);
        assert_eq!(dst.num_vars(), 5);
    }

    #[test]
    fn tseitin_literal_is_true_exactly_when_original_cnf_is_satisfied() {
        let mut src = BufferedCnf::new();
        src.add_binary(Lit::new(1, false), Lit::new(2, false));
        src.add_binary(Lit::new(1, true), Lit::new(3, false));

        let mut solver = Solver::new();
        solver.new_var(); // 1
        solver.new_var(); // 2
        solver.new_var(); // 3
        let t = {
            let mut sink = SolverSink::new(&mut solver, true);
            src.copy_as_tseitin(&mut sink)
        };

        // Forcing both original clauses false (x1 false and x2 false makes clause 1 false)
        // while asserting t must be UNSAT.
        let mut blocked = Solver::new();
        blocked.new_var();
        blocked.new_var();
        blocked.new_var();
        let t2 = {
            let mut sink = SolverSink::new(&mut blocked, true);
            src.copy_as_tseitin(&mut sink)
        };
        blocked.add_unit(Lit::new(1, true), true);
        blocked.add_unit(Lit::new(2, true), true);
        assert_eq!(blocked.solve(&[t2]), SolveResult::Unsatisfiable);

        // With x1, x2, x3 all true both original clauses hold, so t can be true too.
        solver.add_unit(Lit::new(1, false), true);
        solver.add_unit(Lit::new(2, false), true);
        solver.add_unit(Lit::new(3, false), true);
        assert_eq!(solver.solve(&[t]), SolveResult::Satisfiable);
    }

    #[test]
    fn tseitin_of_empty_buffer_is_vacuously_assertable() {
        let empty = BufferedCnf::new();
        let mut solver = Solver::new();
        let t = {
            let mut sink = SolverSink::new(&mut solver, true);
            empty.copy_as_tseitin(&mut sink)
        };
        assert_eq!(solver.solve(&[t]), SolveResult::Satisfiable);
    }

    #[test]
    fn dimacs_sink_writes_terminated_clauses() {
        let mut buf = Vec::new();
        {
            let mut sink = DimacsSink::new(&mut buf);
            sink.add_binary(Lit::new(1, false), Lit::new(2, true));
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "1 -2 0\n");
    }
}
