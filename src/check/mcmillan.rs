/*!
The McMillan-style unbounded model checker: iterates a sequence of reachable-state
over-approximations `R`, extracted as Craig interpolants from the resolution proof of each
bounded unrolling, until a fixpoint proves the bad state unreachable or a real counterexample is
found.
*/

use log::{debug, info};

use crate::aiger::Circuit;
use crate::cnf::{BufferedCnf, ClauseSink, SolverSink};
use crate::encode;
use crate::interpolate;
use crate::sat::{Lit, SolveResult, Solver, Var};
use crate::translate::VarTranslator;
use crate::types::err::ErrorKind;

/// The outcome of a full check: either bound-limited (`k = 1, 2, …`) or unbounded when `max_k` is
/// `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// A counterexample trace of length `k` was found.
    Fail { k: usize },
    /// A fixpoint over-approximation disjoint from the bad states was reached.
    Ok,
    /// The outer loop exhausted its bound without a verdict either way.
    Undecided { bound: usize },
}

/// Runs the interpolation loop, increasing `k` until a verdict is reached or `max_k` (if given)
/// is exceeded.
///
/// `tolerate_deleted_in_proof` is forwarded to [`interpolate::interpolate`]: the embedded solver
/// never deletes a clause mid-`solve`, so this only matters if that invariant is ever relaxed.
pub fn run(
    circuit: &Circuit,
    max_k: Option<usize>,
    tolerate_deleted_in_proof: bool,
) -> Result<Verdict, ErrorKind> {
    let num_vars = circuit.max_var;

    // Preflight: is the initial state itself bad?
    {
        let mut solver = Solver::new();
        let mut translator = VarTranslator::new();
        translator.reset(&mut solver, num_vars, 0)?;
        {
            let mut sink = SolverSink::new(&mut solver, true);
            encode::initial_state(&mut sink, &translator, circuit)?;
            encode::bad_state(&mut sink, &translator, circuit, 0, 0)?;
        }
        if solver.solve(&[translator.true_lit()]) == SolveResult::Satisfiable {
            info!(target: "mcmillan", "initial state is already bad");
            return Ok(Verdict::Fail { k: 0 });
        }
    }

    // firstR := I(step = 0); always assert a unit when I is empty, so Rlit is never built from a
    // vacuous buffer by accident.
    let mut translator = VarTranslator::new();
    let mut seed_solver = Solver::new();
    translator.reset(&mut seed_solver, num_vars, 1)?;
    let mut first_r = BufferedCnf::new();
    encode::initial_state(&mut first_r, &translator, circuit)?;
    if first_r.is_empty() {
        first_r.add_unit(translator.true_lit());
    }

    // Monotonically increasing floor for fresh interpolant variables, kept clear of every
    // translator range seen so far.
    let mut fresh_floor: Var = 0;

    let mut k = 1usize;
    loop {
        if let Some(bound) = max_k {
            if k > bound {
                return Ok(Verdict::Undecided { bound });
            }
        }
        fresh_floor = fresh_floor.max((k as Var + 2) * num_vars as Var + 10);

        let mut r = BufferedCnf::new();
        let mut r_lit = first_r.copy_as_tseitin(&mut r);

        let mut b_buf = BufferedCnf::with_variable_recording();
        for step in 1..k {
            encode::transition(&mut b_buf, &translator, circuit, step)?;
        }
        encode::bad_state(&mut b_buf, &translator, circuit, 0, k)?;

        let mut i = 0usize;
        let fixpoint_or_fail = 'inner: loop {
            let mut a_buf = BufferedCnf::with_variable_recording();
            r.copy_to(&mut a_buf);
            a_buf.add_unit(r_lit);
            encode::transition(&mut a_buf, &translator, circuit, 0)?;

            let mut solver = Solver::new();
            solver.enable_proof_recording().expect(
                "a freshly constructed solver has no variables allocated yet",
            );
            translator.reset(&mut solver, num_vars, k)?;
            {
                let mut sink = SolverSink::new(&mut solver, true);
                a_buf.copy_to(&mut sink);
            }
            {
                let mut sink = SolverSink::new(&mut solver, false);
                b_buf.copy_to(&mut sink);
            }

            match solver.solve(&[translator.true_lit()]) {
                SolveResult::Satisfiable if i == 0 => {
                    info!(target: "mcmillan", "real counterexample of length {k}");
                    return Ok(Verdict::Fail { k });
                }
                SolveResult::Satisfiable => {
                    debug!(target: "mcmillan", "k={k} i={i}: over-approximation leaked, advancing k");
                    break 'inner None;
                }
                SolveResult::Unsatisfiable => {}
            }

            let proof = solver.proof().expect("proof recording was enabled above");
            let mut itp_buf = BufferedCnf::with_variable_floor(fresh_floor);
            let r2lit_raw = interpolate::interpolate(
                proof,
                &a_buf,
                &b_buf,
                &mut itp_buf,
                translator.false_lit(),
                translator.true_lit(),
                tolerate_deleted_in_proof,
            )?;
            fresh_floor = fresh_floor.max(itp_buf.num_vars());

            let shift_to_step0 = |lit: Lit| -> Lit {
                if translator.time_index(lit) == 1 {
                    translator
                        .time_shift(lit, -1)
                        .expect("a step-1 literal is always shiftable")
                } else {
                    lit
                }
            };
            let mut itp_shifted = BufferedCnf::new();
            for clause in itp_buf.clauses() {
                let shifted: Vec<Lit> = clause.iter().copied().map(shift_to_step0).collect();
                itp_shifted.add_clause(shifted);
            }
            let r2lit = shift_to_step0(r2lit_raw);

            // Fixpoint check: itp ∧ R ∧ ¬Rlit ∧ R2lit, under {true_lit()}. UNSAT ⇒ R2 ⇒ R.
            let fixpoint_reached = {
                let mut check_solver = Solver::new();
                translator.reset(&mut check_solver, num_vars, k)?;
                {
                    let mut sink = SolverSink::new(&mut check_solver, true);
                    itp_shifted.copy_to(&mut sink);
                    r.copy_to(&mut sink);
                    sink.add_unit(!r_lit);
                }
                check_solver.solve(&[translator.true_lit(), r2lit]) == SolveResult::Unsatisfiable
            };

            if fixpoint_reached {
                info!(target: "mcmillan", "fixpoint reached at k={k}, i={i}");
                break 'inner Some(());
            }

            // Extend R: newRlit ↔ (Rlit ∨ R2lit).
            fresh_floor += 1;
            let new_r_lit = Lit::new(fresh_floor, false);
            for clause in itp_shifted.clauses() {
                r.add_clause(clause.clone());
            }
            r.add_binary(!r_lit, new_r_lit);
            r.add_binary(!r2lit, new_r_lit);
            r.add_clause(vec![!new_r_lit, r_lit, r2lit]);
            r_lit = new_r_lit;

            i += 1;
        };

        if fixpoint_or_fail.is_some() {
            return Ok(Verdict::Ok);
        }
        k += 1;
    }
}
