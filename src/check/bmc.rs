/*!
Classical bounded model checking: a single SAT call at a fixed bound `k`, with no
fixpoint reasoning. The outer "try k = 0, 1, … until a bound is exhausted" loop lives in the CLI,
since this function only answers the question for one `k`.
*/

use log::debug;

use crate::aiger::Circuit;
use crate::cnf::SolverSink;
use crate::encode;
use crate::sat::{ProofDag, SolveResult, Solver};
use crate::translate::VarTranslator;
use crate::types::err::ErrorKind;

/// The result of checking a single bound `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmcOutcome {
    /// A counterexample trace of length `k` exists.
    CounterexampleFound,
    /// No bad state is reachable within `k` steps — says nothing about `k + 1`.
    NoCounterexampleWithinBound,
}

/// Checks whether `circuit` can reach its bad state within `k` steps.
pub fn run(circuit: &Circuit, k: usize) -> Result<BmcOutcome, ErrorKind> {
    run_with_proof(circuit, k, false).map(|(outcome, _)| outcome)
}

/// As [`run`], but optionally records the resolution proof of an unsatisfiable solve, returning
/// it alongside the outcome (`None` when `record_proof` is `false` or the solve was satisfiable).
pub fn run_with_proof(
    circuit: &Circuit,
    k: usize,
    record_proof: bool,
) -> Result<(BmcOutcome, Option<ProofDag>), ErrorKind> {
    let mut solver = Solver::new();
    if record_proof {
        solver
            .enable_proof_recording()
            .expect("a freshly constructed solver has no variables allocated yet");
    }
    let mut translator = VarTranslator::new();
    translator.reset(&mut solver, circuit.max_var, k)?;

    {
        let mut sink = SolverSink::new(&mut solver, true);
        encode::to_sat(&mut sink, &translator, circuit, k)?;
    }

    let result = solver.solve(&[translator.true_lit()]);
    let outcome = match result {
        SolveResult::Satisfiable => BmcOutcome::CounterexampleFound,
        SolveResult::Unsatisfiable => BmcOutcome::NoCounterexampleWithinBound,
    };
    debug!(target: "bmc", "k={k} -> {outcome:?}");

    let proof = if record_proof && result == SolveResult::Unsatisfiable {
        solver.proof().cloned()
    } else {
        None
    };
    Ok((outcome, proof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::Gate;

    #[test]
    fn constant_false_output_holds_at_every_bound() {
        let circuit = Circuit {
            max_var: 1,
            inputs: vec![],
            latches: vec![],
            outputs: vec![0],
            gates: vec![],
        };
        for k in 0..4 {
            assert_eq!(
                run(&circuit, k).unwrap(),
                BmcOutcome::NoCounterexampleWithinBound
            );
        }
    }

    #[test]
    fn constant_true_output_fails_at_k0() {
        let circuit = Circuit {
            max_var: 1,
            inputs: vec![],
            latches: vec![],
            outputs: vec![1],
            gates: vec![],
        };
        assert_eq!(run(&circuit, 0).unwrap(), BmcOutcome::CounterexampleFound);
    }

    #[test]
    fn one_step_counterexample_is_found_at_k0() {
        let circuit = Circuit {
            max_var: 2,
            inputs: vec![2],
            latches: vec![],
            outputs: vec![4],
            gates: vec![Gate {
                out: 4,
                in1: 2,
                in2: 2,
            }],
        };
        assert_eq!(run(&circuit, 0).unwrap(), BmcOutcome::CounterexampleFound);
    }

    #[test]
    fn latched_safety_holds_for_growing_bounds() {
        // A single latch initialized to 0 whose next value is its own current value: the
        // output (the latch itself) can never become true.
        let circuit = Circuit {
            max_var: 1,
            inputs: vec![],
            latches: vec![crate::aiger::Latch { q: 2, next: 2 }],
            outputs: vec![2],
            gates: vec![],
        };
        for k in 0..3 {
            assert_eq!(
                run(&circuit, k).unwrap(),
                BmcOutcome::NoCounterexampleWithinBound
            );
        }
    }

    #[test]
    fn run_with_proof_records_a_proof_only_when_asked_and_only_on_unsat() {
        let circuit = Circuit {
            max_var: 1,
            inputs: vec![],
            latches: vec![],
            outputs: vec![0],
            gates: vec![],
        };
        let (outcome, proof) = run_with_proof(&circuit, 0, true).unwrap();
        assert_eq!(outcome, BmcOutcome::NoCounterexampleWithinBound);
        assert!(proof.is_some());

        let (_, proof) = run_with_proof(&circuit, 0, false).unwrap();
        assert!(proof.is_none());

        let sat_circuit = Circuit {
            max_var: 1,
            inputs: vec![],
            latches: vec![],
            outputs: vec![1],
            gates: vec![],
        };
        let (outcome, proof) = run_with_proof(&sat_circuit, 0, true).unwrap();
        assert_eq!(outcome, BmcOutcome::CounterexampleFound);
        assert!(proof.is_none());
    }
}
