/*!
The circuit-to-CNF encoder: turns a parsed [`Circuit`] into clauses over a
[`VarTranslator`]'s time-indexed variables, emitted into any [`ClauseSink`].

Every emitter here assumes `translator` has already been reset for the number of variables this
circuit needs (`circuit.max_var`) and a bound large enough to cover the steps being encoded.
*/

use crate::aiger::{self, Circuit, Gate, Latch};
use crate::cnf::ClauseSink;
use crate::translate::VarTranslator;
use crate::types::err::TranslationError;

/// `x ↔ (y ∧ z)` in CNF, where `x` is the gate's output literal, `y`/`z` its inputs, at `step`.
pub fn and_gates(
    sink: &mut impl ClauseSink,
    translator: &VarTranslator,
    circuit: &Circuit,
    step: usize,
) -> Result<(), TranslationError> {
    for gate in &circuit.gates {
        emit_and_gate(sink, translator, gate, step)?;
    }
    Ok(())
}

fn emit_and_gate(
    sink: &mut impl ClauseSink,
    translator: &VarTranslator,
    gate: &Gate,
    step: usize,
) -> Result<(), TranslationError> {
    if aiger::is_negated(gate.out) {
        return Err(TranslationError::NegatedOutput);
    }
    let x = translator.to_lit(gate.out, step);
    let y = translator.to_lit(gate.in1, step);
    let z = translator.to_lit(gate.in2, step);
    sink.add_binary(!x, y);
    sink.add_binary(!x, z);
    sink.add_ternary(!y, !z, x);
    Ok(())
}

fn require_non_negated_q(latch: &Latch) -> Result<(), TranslationError> {
    if aiger::is_negated(latch.q) {
        return Err(TranslationError::NegatedOutput);
    }
    Ok(())
}

/// `I(sink, V)`: every latch initialized to `0`, plus the gate network at step `0`.
pub fn initial_state(
    sink: &mut impl ClauseSink,
    translator: &VarTranslator,
    circuit: &Circuit,
) -> Result<(), TranslationError> {
    for latch in &circuit.latches {
        require_non_negated_q(latch)?;
        sink.add_unit(!translator.to_lit(latch.q, 0));
    }
    and_gates(sink, translator, circuit, 0)
}

/// `T(sink, V, step)`: the transition from `step` to `step+1` — each latch's next-state value
/// becomes its value at `step+1`, plus the gate network at `step+1`.
pub fn transition(
    sink: &mut impl ClauseSink,
    translator: &VarTranslator,
    circuit: &Circuit,
    step: usize,
) -> Result<(), TranslationError> {
    for latch in &circuit.latches {
        require_non_negated_q(latch)?;
        let q_next_step = translator.to_lit(latch.q, step + 1);
        let next_value = translator.to_lit(latch.next, step);
        sink.add_binary(!q_next_step, next_value);
        sink.add_binary(q_next_step, !next_value);
    }
    and_gates(sink, translator, circuit, step + 1)
}

/// `F(sink, V, from, to)`: the bad state is reached if the (sole) output literal is true at any
/// step in `[from, to]`.
pub fn bad_state(
    sink: &mut impl ClauseSink,
    translator: &VarTranslator,
    circuit: &Circuit,
    from: usize,
    to: usize,
) -> Result<(), TranslationError> {
    if circuit.outputs.len() != 1 {
        return Err(TranslationError::OutputNotSingular {
            count: circuit.outputs.len(),
        });
    }
    let output = circuit.outputs[0];
    let disjuncts = (from..=to)
        .map(|step| translator.to_lit(output, step))
        .collect();
    sink.add_clause(disjuncts);
    Ok(())
}

/// `to_sat(sink, V, k)`: the full classical BMC encoding — `I`, then `T(0)..T(k-1)`, then
/// `F(0, k)`.
pub fn to_sat(
    sink: &mut impl ClauseSink,
    translator: &VarTranslator,
    circuit: &Circuit,
    k: usize,
) -> Result<(), TranslationError> {
    initial_state(sink, translator, circuit)?;
    for step in 0..k {
        transition(sink, translator, circuit, step)?;
    }
    bad_state(sink, translator, circuit, 0, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::SolverSink;
    use crate::sat::{SolveResult, Solver};

    fn circuit_with_single_gate() -> Circuit {
        // one input (var 1), one AND gate out = in ∧ in (var 2), output = gate.
        Circuit {
            max_var: 2,
            inputs: vec![2],
            latches: vec![],
            outputs: vec![4],
            gates: vec![Gate {
                out: 4,
                in1: 2,
                in2: 2,
            }],
        }
    }

    #[test]
    fn one_step_counterexample_is_satisfiable() {
        let circuit = circuit_with_single_gate();
        let mut solver = Solver::new();
        let mut translator = VarTranslator::new();
        translator.reset(&mut solver, circuit.max_var, 0).unwrap();

        {
            let mut sink = SolverSink::new(&mut solver, true);
            to_sat(&mut sink, &translator, &circuit, 0).unwrap();
        }
        assert_eq!(solver.solve(&[translator.true_lit()]), SolveResult::Satisfiable);
    }

    #[test]
    fn constant_false_output_is_unsatisfiable_at_any_bound() {
        let circuit = Circuit {
            max_var: 1,
            inputs: vec![],
            latches: vec![],
            outputs: vec![0],
            gates: vec![],
        };
        let mut solver = Solver::new();
        let mut translator = VarTranslator::new();
        translator.reset(&mut solver, 1, 3).unwrap();

        {
            let mut sink = SolverSink::new(&mut solver, true);
            to_sat(&mut sink, &translator, &circuit, 3).unwrap();
        }
        assert_eq!(
            solver.solve(&[translator.true_lit()]),
            SolveResult::Unsatisfiable
        );
    }

    #[test]
    fn constant_true_output_is_satisfiable_at_k0() {
        let circuit = Circuit {
            max_var: 1,
            inputs: vec![],
            latches: vec![],
            outputs: vec![1],
            gates: vec![],
        };
        let mut solver = Solver::new();
        let mut translator = VarTranslator::new();
        translator.reset(&mut solver, 1, 0).unwrap();

        {
            let mut sink = SolverSink::new(&mut solver, true);
            to_sat(&mut sink, &translator, &circuit, 0).unwrap();
        }
        assert_eq!(solver.solve(&[translator.true_lit()]), SolveResult::Satisfiable);
    }

    #[test]
    fn negated_gate_output_is_rejected() {
        let circuit = Circuit {
            max_var: 2,
            inputs: vec![2],
            latches: vec![],
            outputs: vec![5],
            gates: vec![Gate {
                out: 5,
                in1: 2,
                in2: 2,
            }],
        };
        let mut solver = Solver::new();
        let mut translator = VarTranslator::new();
        translator.reset(&mut solver, circuit.max_var, 0).unwrap();
        let mut sink = SolverSink::new(&mut solver, true);
        assert!(to_sat(&mut sink, &translator, &circuit, 0).is_err());
    }

    #[test]
    fn multiple_outputs_are_rejected_by_bad_state() {
        let circuit = Circuit {
            max_var: 0,
            inputs: vec![],
            latches: vec![],
            outputs: vec![0, 1],
            gates: vec![],
        };
        let mut solver = Solver::new();
        let mut translator = VarTranslator::new();
        translator.reset(&mut solver, 1, 0).unwrap();
        let mut sink = SolverSink::new(&mut solver, true);
        assert!(bad_state(&mut sink, &translator, &circuit, 0, 0).is_err());
    }
}
