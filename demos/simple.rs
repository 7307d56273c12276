//! Checks a tiny hand-written circuit with classical BMC, then again with unbounded
//! interpolation, and prints both verdicts.

use boumc::aiger::{Circuit, Gate, Latch};
use boumc::check::{bmc, mcmillan, Verdict};

fn main() {
    // One latch holding its own value (always 0), output is the latch: never reaches bad.
    let circuit = Circuit {
        max_var: 1,
        inputs: vec![],
        latches: vec![Latch { q: 2, next: 2 }],
        outputs: vec![2],
        gates: vec![],
    };

    for k in 0..5 {
        match bmc::run(&circuit, k).expect("encoding is well-formed") {
            bmc::BmcOutcome::CounterexampleFound => {
                println!("k={k}: FAIL");
                return;
            }
            bmc::BmcOutcome::NoCounterexampleWithinBound => println!("k={k}: no counterexample"),
        }
    }

    match mcmillan::run(&circuit, None, true).expect("encoding is well-formed") {
        Verdict::Ok => println!("interpolation: OK, bad state is unreachable"),
        Verdict::Fail { k } => println!("interpolation: FAIL at k={k}"),
        Verdict::Undecided { bound } => println!("interpolation: undecided up to {bound}"),
    }

    // A circuit with an immediate counterexample, for contrast.
    let unsafe_circuit = Circuit {
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
    match mcmillan::run(&unsafe_circuit, None, true).expect("encoding is well-formed") {
        Verdict::Fail { k } => println!("unsafe circuit: FAIL at k={k}"),
        other => println!("unsafe circuit: unexpected verdict {other:?}"),
    }
}
