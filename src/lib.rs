/*!
A bounded and unbounded SAT-based model checker for sequential Boolean circuits in AIGER format.

Given a circuit's inputs, latches, AND gates, and a single designated bad-state output, this
library decides whether any input sequence can drive the circuit into a state where the bad
output evaluates to true. It answers one of three things: a counterexample trace exists within
some bound (`FAIL`), no bad state is reachable (`OK`), or a given bound was insufficient to tell
either way (`undecided`).

# Orientation

Two model-checking strategies sit on top of a shared pipeline:

- [`check::bmc`] — classical bounded model checking: unroll the circuit `k` steps and ask a SAT
  solver whether the bad state is reachable.
- [`check::mcmillan`] — unbounded checking via Craig interpolants extracted from the resolution
  proof of each unrolling, iterating a reachable-state over-approximation to a fixpoint.

Both are built from the same lower layers:
- [`aiger`] parses the AIGER ASCII ("aag") format into an immutable [`aiger::Circuit`].
- [`translate::VarTranslator`] is the bijection between `(AIGER literal, time step)` pairs and
  contiguous SAT solver variables.
- [`encode`] turns a circuit into CNF (`I`, `T`, `F`) against that bijection.
- [`cnf::ClauseSink`] is the single interface the encoder and interpolant builder write against,
  with buffered, solver-backed, and DIMACS-text implementations.
- [`sat`] is a self-contained proof-producing CDCL solver — the "external collaborator" this
  crate happens to embed rather than link against.
- [`interpolate`] walks a completed proof and builds a Craig interpolant from it.
- [`formula`] is an auxiliary AST-level Boolean formula and Tseitin transform, used only by the
  debug/rendering path; the core works directly on CNF.

# Example

```no_run
use boumc::aiger::Circuit;
use boumc::check::bmc;
use std::io::BufReader;

let file = std::fs::File::open("circuit.aag")?;
let circuit = Circuit::from_aag(BufReader::new(file))?;
match bmc::run(&circuit, 10)? {
    bmc::BmcOutcome::CounterexampleFound => println!("FAIL"),
    bmc::BmcOutcome::NoCounterexampleWithinBound => println!("OK (within bound)"),
}
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod aiger;
pub mod check;
pub mod cnf;
pub mod config;
pub mod encode;
pub mod formula;
pub mod interpolate;
pub mod sat;
pub mod translate;
pub mod types;
