//! Entrypoint to the CLI: parses arguments, reads an AIGER circuit, and dispatches to
//! parse-only / DIMACS-dump / classical BMC / McMillan interpolation.

use std::fmt;
use std::io;

mod config;
mod parse_args;

use config::{from_matches, InputSource};

use boumc::aiger::Circuit;
use boumc::check::{bmc, mcmillan, Verdict};
use boumc::cnf::DimacsSink;
use boumc::encode;
use boumc::sat::{Lit, ProofDag, ProofTraverser, VertexId};
use boumc::translate::VarTranslator;
use boumc::types::err::ErrorKind;

/// Errors the CLI itself can produce, layered over the library's [`ErrorKind`] with the I/O
/// failures that only arise once a path has been chosen.
enum CliError {
    Io(io::Error),
    Check(ErrorKind),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Check(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<ErrorKind> for CliError {
    fn from(e: ErrorKind) -> Self {
        CliError::Check(e)
    }
}

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let matches = parse_args::cli().get_matches();
    let (cfg, cli_cfg) = from_matches(&matches);
    log::set_max_level(cfg.log_filter());

    let circuit = match read_circuit(&cli_cfg.input) {
        Ok(c) => c,
        Err(e) => {
            println!("c {e}");
            std::process::exit(1);
        }
    };

    if cli_cfg.parse_only {
        println!(
            "c parsed: max_var={} inputs={} latches={} gates={} outputs={}",
            circuit.max_var,
            circuit.inputs.len(),
            circuit.latches.len(),
            circuit.gates.len(),
            circuit.outputs.len()
        );
        return;
    }

    if cli_cfg.dimacs {
        let k = cfg.bound.unwrap_or(0);
        if let Err(e) = dump_dimacs(&circuit, k) {
            println!("c {e}");
            std::process::exit(1);
        }
        return;
    }

    let verdict = if cfg.interpolate {
        mcmillan::run(&circuit, cfg.bound, cfg.tolerate_deleted_in_proof).map_err(CliError::from)
    } else {
        run_bounded(&circuit, cfg.bound.unwrap_or(10), cfg.dump_proof).map_err(CliError::from)
    };

    match verdict {
        Ok(Verdict::Fail { k }) => {
            println!("FAIL");
            println!("c counterexample of length {k}");
            std::process::exit(0);
        }
        Ok(Verdict::Ok) => {
            println!("OK");
            std::process::exit(0);
        }
        Ok(Verdict::Undecided { bound }) => {
            println!("c undecided up to bound {bound}");
            std::process::exit(0);
        }
        Err(e) => {
            println!("c {e}");
            std::process::exit(1);
        }
    }
}

/// Classical BMC, re-run at every `k` from `0` up to `bound`, since a single call only answers
/// the question for one `k`. When `dump_proof` is set, the refutation proof of the last
/// unsatisfiable bound checked is printed to stdout.
fn run_bounded(circuit: &Circuit, bound: usize, dump_proof: bool) -> Result<Verdict, ErrorKind> {
    for k in 0..=bound {
        let (outcome, proof) = bmc::run_with_proof(circuit, k, dump_proof)?;
        match outcome {
            bmc::BmcOutcome::CounterexampleFound => return Ok(Verdict::Fail { k }),
            bmc::BmcOutcome::NoCounterexampleWithinBound => {
                if let Some(proof) = proof {
                    print_proof(&proof);
                }
            }
        }
    }
    Ok(Verdict::Undecided { bound })
}

/// Renders a completed proof DAG as one line per vertex: `c proof <id>: root A|B <clause>` or
/// `c proof <id>: chain <antecedents> on <pivots>`.
fn print_proof(proof: &ProofDag) {
    let mut printer = ProofPrinter { next_id: 0 };
    proof.replay(&mut printer);
}

struct ProofPrinter {
    next_id: VertexId,
}

impl ProofTraverser for ProofPrinter {
    fn root(&mut self, clause: &[Lit], part_of_a: bool) {
        let side = if part_of_a { "A" } else { "B" };
        let lits: Vec<String> = clause.iter().map(|l| l.to_string()).collect();
        println!("c proof {}: root {side} {}", self.next_id, lits.join(" "));
        self.next_id += 1;
    }

    fn chain(&mut self, antecedents: &[VertexId], pivots: &[u32]) {
        let ante: Vec<String> = antecedents.iter().map(|a| a.to_string()).collect();
        let piv: Vec<String> = pivots.iter().map(|p| p.to_string()).collect();
        println!(
            "c proof {}: chain {} on {}",
            self.next_id,
            ante.join(" "),
            piv.join(" ")
        );
        self.next_id += 1;
    }

    fn deleted(&mut self, id: VertexId) {
        println!("c proof {}: deleted", id);
        self.next_id += 1;
    }

    fn done(&mut self) {}
}

fn read_circuit(input: &InputSource) -> Result<Circuit, CliError> {
    match input {
        InputSource::Stdin => {
            let stdin = io::stdin();
            Ok(Circuit::from_aag(stdin.lock())?)
        }
        InputSource::File(path) => {
            let file = std::fs::File::open(path)?;
            Ok(Circuit::from_aag(io::BufReader::new(file))?)
        }
    }
}

fn dump_dimacs(circuit: &Circuit, k: usize) -> Result<(), ErrorKind> {
    let stdout = io::stdout();
    let mut sink = DimacsSink::new(stdout.lock());
    let mut translator = VarTranslator::new();
    // `reset` only needs a `Solver` to record the variable range on; a DIMACS sink has no
    // solver of its own, so a throwaway one is used purely to satisfy the translator's contract.
    let mut dummy = boumc::sat::Solver::new();
    translator.reset(&mut dummy, circuit.max_var, k)?;
    encode::to_sat(&mut sink, &translator, circuit, k)?;
    Ok(())
}
