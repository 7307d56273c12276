/*!
Configuration of a check.

All configuration needed by the model-checking driver, the encoder, and the embedded SAT engine
is gathered here so it can be threaded through a run without each module reaching for globals.
*/

/// The primary configuration structure, threaded through the CLI, the driver, and the embedded
/// SAT engine.
#[derive(Clone, Debug)]
pub struct Config {
    /// The bound `k` passed with `-k`. `None` means "no bound", i.e. interpolation runs until a
    /// fixpoint or a counterexample, and classical BMC is not applicable.
    pub bound: Option<usize>,

    /// Whether unbounded (McMillan interpolation) mode is requested (`-i`/`--interpolate`).
    pub interpolate: bool,

    /// Debug verbosity requested with `-d[L]`. `0` is silent.
    pub debug_level: u8,

    /// Whether to print the recorded proof DAG after an UNSAT solve (`-p`/`--proof`).
    pub dump_proof: bool,

    /// Whether deleted-clause references in a proof chain should be tolerated, substituting
    /// `false` for the missing vertex, rather than treated as a hard error.
    pub tolerate_deleted_in_proof: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bound: Some(10),
            interpolate: false,
            debug_level: 0,
            dump_proof: false,
            tolerate_deleted_in_proof: true,
        }
    }
}

impl Config {
    /// Maps `debug_level` to the filter the `log` facade should cap output at: `0` is silent,
    /// and each further level widens towards `Trace`.
    pub fn log_filter(&self) -> log::LevelFilter {
        match self.debug_level {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
