//! The `clap` builder-API command line, mirroring the reference solver's CLI front end rather
//! than its derive macros.

use clap::{value_parser, Arg, Command};

pub fn cli() -> Command {
    Command::new("boumc")
        .about("Bounded and unbounded SAT-based model checker for AIGER circuits")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("bound")
                .short('k')
                .value_name("N")
                .value_parser(value_parser!(usize))
                .required(false)
                .num_args(1)
                .help("Bound to check up to. Default: 10."),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PATH")
                .required(false)
                .num_args(1)
                .help("AIGER ASCII (.aag) input file. Default, or '-': stdin."),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .value_name("L")
                .value_parser(value_parser!(u8))
                .required(false)
                .num_args(0..=1)
                .default_missing_value("1")
                .help("Debug verbosity. A bare '-d' is level 1."),
        )
        .arg(
            Arg::new("dimacs")
                .long("dimacs")
                .value_parser(value_parser!(bool))
                .required(false)
                .num_args(0)
                .help("Emit the bound-k translation as DIMACS and exit."),
        )
        .arg(
            Arg::new("parse_only")
                .long("parse-only")
                .value_parser(value_parser!(bool))
                .required(false)
                .num_args(0)
                .help("Parse the circuit and exit without checking it."),
        )
        .arg(
            Arg::new("proof")
                .short('p')
                .long("proof")
                .value_parser(value_parser!(bool))
                .required(false)
                .num_args(0)
                .help("Dump the recorded resolution proof on an unsatisfiable solve."),
        )
        .arg(
            Arg::new("interpolate")
                .short('i')
                .long("interpolate")
                .value_parser(value_parser!(bool))
                .required(false)
                .num_args(0)
                .help("Run unbounded McMillan-style interpolation instead of classical BMC."),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bound_is_absent_until_parsed() {
        let matches = cli().get_matches_from(["boumc"]);
        assert!(matches.get_one::<usize>("bound").is_none());
    }

    #[test]
    fn bound_and_interpolate_flags_parse() {
        let matches = cli().get_matches_from(["boumc", "-k", "7", "-i"]);
        assert_eq!(matches.get_one::<usize>("bound"), Some(&7));
        assert_eq!(matches.get_one::<bool>("interpolate"), Some(&true));
    }

    #[test]
    fn bare_debug_flag_defaults_to_level_one() {
        let matches = cli().get_matches_from(["boumc", "-d"]);
        assert_eq!(matches.get_one::<u8>("debug"), Some(&1));
    }
}
