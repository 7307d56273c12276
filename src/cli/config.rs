//! Options relevant only to the CLI binary, layered on top of the library's [`boumc::config::Config`].

use clap::ArgMatches;

use boumc::config::Config;

/// Where the AIGER input comes from.
#[derive(Clone, Debug)]
pub enum InputSource {
    Stdin,
    File(String),
}

/// A collection of configuration options relevant only to the CLI: I/O selection and mode
/// dispatch, as distinct from [`Config`], which the model-checking driver also needs.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub input: InputSource,
    pub dimacs: bool,
    pub parse_only: bool,
}

/// Builds the library [`Config`] and the CLI-only [`CliConfig`] from parsed arguments.
pub fn from_matches(matches: &ArgMatches) -> (Config, CliConfig) {
    let mut config = Config::default();

    if let Some(&bound) = matches.get_one::<usize>("bound") {
        config.bound = Some(bound);
    }
    if let Some(&interpolate) = matches.get_one::<bool>("interpolate") {
        config.interpolate = interpolate;
        if interpolate && matches.get_one::<usize>("bound").is_none() {
            config.bound = None;
        }
    }
    if let Some(&level) = matches.get_one::<u8>("debug") {
        config.debug_level = level;
    }
    if let Some(&proof) = matches.get_one::<bool>("proof") {
        config.dump_proof = proof;
    }

    let input = match matches.get_one::<String>("file").map(String::as_str) {
        None | Some("-") => InputSource::Stdin,
        Some(path) => InputSource::File(path.to_string()),
    };
    let dimacs = matches.get_one::<bool>("dimacs").copied().unwrap_or(false);
    let parse_only = matches
        .get_one::<bool>("parse_only")
        .copied()
        .unwrap_or(false);

    (config, CliConfig { input, dimacs, parse_only })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_args::cli;

    #[test]
    fn interpolate_flag_clears_the_bound() {
        let matches = cli().get_matches_from(["boumc", "-i"]);
        let (config, cli_config) = from_matches(&matches);
        assert!(config.interpolate);
        assert!(config.bound.is_none());
        assert!(!cli_config.dimacs);
    }

    #[test]
    fn explicit_bound_survives_the_interpolate_flag() {
        let matches = cli().get_matches_from(["boumc", "-k", "20", "-i"]);
        let (config, _cli_config) = from_matches(&matches);
        assert!(config.interpolate);
        assert_eq!(config.bound, Some(20));
    }

    #[test]
    fn default_input_is_stdin() {
        let matches = cli().get_matches_from(["boumc"]);
        let (_config, cli_config) = from_matches(&matches);
        assert!(matches!(cli_config.input, InputSource::Stdin));
    }

    #[test]
    fn explicit_file_path_is_honored() {
        let matches = cli().get_matches_from(["boumc", "-f", "circuit.aag"]);
        let (_config, cli_config) = from_matches(&matches);
        match cli_config.input {
            InputSource::File(p) => assert_eq!(p, "circuit.aag"),
            InputSource::Stdin => panic!("expected a file path"),
        }
    }
}
