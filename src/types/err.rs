/*!
Error types used in the library.

- Parse and translation errors are fatal for the check in which they occur.
- Solver-contract violations are guarded by invariants elsewhere and should not occur; when they
  do, they indicate a bug in this crate rather than in the circuit under check.

Names of the error enums overlap with the subsystem they come from. As such, `err::{self}` is
often used to prefix use of the types with `err::`.
*/

use std::fmt;

/// A union of varied error kinds, gathered behind a single enum so callers only need to match on
/// one type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An error while parsing an AIGER file.
    Parse(ParseError),

    /// A structural assumption about the circuit was violated during translation to CNF.
    Translation(TranslationError),

    /// The SAT solver contract was violated by a caller of the solver module.
    Solver(SolverError),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

impl From<TranslationError> for ErrorKind {
    fn from(e: TranslationError) -> Self {
        ErrorKind::Translation(e)
    }
}

impl From<SolverError> for ErrorKind {
    fn from(e: SolverError) -> Self {
        ErrorKind::Solver(e)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Parse(e) => write!(f, "parse error: {e}"),
            ErrorKind::Translation(e) => write!(f, "translation error: {e}"),
            ErrorKind::Solver(e) => write!(f, "solver error: {e}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// An error while reading an AIGER ASCII ("aag") file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The `aag M I L O A` header line was missing, malformed, or had the wrong literal tag.
    BadHeader(String),

    /// A literal, or a line of literals, could not be parsed where one was expected.
    BadLiteral(String),

    /// The file ended before all `I + L + O + A` lines declared in the header were read.
    UnexpectedEof,

    /// A literal for a variable beyond the header's declared maximum was used by a gate, latch,
    /// or input. Parsing fails rather than silently accepting an under-declared header.
    MaxLiteralMismatch {
        /// The `M` field from the header.
        header_max: usize,
        /// The largest even literal actually used by a gate or latch output.
        observed_max: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadHeader(s) => write!(f, "bad aag header: {s}"),
            ParseError::BadLiteral(s) => write!(f, "bad literal: {s}"),
            ParseError::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseError::MaxLiteralMismatch {
                header_max,
                observed_max,
            } => write!(
                f,
                "header declares maximum variable {header_max}, but the largest literal used is {observed_max}"
            ),
        }
    }
}

/// A structural assumption of the circuit-to-CNF encoder was violated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TranslationError {
    /// A latch's `q` output, or a gate's `out` literal, was negated. The encoder requires both to
    /// be even (non-negated) literals.
    NegatedOutput,

    /// The circuit did not have exactly one output, which the single bad-state encoder (`F`)
    /// requires.
    OutputNotSingular { count: usize },

    /// A literal was a constant (`0` or `1`) where a per-step variable was required, e.g. an
    /// attempt to time-shift a constant.
    ConstantNotShiftable,

    /// `VarTranslator::reset` was called twice with a different `numVars`.
    InconsistentReset { first: usize, second: usize },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::NegatedOutput => {
                write!(f, "gate or latch outputs are expected to be non-negated")
            }
            TranslationError::OutputNotSingular { count } => {
                write!(f, "exactly one output is supported, found {count}")
            }
            TranslationError::ConstantNotShiftable => {
                write!(f, "the constants True/False cannot be time-shifted")
            }
            TranslationError::InconsistentReset { first, second } => write!(
                f,
                "translator was reset with numVars={first} and later with numVars={second}"
            ),
        }
    }
}

/// A violation of the SAT solver contract: clauses referencing unallocated variables,
/// solving before any variables exist, or similar programmer errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolverError {
    /// A clause or assumption referenced a variable that was never allocated.
    UnknownVariable(u32),

    /// A proof traverser was installed after at least one variable had already been allocated.
    TraverserInstalledLate,

    /// `value`/`failed` queried before any `solve` call, or after the formula was modified.
    NoSolveYet,

    /// A proof traversal reached a vertex marked deleted, and the caller requested strict
    /// handling (`Config::tolerate_deleted_in_proof = false`) rather than substituting `false`.
    DeletedProofVertex(u32),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::UnknownVariable(v) => write!(f, "variable {v} was never allocated"),
            SolverError::TraverserInstalledLate => write!(
                f,
                "a proof traverser must be installed before any variable is allocated"
            ),
            SolverError::NoSolveYet => write!(f, "no solve has been performed yet"),
            SolverError::DeletedProofVertex(id) => write!(
                f,
                "proof references deleted vertex {id}, and strict handling was requested"
            ),
        }
    }
}
