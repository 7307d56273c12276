/*!
The AIGER ASCII ("aag") format and the circuit it describes.

This is a peripheral module: it produces the [`Circuit`] value consumed by the core, but the
parsing itself is not part of the hard engineering this crate exists to demonstrate.

# Literal convention

A variable `v` (`1 ≤ v ≤ max_var`) is encoded as the literal `2*v` (the non-negated occurrence)
or `2*v + 1` (the negated occurrence). The literals `0` and `1` are the constants false and true.
*/

use std::io::BufRead;

use crate::types::err::ParseError;

/// An AND gate: `out = in1 ∧ in2`. `out` is always a non-negated literal (even number).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Gate {
    pub out: u32,
    pub in1: u32,
    pub in2: u32,
}

/// A one-bit register: a current value `q` (always non-negated) and a next-state literal.
/// Initialized to 0 on entry to the circuit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Latch {
    pub q: u32,
    pub next: u32,
}

/// An immutable, parsed sequential circuit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Circuit {
    /// The header's maximum variable index, `M`.
    pub max_var: usize,
    pub inputs: Vec<u32>,
    pub latches: Vec<Latch>,
    pub outputs: Vec<u32>,
    pub gates: Vec<Gate>,
}

impl Circuit {
    /// The largest literal that may occur anywhere in this circuit (`2 * max_var + 1`).
    pub fn last_lit(&self) -> usize {
        2 * self.max_var + 1
    }

    /// Parses an AIGER ASCII ("aag") circuit from a reader.
    ///
    /// The header is `aag M I L O A`. `I`, `L`, `O`, `A` lines follow in that order, each line
    /// holding one literal (inputs, outputs) or a fixed tuple of literals (latches: `q next`;
    /// gates: `out in1 in2`), whitespace-separated.
    pub fn from_aag<R: BufRead>(reader: R) -> Result<Circuit, ParseError> {
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or(ParseError::UnexpectedEof)?
            .map_err(|e| ParseError::BadHeader(e.to_string()))?;

        let mut header_fields = header_line.split_whitespace();
        if header_fields.next() != Some("aag") {
            return Err(ParseError::BadHeader(header_line));
        }

        let mut next_usize = || -> Result<usize, ParseError> {
            header_fields
                .next()
                .ok_or_else(|| ParseError::BadHeader(header_line.clone()))?
                .parse::<usize>()
                .map_err(|_| ParseError::BadHeader(header_line.clone()))
        };

        let max_var = next_usize()?;
        let num_inputs = next_usize()?;
        let num_latches = next_usize()?;
        let num_outputs = next_usize()?;
        let num_gates = next_usize()?;

        let mut read_literal = |lines: &mut std::io::Lines<R>| -> Result<u32, ParseError> {
            let line = lines
                .next()
                .ok_or(ParseError::UnexpectedEof)?
                .map_err(|e| ParseError::BadLiteral(e.to_string()))?;
            line.trim()
                .parse::<u32>()
                .map_err(|_| ParseError::BadLiteral(line))
        };

        let mut read_literals =
            |lines: &mut std::io::Lines<R>, count: usize| -> Result<Vec<u32>, ParseError> {
                let line = lines
                    .next()
                    .ok_or(ParseError::UnexpectedEof)?
                    .map_err(|e| ParseError::BadLiteral(e.to_string()))?;
                let mut fields = line.split_whitespace();
                let mut out = Vec::with_capacity(count);
                for _ in 0..count {
                    let field = fields
                        .next()
                        .ok_or_else(|| ParseError::BadLiteral(line.clone()))?;
                    out.push(
                        field
                            .parse::<u32>()
                            .map_err(|_| ParseError::BadLiteral(line.clone()))?,
                    );
                }
                Ok(out)
            };

        let mut inputs = Vec::with_capacity(num_inputs);
        for _ in 0..num_inputs {
            inputs.push(read_literal(&mut lines)?);
        }

        let mut latches = Vec::with_capacity(num_latches);
        for _ in 0..num_latches {
            let pair = read_literals(&mut lines, 2)?;
            latches.push(Latch {
                q: pair[0],
                next: pair[1],
            });
        }

        let mut outputs = Vec::with_capacity(num_outputs);
        for _ in 0..num_outputs {
            outputs.push(read_literal(&mut lines)?);
        }

        let mut gates = Vec::with_capacity(num_gates);
        for _ in 0..num_gates {
            let triple = read_literals(&mut lines, 3)?;
            gates.push(Gate {
                out: triple[0],
                in1: triple[1],
                in2: triple[2],
            });
        }

        let observed_max = latches
            .iter()
            .map(|l| (l.q / 2) as usize)
            .chain(gates.iter().map(|g| (g.out / 2) as usize))
            .chain(inputs.iter().map(|i| (i / 2) as usize))
            .max()
            .unwrap_or(0);

        if observed_max > max_var {
            return Err(ParseError::MaxLiteralMismatch {
                header_max: max_var,
                observed_max,
            });
        }

        Ok(Circuit {
            max_var,
            inputs,
            latches,
            outputs,
            gates,
        })
    }
}

/// `0`/`1` are the AIGER constants; everything else is `2*v (+1)` for a variable `v ≥ 1`.
pub fn is_constant(lit: u32) -> bool {
    lit == 0 || lit == 1
}

/// The variable of a literal (`lit / 2`), meaningless for the constants.
pub fn variable_of(lit: u32) -> u32 {
    lit / 2
}

/// Whether a literal is negated (the low bit is set).
pub fn is_negated(lit: u32) -> bool {
    lit % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(src: &str) -> Circuit {
        Circuit::from_aag(Cursor::new(src.as_bytes())).expect("valid aag")
    }

    #[test]
    fn constant_false_output() {
        let c = parse("aag 1 0 0 1 0\n0\n");
        assert_eq!(c.outputs, vec![0]);
        assert!(c.inputs.is_empty());
        assert!(c.latches.is_empty());
        assert!(c.gates.is_empty());
    }

    #[test]
    fn one_input_one_gate() {
        // `aag 2 1 0 1 1` : one input (var 1), one gate (var 2) = in ∧ in, output = gate.
        let c = parse("aag 2 1 0 1 1\n2\n4\n4 2 2\n");
        assert_eq!(c.inputs, vec![2]);
        assert_eq!(c.outputs, vec![4]);
        assert_eq!(
            c.gates,
            vec![Gate {
                out: 4,
                in1: 2,
                in2: 2
            }]
        );
    }

    #[test]
    fn one_latch() {
        let c = parse("aag 1 0 1 1 0\n2 2\n2\n");
        assert_eq!(
            c.latches,
            vec![Latch {
                q: 2,
                next: 2
            }]
        );
    }

    #[test]
    fn literal_beyond_the_header_maximum_is_rejected() {
        // Header claims max_var=1, but the gate's output is variable 2.
        let err = Circuit::from_aag(Cursor::new(
            b"aag 1 0 0 1 1\n4\n4 2 2\n".as_slice(),
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::MaxLiteralMismatch {
                header_max: 1,
                observed_max: 2,
            }
        );
    }

    #[test]
    fn bad_header_is_rejected() {
        assert!(Circuit::from_aag(Cursor::new(b"not-aag 1 0 0 1 0\n0\n".as_slice())).is_err());
    }

    #[test]
    fn truncated_input_is_rejected() {
        assert!(Circuit::from_aag(Cursor::new(b"aag 1 0 0 1 0\n".as_slice())).is_err());
    }

    #[test]
    fn literal_helpers() {
        assert!(is_constant(0));
        assert!(is_constant(1));
        assert!(!is_constant(2));
        assert_eq!(variable_of(4), 2);
        assert!(is_negated(5));
        assert!(!is_negated(4));
    }
}
