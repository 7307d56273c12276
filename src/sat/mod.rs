/*!
A self-contained, proof-producing SAT engine.

The rest of the crate treats the SAT solver as an external collaborator reached only through
clause addition, variable allocation, assumption-based solving, and proof retrieval — this module
is that collaborator, implemented in-crate (see `solver`'s module doc comment for why). Nothing
outside `sat::` reaches past [`Solver`], [`Lit`], [`Var`], [`ProofDag`], or [`ProofTraverser`].
*/

pub mod activity;
pub mod clause;
pub mod literal;
pub mod proof;
pub mod restart;
pub mod solver;

pub use clause::ClauseId;
pub use literal::{Lit, Var};
pub use proof::{ProofDag, ProofTraverser, Vertex, VertexId};
pub use solver::{SolveResult, Solver};
