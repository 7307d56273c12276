/*!
The model-checking driver: classical bounded model checking and the McMillan interpolation
loop. Both are thin orchestrations over [`crate::encode`], [`crate::translate::VarTranslator`],
and [`crate::sat::Solver`]; neither reaches into the solver's internals.
*/

pub mod bmc;
pub mod mcmillan;

pub use mcmillan::Verdict;
