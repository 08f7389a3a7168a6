//! Error taxonomy for the grading pipeline.
//!
//! Only configuration-class failures surface as `Err`: a missing entry-point
//! mapping or reference solution means no execution can even be attempted,
//! and the submission boundary maps these to a 4xx. Every other failure mode
//! (sandbox unreachable, unparsable stdout, per-case harness errors) is
//! folded into an `ExecutionOutcome` or a `Verdict` so the boundary always
//! receives a verdict object, never an unhandled fault.

use arbiter_common::types::Language;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("no entry point configured for language '{0}'")]
    MissingEntryPoint(Language),
    #[error("no reference solution available for language '{0}'")]
    MissingReferenceSolution(Language),
    #[error("configuration error: {0}")]
    Config(String),
}
