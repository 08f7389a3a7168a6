//! Online-judge execution core.
//!
//! Given a candidate's source for a coding-interview problem, this crate
//! synthesizes a runnable harness around it, executes both the reference and
//! candidate solutions in an external sandbox, and computes a pass/fail
//! verdict with diagnostics. It is invoked as a library from the
//! submission-handling boundary; there is no CLI or server surface here.

pub mod config;
pub mod driver;
pub mod errors;
pub mod evaluator;
pub mod fuzz;
pub mod grader;
pub mod sandbox;
pub mod signature;
pub mod submission;


pub use config::{LanguageRuntime, SandboxConfig};
pub use errors::JudgeError;
pub use grader::Grader;
pub use sandbox::SandboxClient;
pub use submission::{submit, MasteryUpdater, SubmissionStore};
