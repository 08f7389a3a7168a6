//! Verdict computation - language-agnostic comparison logic.
//!
//! **Critical properties:**
//! - Knows nothing about HTTP or the sandbox.
//! - Knows nothing about driver templates.
//! - Pure function: (working test set, candidate outcome) → verdict.
//!
//! **Normalization rules:**
//! - Values that parse as JSON are re-serialized with canonical (sorted) key
//!   ordering, making comparison insensitive to key order and incidental
//!   formatting (`[0, 1]` vs `[0,1]`).
//! - Values that do not parse fall back to stripping all whitespace.
//! - Comparison is otherwise exact: case matters, values matter.
//!
//! **Grading rules:**
//! - A case whose expected value was never resolved (`None` or the literal
//!   string "null") is excluded: it contributes to neither pass nor fail and
//!   is subtracted from the reported total.
//! - Grading short-circuits on the first mismatch; only that case's snapshot
//!   is surfaced.
//! - Any non-Finished per-case status on a graded case is equivalent to a
//!   mismatch.
//! - A result index outside the request range, or reported twice, is a
//!   protocol violation and yields a RuntimeError verdict outright.

use arbiter_common::types::{
    CaseStatus, ExecutionOutcome, FailedCase, TestCase, Verdict, VerdictStatus,
};
use tracing::warn;

/// Canonicalize a textual value for comparison.
///
/// `serde_json` maps are backed by a `BTreeMap` (the `preserve_order`
/// feature must stay off), so re-serialization sorts object keys.
pub fn normalize(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value.to_string(),
        Err(_) => text.split_whitespace().collect(),
    }
}

/// Compare a candidate execution outcome against the working test set.
pub fn evaluate(cases: &[TestCase], outcome: &ExecutionOutcome) -> Verdict {
    let results = match outcome {
        ExecutionOutcome::Failed { error } => {
            warn!(error = %error, "candidate execution failed outright");
            return runtime_error_verdict(cases.len());
        }
        ExecutionOutcome::Completed(results) => results,
    };

    let mut passed = 0;
    let mut total = cases.len();
    let mut graded = vec![false; cases.len()];

    for result in results {
        let Some(case) = cases.get(result.id) else {
            warn!(index = result.id, "result index outside the request range");
            return runtime_error_verdict(cases.len());
        };
        if graded[result.id] {
            warn!(index = result.id, "result index reported more than once");
            return runtime_error_verdict(cases.len());
        }
        graded[result.id] = true;

        // Cases the reference run could not resolve exist only to stress
        // reference execution; they are never graded.
        let expected = match case.expected.as_deref() {
            None | Some("null") => {
                total = total.saturating_sub(1);
                continue;
            }
            Some(expected) => expected,
        };

        let expected = normalize(expected);
        let actual = normalize(result.actual.as_deref().unwrap_or(""));

        if result.status == CaseStatus::Finished && actual == expected {
            passed += 1;
        } else {
            return Verdict {
                status: VerdictStatus::WrongAnswer,
                passed,
                total,
                failed_case: Some(FailedCase {
                    input: case.input.clone(),
                    expected,
                    actual,
                }),
            };
        }
    }

    Verdict {
        status: VerdictStatus::Accepted,
        passed,
        total,
        failed_case: None,
    }
}

fn runtime_error_verdict(total: usize) -> Verdict {
    Verdict {
        status: VerdictStatus::RuntimeError,
        passed: 0,
        total,
        failed_case: None,
    }
}
