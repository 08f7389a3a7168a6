//! Shared data model for the judge pipeline.
//!
//! These types cross every layer boundary: the driver synthesizer embeds
//! `TestCase` inputs, the sandbox client decodes `CaseResult` arrays from the
//! harness result line, and the grading engine folds both into a `Verdict`
//! for the submission boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Languages the judge can synthesize drivers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Javascript => write!(f, "javascript"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::Javascript),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// A single test case in the working set for one grading attempt.
///
/// `input` is the textual assignment form `name = value, name2 = value2`.
/// `expected == None` means "unknown, to be back-filled by the reference run";
/// a case whose expected value is never resolved is excluded from grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected: Option<String>,
}

/// The persisted shape of a human-authored sample case.
///
/// Older problem data stores the answer under `output`, newer data under
/// `expected`; normalization prefers `expected` and falls back to `output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleCase {
    pub input: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

impl SampleCase {
    pub fn to_test_case(&self) -> TestCase {
        TestCase {
            input: self.input.clone(),
            expected: self.expected.clone().or_else(|| self.output.clone()),
        }
    }
}

/// Per-case status reported by a synthesized harness.
///
/// The serde names are the wire strings the drivers print; they must not
/// change without regenerating every driver template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "Finished")]
    Finished,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
    #[serde(rename = "Runtime Error (Input Parsing)")]
    InputParsingError,
    #[serde(rename = "Method Not Found")]
    MethodNotFound,
    #[serde(rename = "Setup Error")]
    SetupError,
}

/// One entry of the JSON result array a harness prints as its last line.
///
/// `id` echoes the case's position in the execution request; the grading
/// engine trusts it to re-associate results with the original cases.
/// Drivers attach extra fields (`expected`, `passed`, `trace`) which are
/// ignored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    #[serde(default)]
    pub id: usize,
    pub status: CaseStatus,
    #[serde(default)]
    pub actual: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result of one sandbox execution: either the ordered per-case results, or
/// a top-level failure (sandbox unreachable, non-2xx, unparsable stdout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    Completed(Vec<CaseResult>),
    Failed { error: String },
}

/// Final classification of a graded submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictStatus {
    #[serde(rename = "AC")]
    Accepted,
    #[serde(rename = "WA")]
    WrongAnswer,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
}

/// Snapshot of the first mismatching case, with both sides normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCase {
    pub input: String,
    pub expected: String,
    pub actual: String,
}

/// The verdict returned to the submission boundary.
///
/// `total` may be less than the size of the working set: cases whose expected
/// value could not be established by the reference run are excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub passed: usize,
    pub total: usize,
    pub failed_case: Option<FailedCase>,
}

/// Per-language entry point names and raw definition headers for a problem.
/// Immutable once associated with the problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodSignature {
    pub entry_points: HashMap<Language, String>,
    pub definitions: HashMap<Language, String>,
}

impl MethodSignature {
    pub fn entry_point(&self, language: Language) -> Option<&str> {
        self.entry_points.get(&language).map(String::as_str)
    }

    pub fn definition(&self, language: Language) -> Option<&str> {
        self.definitions.get(&language).map(String::as_str)
    }
}

/// Everything the grading engine reads about a problem. Supplied by the
/// problem store at the submission boundary; the engine never writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub slug: String,
    pub signature: MethodSignature,
    pub samples: Vec<SampleCase>,
    pub reference_solutions: HashMap<Language, String>,
}

/// Audit record handed to the submission store after grading completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub language: Language,
    pub source: String,
    pub verdict: Verdict,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(problem_id: Uuid, language: Language, source: String, verdict: Verdict) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_id,
            language,
            source,
            verdict,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_round_trip() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!(
            "JavaScript".parse::<Language>().unwrap(),
            Language::Javascript
        );
        assert_eq!(Language::Python.to_string(), "python");
        assert!("ruby".parse::<Language>().is_err());
    }

    #[test]
    fn test_case_status_wire_strings() {
        let parsed: CaseStatus =
            serde_json::from_str("\"Runtime Error (Input Parsing)\"").unwrap();
        assert_eq!(parsed, CaseStatus::InputParsingError);

        let parsed: CaseStatus = serde_json::from_str("\"Method Not Found\"").unwrap();
        assert_eq!(parsed, CaseStatus::MethodNotFound);
    }

    #[test]
    fn test_case_result_ignores_driver_extras() {
        let raw = r#"{"status": "Finished", "id": 2, "actual": "[0,1]", "expected": "[0,1]", "passed": false}"#;
        let result: CaseResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.id, 2);
        assert_eq!(result.status, CaseStatus::Finished);
        assert_eq!(result.actual.as_deref(), Some("[0,1]"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_case_result_defaults_missing_id() {
        // A JS setup failure is reported as a bare status/error pair.
        let raw = r#"{"status": "Setup Error", "error": "boom"}"#;
        let result: CaseResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.id, 0);
        assert_eq!(result.status, CaseStatus::SetupError);
    }

    #[test]
    fn test_verdict_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&VerdictStatus::Accepted).unwrap(),
            "\"AC\""
        );
        assert_eq!(
            serde_json::to_string(&VerdictStatus::RuntimeError).unwrap(),
            "\"Runtime Error\""
        );
    }

    #[test]
    fn test_sample_case_normalization_prefers_expected() {
        let sample = SampleCase {
            input: "n = 1".to_string(),
            expected: Some("2".to_string()),
            output: Some("3".to_string()),
        };
        assert_eq!(sample.to_test_case().expected.as_deref(), Some("2"));

        let legacy = SampleCase {
            input: "n = 1".to_string(),
            expected: None,
            output: Some("3".to_string()),
        };
        assert_eq!(legacy.to_test_case().expected.as_deref(), Some("3"));
    }
}
