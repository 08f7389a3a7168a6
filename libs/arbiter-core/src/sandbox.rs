//! Sandbox execution client.
//!
//! **Core responsibility:** send a synthesized harness to the external
//! untrusted-code execution service and turn its raw response into an
//! `ExecutionOutcome`.
//!
//! **Critical architectural boundary:**
//! - The client knows HOW to reach the sandbox and decode its output.
//! - The client does NOT know scoring rules or test-case semantics.
//! - Every failure mode (non-2xx, transport error, undecodable stdout) is
//!   returned as `ExecutionOutcome::Failed`, never propagated as an
//!   unhandled fault; raw stdout/stderr are preserved for diagnosis.

use crate::config::SandboxConfig;
use crate::errors::JudgeError;
use arbiter_common::types::{CaseResult, ExecutionOutcome, Language};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ExecuteRequest {
    language: String,
    version: String,
    files: Vec<FilePayload>,
}

#[derive(Debug, Serialize)]
struct FilePayload {
    name: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    run: Option<RunOutput>,
}

#[derive(Debug, Default, Deserialize)]
struct RunOutput {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
}

/// Client for a Piston-compatible execution endpoint.
///
/// The endpoint and the language→version mapping are injected at
/// construction; tests substitute a fake sandbox by pointing the config at a
/// local mock server.
pub struct SandboxClient {
    http: reqwest::Client,
    endpoint: String,
    versions: HashMap<Language, String>,
}

impl SandboxClient {
    pub fn new(config: &SandboxConfig) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| JudgeError::Config(format!("failed to build HTTP client: {}", e)))?;

        let versions = config
            .languages
            .iter()
            .map(|r| (r.name, r.version.clone()))
            .collect();

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            versions,
        })
    }

    /// Execute a harness program and extract the structured result line.
    ///
    /// Never returns an error: timeouts, connection failures, non-2xx
    /// responses and undecodable output all map to `Failed`.
    pub async fn execute(
        &self,
        language: Language,
        source: &str,
        file_name: &str,
    ) -> ExecutionOutcome {
        let Some(version) = self.versions.get(&language) else {
            return ExecutionOutcome::Failed {
                error: format!("no sandbox runtime configured for language '{}'", language),
            };
        };

        let url = format!("{}/api/v2/execute", self.endpoint);
        let request = ExecuteRequest {
            language: language.to_string(),
            version: version.clone(),
            files: vec![FilePayload {
                name: file_name.to_string(),
                content: source.to_string(),
            }],
        };

        debug!(
            language = %language,
            version = %version,
            source_size = source.len(),
            "dispatching harness to sandbox"
        );

        let response = match self.http.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "sandbox transport failure");
                return ExecutionOutcome::Failed {
                    error: format!("execution failed: {}", e),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            warn!(status = %status, "sandbox returned an error response");
            return ExecutionOutcome::Failed {
                error: format!("sandbox error: {} {}", status, body),
            };
        }

        let payload: ExecuteResponse = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                return ExecutionOutcome::Failed {
                    error: format!("sandbox response decoding failed: {}", e),
                }
            }
        };

        let run = payload.run.unwrap_or_default();
        if !run.stdout.trim().is_empty() {
            extract_result_line(&run.stdout, &run.stderr)
        } else if !run.stderr.trim().is_empty() {
            ExecutionOutcome::Failed { error: run.stderr }
        } else {
            ExecutionOutcome::Failed {
                error: "no output from execution".to_string(),
            }
        }
    }
}

/// The harness reserves the last non-empty stdout line for the JSON result
/// array; everything before it is the user's own output and is irrelevant to
/// extraction.
fn extract_result_line(stdout: &str, stderr: &str) -> ExecutionOutcome {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    match serde_json::from_str::<Vec<CaseResult>>(line.trim()) {
        Ok(results) => ExecutionOutcome::Completed(results),
        Err(_) => ExecutionOutcome::Failed {
            error: format!("output parsing failed: {} | stderr: {}", stdout, stderr),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_common::types::CaseStatus;

    fn config_for(endpoint: &str) -> SandboxConfig {
        SandboxConfig {
            endpoint: endpoint.to_string(),
            request_timeout_ms: 2_000,
            ..SandboxConfig::default()
        }
    }

    #[tokio::test]
    async fn test_result_line_is_last_nonempty_stdout_line() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v2/execute")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"run": {"stdout": "debug noise\nmore noise\n[{\"status\": \"Finished\", \"id\": 0, \"actual\": \"[0,1]\"}]\n", "stderr": ""}}"#,
            )
            .create_async()
            .await;

        let client = SandboxClient::new(&config_for(&server.url())).unwrap();
        let outcome = client
            .execute(Language::Python, "print('x')", "solution.py")
            .await;

        match outcome {
            ExecutionOutcome::Completed(results) => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].status, CaseStatus::Finished);
                assert_eq!(results[0].actual.as_deref(), Some("[0,1]"));
            }
            other => panic!("expected completed outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_failed_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v2/execute")
            .with_status(500)
            .with_body("internal sandbox failure")
            .create_async()
            .await;

        let client = SandboxClient::new(&config_for(&server.url())).unwrap();
        let outcome = client.execute(Language::Python, "x", "solution.py").await;

        match outcome {
            ExecutionOutcome::Failed { error } => {
                assert!(error.contains("sandbox error: 500"));
                assert!(error.contains("internal sandbox failure"));
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparsable_stdout_preserves_raw_streams() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v2/execute")
            .with_status(200)
            .with_body(r#"{"run": {"stdout": "Traceback (most recent call last)", "stderr": "NameError: boom"}}"#)
            .create_async()
            .await;

        let client = SandboxClient::new(&config_for(&server.url())).unwrap();
        let outcome = client.execute(Language::Python, "x", "solution.py").await;

        match outcome {
            ExecutionOutcome::Failed { error } => {
                assert!(error.contains("output parsing failed"));
                assert!(error.contains("Traceback (most recent call last)"));
                assert!(error.contains("NameError: boom"));
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stderr_only_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v2/execute")
            .with_status(200)
            .with_body(r#"{"run": {"stdout": "", "stderr": "SyntaxError: invalid syntax"}}"#)
            .create_async()
            .await;

        let client = SandboxClient::new(&config_for(&server.url())).unwrap();
        let outcome = client.execute(Language::Python, "x", "solution.py").await;

        match outcome {
            ExecutionOutcome::Failed { error } => {
                assert_eq!(error, "SyntaxError: invalid syntax");
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_run_reports_no_output() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v2/execute")
            .with_status(200)
            .with_body(r#"{"run": {"stdout": "", "stderr": ""}}"#)
            .create_async()
            .await;

        let client = SandboxClient::new(&config_for(&server.url())).unwrap();
        let outcome = client.execute(Language::Python, "x", "solution.py").await;

        match outcome {
            ExecutionOutcome::Failed { error } => {
                assert_eq!(error, "no output from execution");
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_failure() {
        // Port 1 is reserved; the connection is refused immediately.
        let client = SandboxClient::new(&config_for("http://127.0.0.1:1")).unwrap();
        let outcome = client.execute(Language::Python, "x", "solution.py").await;

        match outcome {
            ExecutionOutcome::Failed { error } => {
                assert!(error.contains("execution failed"));
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_language_is_rejected_without_a_request() {
        let config = SandboxConfig {
            languages: Vec::new(),
            ..config_for("http://127.0.0.1:1")
        };
        let client = SandboxClient::new(&config).unwrap();
        let outcome = client.execute(Language::Python, "x", "solution.py").await;

        match outcome {
            ExecutionOutcome::Failed { error } => {
                assert!(error.contains("no sandbox runtime configured"));
            }
            other => panic!("expected failed outcome, got {:?}", other),
        }
    }
}
