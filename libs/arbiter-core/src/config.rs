// Runtime configuration for the sandbox client and grading engine.
use anyhow::{bail, Context, Result};
use arbiter_common::types::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fixed language/version pair sent to the execution sandbox, plus the file
/// name the harness is uploaded under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRuntime {
    pub name: Language,
    pub version: String,
    pub file_name: String,
}

/// Configuration injected into the grading engine at construction.
///
/// The endpoint is an explicit value rather than ambient global state so
/// tests can point the engine at a fake sandbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Base URL of the execution sandbox (Piston-compatible).
    pub endpoint: String,
    /// Hard cap on any single sandbox request; timeout is a transport failure.
    pub request_timeout_ms: u64,
    /// Courtesy delay between the reference and candidate runs.
    pub run_delay_ms: u64,
    /// Fuzz cases generated per grading attempt when the signature parses.
    pub fuzz_case_count: usize,
    pub languages: Vec<LanguageRuntime>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:2000".to_string(),
            request_timeout_ms: 15_000,
            run_delay_ms: 500,
            fuzz_case_count: 1,
            languages: vec![
                LanguageRuntime {
                    name: Language::Python,
                    version: "3.10.0".to_string(),
                    file_name: "solution.py".to_string(),
                },
                LanguageRuntime {
                    name: Language::Javascript,
                    version: "18.15.0".to_string(),
                    file_name: "solution.js".to_string(),
                },
            ],
        }
    }
}

impl SandboxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("sandbox config file not found: {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Get the runtime entry for a language, if one is configured.
    pub fn runtime_for(&self, language: Language) -> Option<&LanguageRuntime> {
        self.languages.iter().find(|r| r.name == language)
    }
}
