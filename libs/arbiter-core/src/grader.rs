//! Grading engine - high-level orchestration.
//!
//! **Architecture:**
//! 1. Assemble the working test set (persisted samples + fresh fuzz cases).
//! 2. Run the reference solution through driver synthesis and the sandbox,
//!    back-filling unresolved expected values from its Finished results.
//! 3. Run the candidate solution against the same working set.
//! 4. Hand both to the evaluator for the verdict.
//!
//! The reference and candidate runs are strictly sequential: the candidate
//! comparison needs the reference's back-filled expected values. Each
//! grading attempt builds its own working set and harnesses; no state is
//! shared across attempts.

use crate::config::SandboxConfig;
use crate::errors::JudgeError;
use crate::sandbox::SandboxClient;
use crate::{driver, evaluator, fuzz, signature};
use arbiter_common::types::{
    CaseResult, CaseStatus, ExecutionOutcome, Language, Problem, TestCase, Verdict,
};
use std::time::Duration;
use tracing::{info, warn};

pub struct Grader {
    sandbox: SandboxClient,
    config: SandboxConfig,
}

impl Grader {
    pub fn new(config: SandboxConfig) -> Result<Self, JudgeError> {
        let sandbox = SandboxClient::new(&config)?;
        Ok(Self { sandbox, config })
    }

    /// Grade a candidate solution for one problem and language.
    ///
    /// Fails fast with a configuration error when the entry-point mapping or
    /// reference solution is absent; every downstream failure mode is folded
    /// into the returned verdict.
    #[tracing::instrument(
        skip(self, problem, candidate_source),
        fields(problem = %problem.slug, language = %language)
    )]
    pub async fn grade(
        &self,
        problem: &Problem,
        language: Language,
        candidate_source: &str,
    ) -> Result<Verdict, JudgeError> {
        let entry_point = problem
            .signature
            .entry_point(language)
            .ok_or(JudgeError::MissingEntryPoint(language))?;
        let reference_source = problem
            .reference_solutions
            .get(&language)
            .ok_or(JudgeError::MissingReferenceSolution(language))?;
        let runtime = self.config.runtime_for(language).ok_or_else(|| {
            JudgeError::Config(format!("no runtime configured for language '{}'", language))
        })?;
        let file_name = runtime.file_name.clone();

        let mut cases = self.build_case_set(problem, language);
        info!(
            sample_count = problem.samples.len(),
            case_count = cases.len(),
            "assembled working test set"
        );

        let reference_outcome = self
            .run_solution(language, reference_source, entry_point, &cases, &file_name)
            .await;
        match &reference_outcome {
            ExecutionOutcome::Completed(results) => backfill_expected(&mut cases, results),
            ExecutionOutcome::Failed { error } => {
                // Not fatal: sample cases with persisted answers still grade;
                // only the unresolved cases drop out of the total.
                warn!(error = %error, "reference execution failed; no expected values back-filled");
            }
        }

        if self.config.run_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.run_delay_ms)).await;
        }

        let candidate_outcome = self
            .run_solution(language, candidate_source, entry_point, &cases, &file_name)
            .await;

        let verdict = evaluator::evaluate(&cases, &candidate_outcome);
        info!(
            status = ?verdict.status,
            passed = verdict.passed,
            total = verdict.total,
            "grading complete"
        );
        Ok(verdict)
    }

    /// Samples first (in stored order), then fuzz cases. Fuzzing is skipped
    /// entirely when the language's signature does not parse.
    fn build_case_set(&self, problem: &Problem, language: Language) -> Vec<TestCase> {
        let mut cases: Vec<TestCase> = problem
            .samples
            .iter()
            .map(|sample| sample.to_test_case())
            .collect();

        if let Some(definition) = problem.signature.definition(language) {
            let params = signature::parse_params(definition);
            if !params.is_empty() {
                cases.extend(fuzz::generate_cases(&params, self.config.fuzz_case_count));
            }
        }

        cases
    }

    async fn run_solution(
        &self,
        language: Language,
        source: &str,
        entry_point: &str,
        cases: &[TestCase],
        file_name: &str,
    ) -> ExecutionOutcome {
        let harness = driver::synthesize(language, source, entry_point, cases);
        self.sandbox.execute(language, &harness, file_name).await
    }
}

/// Back-fill unresolved expected values from the reference run.
///
/// A case's expected value is written at most once per attempt: only when it
/// is still unset, and only from a Finished result at the same index.
/// Sample cases with persisted answers are never overwritten.
fn backfill_expected(cases: &mut [TestCase], results: &[CaseResult]) {
    for result in results {
        if result.status != CaseStatus::Finished {
            continue;
        }
        let Some(case) = cases.get_mut(result.id) else {
            warn!(index = result.id, "reference result index outside the request range");
            continue;
        };
        if case.expected.is_none() {
            case.expected = result.actual.clone();
        }
    }
}
