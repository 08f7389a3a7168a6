//! Glue between the grading engine and its external collaborators: the
//! submission store (audit record) and the study/mastery updater.
//!
//! Both collaborators are traits so the boundary wires in its persistence
//! layer and tests substitute recording fakes. The mastery updater receives
//! exactly one notification per graded submission; storage or notification
//! failures are logged and never change an already-computed verdict.

use crate::errors::JudgeError;
use crate::grader::Grader;
use arbiter_common::types::{Language, Problem, SubmissionRecord, Verdict, VerdictStatus};
use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn store_submission(&self, record: &SubmissionRecord) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MasteryUpdater: Send + Sync {
    async fn record_attempt(
        &self,
        problem_id: Uuid,
        submission_id: Uuid,
        accepted: bool,
    ) -> anyhow::Result<()>;
}

/// Grade a candidate submission, persist the audit record, and notify the
/// mastery updater. Configuration errors propagate before anything is
/// stored or notified.
pub async fn submit(
    grader: &Grader,
    store: &dyn SubmissionStore,
    mastery: &dyn MasteryUpdater,
    problem: &Problem,
    language: Language,
    candidate_source: &str,
) -> Result<Verdict, JudgeError> {
    let verdict = grader.grade(problem, language, candidate_source).await?;

    let record = SubmissionRecord::new(
        problem.id,
        language,
        candidate_source.to_string(),
        verdict.clone(),
    );

    if let Err(e) = store.store_submission(&record).await {
        warn!(submission_id = %record.id, error = %e, "failed to persist submission record");
    }

    let accepted = verdict.status == VerdictStatus::Accepted;
    if let Err(e) = mastery
        .record_attempt(problem.id, record.id, accepted)
        .await
    {
        warn!(submission_id = %record.id, error = %e, "failed to notify mastery updater");
    }

    info!(
        submission_id = %record.id,
        accepted = accepted,
        "submission finalized"
    );
    Ok(verdict)
}
