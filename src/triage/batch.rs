//! Batch processing over an in-memory email list.
//!
//! Emails are processed sequentially, one full supervisor run each, and
//! results come back in input order. A per-email failure is caught here,
//! logged with the email id, and skipped; the batch always continues. No
//! email is ever dropped without a diagnostic.

use std::collections::BTreeMap;

use tracing::{error, info, instrument};

use crate::base::types::{Email, Priority, TriageResult};

use super::supervisor::Supervisor;

/// Aggregate counts over one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub human_review: usize,
}

impl BatchReport {
    fn record(&mut self, result: &TriageResult) {
        self.processed += 1;
        *self.by_category.entry(result.category.clone()).or_default() += 1;
        *self.by_priority.entry(result.priority).or_default() += 1;

        if result.requires_human_review {
            self.human_review += 1;
        }
    }
}

/// Triage every email in the list, in order.
///
/// Returns the results plus a report of aggregate counts. Deterministic
/// evaluators make this idempotent: the same input list always yields the
/// same output list.
#[instrument(name = "run_batch", skip_all, fields(emails = emails.len()))]
pub async fn run_batch(supervisor: &Supervisor, emails: &[Email]) -> (Vec<TriageResult>, BatchReport) {
    let mut results = Vec::with_capacity(emails.len());
    let mut report = BatchReport::default();

    for email in emails {
        match supervisor.triage(email).await {
            Ok(result) => {
                info!(
                    "{}: {} -> {} ({}, human review: {})",
                    result.email_id, result.category, result.assigned_agent, result.priority, result.requires_human_review
                );

                report.record(&result);
                results.push(result);
            }
            Err(err) => {
                error!("Skipping email {}: {err}", email.id);
                report.skipped += 1;
            }
        }
    }

    info!(
        "Batch complete: {} processed, {} skipped, {} flagged for human review",
        report.processed, report.skipped, report.human_review
    );

    (results, report)
}
