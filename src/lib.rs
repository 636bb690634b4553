//! Library root for `mailroom`.
//!
//! Mailroom is a multi-agent email triage service. A set of specialist
//! evaluators (customer support, sales, HR, and a spam filter) each score
//! an email against their own domain by calling a hosted LLM, and a
//! supervisor combines their opinions into a single triage outcome:
//! - A spam short-circuit ahead of the expensive evaluations
//! - A concurrent fan-out over the specialist evaluators
//! - A deterministic decision over the willing agents, with one
//!   conflict-resolution LLM call when several claim the same email
//!
//! The architecture is built around extensible traits that allow for
//! different implementations of each service, which is also what makes
//! the decision logic testable with deterministic stubs.

pub mod base;
pub mod evaluator;
pub mod prelude;
pub mod service;
pub mod triage;

use base::{
    config::Config,
    types::{Email, Res, TriageResult},
};
use service::llm::LlmClient;
use tracing::info;
use triage::{batch, supervisor::Supervisor};

/// Public async entry for the binary crate.
///
/// Builds the OpenAI-backed LLM client and the standard evaluator lineup,
/// then triages the given emails in order. Returns one result per email
/// that completed; failures are logged and skipped inside the batch run.
pub async fn start(config: Config, emails: Vec<Email>) -> Res<Vec<TriageResult>> {
    info!("Starting mailroom over {} email(s) ...", emails.len());

    let llm = LlmClient::openai(&config);
    let supervisor = Supervisor::new(&config, llm);

    let (results, _report) = batch::run_batch(&supervisor, &emails).await;

    Ok(results)
}
