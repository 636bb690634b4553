//! Specialist evaluators that score one email against one domain.
//!
//! Each evaluator is polymorphic over [`GenericEvaluator`] and produces an
//! [`AgentDecision`] for every email it is shown. The failure contract is
//! strict: an evaluator never propagates an error. Any call or parse
//! failure is converted at this boundary into a degraded decision, so the
//! supervisor only ever observes well-formed values.

pub mod reply;

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{instrument, warn};

use crate::base::{
    prompts,
    types::{AgentDecision, Email, Res},
};
use crate::service::llm::LlmClient;

use self::reply::ParsedReply;

// Traits.

/// Generic evaluator trait.
///
/// The set of evaluators is open; implementations are identified by name.
/// `evaluate` is infallible by contract — implementations must convert
/// their own failures into degraded decisions.
#[async_trait]
pub trait GenericEvaluator: Send + Sync + 'static {
    /// The evaluator's name, used as the decision key and as the
    /// assignable agent name.
    fn name(&self) -> &str;

    /// Score one email, returning a decision (possibly degraded).
    async fn evaluate(&self, email: &Email) -> AgentDecision;
}

// Structs.

/// Evaluator handle for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Evaluator {
    inner: Arc<dyn GenericEvaluator>,
}

impl Deref for Evaluator {
    type Target = dyn GenericEvaluator;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl Evaluator {
    /// Wrap any trait implementation, usually a stub or mock in tests.
    pub fn new(inner: Arc<dyn GenericEvaluator>) -> Self {
        Self { inner }
    }

    /// The LLM-backed evaluator for a given role.
    pub fn llm(role: EvaluatorRole, llm: LlmClient) -> Self {
        Self::new(Arc::new(LlmEvaluator { role, llm }))
    }
}

/// The built-in specialist roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorRole {
    CustomerSupport,
    Sales,
    Hr,
    SpamFilter,
}

impl EvaluatorRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CustomerSupport => "CustomerSupport",
            Self::Sales => "Sales",
            Self::Hr => "HR",
            Self::SpamFilter => "SpamFilter",
        }
    }

    /// The role-specific system directive.
    fn directive(&self) -> &'static str {
        match self {
            Self::CustomerSupport => prompts::CUSTOMER_SUPPORT_DIRECTIVE,
            Self::Sales => prompts::SALES_DIRECTIVE,
            Self::Hr => prompts::HR_DIRECTIVE,
            Self::SpamFilter => prompts::SPAM_FILTER_DIRECTIVE,
        }
    }

    /// Whether a degraded decision from this role escalates.
    ///
    /// Only customer support escalates on failure: an ambiguous failure
    /// in the highest-stakes category should force manual attention,
    /// while the other roles fail quietly.
    fn escalate_on_failure(&self) -> bool {
        matches!(self, Self::CustomerSupport)
    }
}

/// An evaluator that asks the hosted model to score the email.
///
/// Holds an injected [`LlmClient`] rather than constructing its own, so
/// tests can substitute a deterministic client.
pub struct LlmEvaluator {
    role: EvaluatorRole,
    llm: LlmClient,
}

impl LlmEvaluator {
    /// One outbound call plus the lenient reply parse.
    async fn try_evaluate(&self, email: &Email) -> Res<ParsedReply> {
        let system = format!("{}\n{}", self.role.directive(), prompts::REPLY_FORMAT);
        let user = prompts::evaluation_message(email);

        let text = self.llm.complete(&system, &user).await?;

        Ok(reply::parse_reply(&text))
    }
}

#[async_trait]
impl GenericEvaluator for LlmEvaluator {
    fn name(&self) -> &str {
        self.role.name()
    }

    #[instrument(name = "LlmEvaluator::evaluate", skip_all, fields(agent = self.role.name(), email = %email.id))]
    async fn evaluate(&self, email: &Email) -> AgentDecision {
        match self.try_evaluate(email).await {
            Ok(parsed) => {
                if !parsed.defaulted.none() {
                    warn!("Reply from {} used defaults for some fields: {:?}", self.role.name(), parsed.defaulted);
                }

                parsed.decision
            }
            Err(err) => {
                warn!("Evaluator {} failed, returning degraded decision: {err}", self.role.name());

                AgentDecision::degraded(format!("Evaluation failed: {err}"), self.role.escalate_on_failure())
            }
        }
    }
}

// Tests.
