//! The supervisor's selection procedure.
//!
//! One email moves through `SpamCheck -> ParallelEvaluate -> Decide`:
//! the spam filter runs first as a cost-saving short-circuit, the three
//! specialists then run concurrently, and the decision is a ranking over
//! the willing agents with a single conflict-resolution LLM call when more
//! than one claims the email. Every path ends in exactly one
//! [`TriageResult`].

use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::base::{
    config::Config,
    prompts,
    types::{AgentDecision, Email, Priority, Res, TriageResult, TriageState},
};
use crate::evaluator::{Evaluator, EvaluatorRole};
use crate::service::llm::LlmClient;

/// Category assigned when the spam filter wins outright.
pub const SPAM_CATEGORY: &str = "Spam/Low-Priority";

/// Sentinel agent/category when no specialist claims the email.
pub const GENERAL_AGENT: &str = "General";

/// Willing-agent cutoff: a specialist claims an email only with
/// `should_handle` and confidence strictly above this.
const WILLING_CONFIDENCE_THRESHOLD: u8 = 50;

/// Supervisor over one spam filter and a set of specialist evaluators.
///
/// Specialist registration order doubles as the deterministic tie-break
/// for equal-confidence willing agents.
pub struct Supervisor {
    spam: Evaluator,
    specialists: Vec<Evaluator>,
    llm: LlmClient,
    spam_confidence_threshold: u8,
}

impl Supervisor {
    /// The standard lineup: SpamFilter ahead of CustomerSupport, Sales, HR,
    /// all backed by the given LLM client.
    pub fn new(config: &Config, llm: LlmClient) -> Self {
        Self {
            spam: Evaluator::llm(EvaluatorRole::SpamFilter, llm.clone()),
            specialists: vec![
                Evaluator::llm(EvaluatorRole::CustomerSupport, llm.clone()),
                Evaluator::llm(EvaluatorRole::Sales, llm.clone()),
                Evaluator::llm(EvaluatorRole::Hr, llm.clone()),
            ],
            llm,
            spam_confidence_threshold: config.spam_confidence_threshold,
        }
    }

    /// Assemble a supervisor from explicit evaluators. Used by tests to
    /// substitute deterministic stubs.
    pub fn with_evaluators(spam: Evaluator, specialists: Vec<Evaluator>, llm: LlmClient, spam_confidence_threshold: u8) -> Self {
        Self {
            spam,
            specialists,
            llm,
            spam_confidence_threshold,
        }
    }

    /// Triage one email to completion.
    ///
    /// Evaluator failures never surface here (they degrade inside the
    /// evaluator boundary); the only fallible external step, conflict
    /// resolution, carries its own deterministic fallback.
    #[instrument(name = "Supervisor::triage", skip_all, fields(email = %email.id))]
    pub async fn triage(&self, email: &Email) -> Res<TriageResult> {
        let mut state = TriageState::new(email.clone());

        // SpamCheck: one cheap call ahead of the full fan-out.

        let spam_decision = self.spam.evaluate(email).await;
        state.record(self.spam.name(), spam_decision.clone());

        if spam_decision.should_handle && spam_decision.confidence > self.spam_confidence_threshold {
            info!("Spam filter short-circuit at confidence {}", spam_decision.confidence);

            let result = TriageResult {
                email_id: email.id.clone(),
                category: SPAM_CATEGORY.to_string(),
                priority: Priority::Low,
                assigned_agent: self.spam.name().to_string(),
                summary: spam_decision.reasoning,
                suggested_actions: spam_decision.suggested_actions,
                requires_human_review: false,
            };

            state.result = Some(result.clone());

            return Ok(result);
        }

        // ParallelEvaluate: fan out to every specialist, join all of them.
        // A slow or failing specialist delays the decision but never
        // aborts it.

        let decisions = join_all(self.specialists.iter().map(|specialist| specialist.evaluate(email))).await;

        for (specialist, decision) in self.specialists.iter().zip(decisions) {
            state.record(specialist.name(), decision);
        }

        // Decide over the willing set.

        let willing = self.willing_agents(&state);

        info!("{} willing agent(s) for {}", willing.len(), email.id);

        let result = match willing.as_slice() {
            [] => self.general_fallback(email),
            [(name, decision)] => self.assign_single(email, name, decision),
            _ => self.resolve_conflict(email, &willing).await,
        };

        state.result = Some(result.clone());

        Ok(result)
    }

    /// The willing agents, ordered by descending confidence. The sort is
    /// stable, so equal confidences keep specialist registration order.
    fn willing_agents(&self, state: &TriageState) -> Vec<(String, AgentDecision)> {
        let mut willing = self
            .specialists
            .iter()
            .filter_map(|specialist| {
                let decision = state.decisions.get(specialist.name())?;

                (decision.should_handle && decision.confidence > WILLING_CONFIDENCE_THRESHOLD).then(|| (specialist.name().to_string(), decision.clone()))
            })
            .collect::<Vec<_>>();

        willing.sort_by_key(|(_, decision)| std::cmp::Reverse(decision.confidence));

        willing
    }

    /// No specialist claimed the email: route to the general queue for
    /// manual review.
    fn general_fallback(&self, email: &Email) -> TriageResult {
        TriageResult {
            email_id: email.id.clone(),
            category: GENERAL_AGENT.to_string(),
            priority: Priority::Medium,
            assigned_agent: GENERAL_AGENT.to_string(),
            summary: "No specialist agent claimed this email; routed to the general queue.".to_string(),
            suggested_actions: Vec::new(),
            requires_human_review: true,
        }
    }

    /// Exactly one willing agent: assign it, with priority from the fixed
    /// ladder.
    fn assign_single(&self, email: &Email, agent: &str, decision: &AgentDecision) -> TriageResult {
        let priority = priority_ladder(decision);

        TriageResult {
            email_id: email.id.clone(),
            category: agent.to_string(),
            priority,
            assigned_agent: agent.to_string(),
            summary: decision.reasoning.clone(),
            suggested_actions: decision.suggested_actions.clone(),
            requires_human_review: decision.escalate || matches!(priority, Priority::High | Priority::Urgent),
        }
    }

    /// More than one willing agent: ask the resolver model to pick, and
    /// fall back deterministically to the highest-confidence agent when
    /// the call fails or the ruling is unusable.
    async fn resolve_conflict(&self, email: &Email, willing: &[(String, AgentDecision)]) -> TriageResult {
        let user = prompts::resolver_message(email, willing);

        let ruling = match self.llm.resolve(prompts::RESOLVER_DIRECTIVE, &user).await {
            Ok(text) => crate::evaluator::reply::parse_ruling(&text),
            Err(err) => {
                warn!("Conflict resolution call failed: {err}");
                None
            }
        };

        // A ruling naming an agent outside the willing set counts as
        // unusable; the resolver can never route to an unknown agent.
        let ruling = ruling.and_then(|ruling| {
            willing
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&ruling.assigned_agent))
                .map(|(name, decision)| (name.clone(), decision.clone(), ruling.priority, ruling.reasoning))
        });

        match ruling {
            Some((agent, decision, priority, reasoning)) => {
                info!("Conflict resolved in favor of {agent}: {reasoning}");

                TriageResult {
                    email_id: email.id.clone(),
                    category: agent.clone(),
                    priority,
                    assigned_agent: agent,
                    summary: decision.reasoning,
                    suggested_actions: decision.suggested_actions,
                    requires_human_review: decision.escalate || matches!(priority, Priority::High | Priority::Urgent),
                }
            }
            None => {
                // Highest confidence wins; `willing` is already sorted.
                let (agent, decision) = &willing[0];

                warn!("Conflict resolution unusable, falling back to {agent}");

                TriageResult {
                    email_id: email.id.clone(),
                    category: agent.clone(),
                    priority: Priority::Medium,
                    assigned_agent: agent.clone(),
                    summary: decision.reasoning.clone(),
                    suggested_actions: decision.suggested_actions.clone(),
                    requires_human_review: false,
                }
            }
        }
    }
}

/// The fixed priority ladder for a single willing agent.
///
/// `escalate` outranks everything, including a 95% non-escalated
/// confidence. That ordering is intentional, documented behavior; do not
/// reorder the clauses.
fn priority_ladder(decision: &AgentDecision) -> Priority {
    if decision.escalate {
        Priority::Urgent
    } else if decision.confidence > 90 {
        Priority::High
    } else if decision.confidence > 70 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::base::types::Res;
    use crate::evaluator::GenericEvaluator;
    use crate::service::llm::GenericLlmClient;

    mock! {
        pub Llm {}

        #[async_trait]
        impl GenericLlmClient for Llm {
            async fn complete(&self, system: &str, user: &str) -> Res<String>;
            async fn resolve(&self, system: &str, user: &str) -> Res<String>;
        }
    }

    /// Stub evaluator returning a fixed decision, counting invocations.
    struct StaticEvaluator {
        name: &'static str,
        decision: AgentDecision,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GenericEvaluator for StaticEvaluator {
        fn name(&self) -> &str {
            self.name
        }

        async fn evaluate(&self, _email: &Email) -> AgentDecision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.decision.clone()
        }
    }

    fn stub(name: &'static str, should_handle: bool, confidence: u8, escalate: bool) -> (Evaluator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let evaluator = Evaluator::new(Arc::new(StaticEvaluator {
            name,
            decision: AgentDecision {
                should_handle,
                confidence,
                reasoning: format!("{name} stub reasoning"),
                suggested_actions: vec![format!("{name} action")],
                escalate,
            },
            calls: calls.clone(),
        }));

        (evaluator, calls)
    }

    fn test_email() -> Email {
        Email {
            id: "email-test".to_string(),
            from: "someone@example.com".to_string(),
            to: "triage@example.com".to_string(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn silent_llm() -> LlmClient {
        LlmClient::new(Arc::new(MockLlm::new()))
    }

    fn supervisor_with(spam: Evaluator, specialists: Vec<Evaluator>, llm: LlmClient) -> Supervisor {
        Supervisor::with_evaluators(spam, specialists, llm, 70)
    }

    #[tokio::test]
    async fn spam_short_circuit_skips_the_specialists() {
        let (spam, _) = stub("SpamFilter", true, 85, false);
        let (support, support_calls) = stub("CustomerSupport", true, 99, false);

        let supervisor = supervisor_with(spam, vec![support], silent_llm());
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.category, SPAM_CATEGORY);
        assert_eq!(result.priority, Priority::Low);
        assert_eq!(result.assigned_agent, "SpamFilter");
        assert!(!result.requires_human_review);
        assert_eq!(support_calls.load(Ordering::SeqCst), 0, "no specialist may run after the short-circuit");
    }

    #[tokio::test]
    async fn spam_at_exactly_the_threshold_does_not_short_circuit() {
        let (spam, _) = stub("SpamFilter", true, 70, false);
        let (support, support_calls) = stub("CustomerSupport", false, 0, false);

        let supervisor = supervisor_with(spam, vec![support], silent_llm());
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_ne!(result.category, SPAM_CATEGORY);
        assert_eq!(support_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_willing_agent_routes_to_general() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", false, 95, false);
        let (sales, _) = stub("Sales", true, 50, false); // at the cutoff, not above it

        let supervisor = supervisor_with(spam, vec![support, sales], silent_llm());
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.category, GENERAL_AGENT);
        assert_eq!(result.priority, Priority::Medium);
        assert_eq!(result.assigned_agent, GENERAL_AGENT);
        assert!(result.requires_human_review);
    }

    #[tokio::test]
    async fn single_willing_agent_at_95_is_high_not_urgent() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", true, 95, false);

        let supervisor = supervisor_with(spam, vec![support], silent_llm());
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.assigned_agent, "CustomerSupport");
        assert_eq!(result.priority, Priority::High);
    }

    #[tokio::test]
    async fn escalate_forces_urgent_even_at_low_confidence() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", true, 51, true);

        let supervisor = supervisor_with(spam, vec![support], silent_llm());
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.priority, Priority::Urgent);
        assert!(result.requires_human_review);
    }

    #[tokio::test]
    async fn ladder_mid_rungs() {
        for (confidence, expected) in [(90u8, Priority::Medium), (71, Priority::Medium), (70, Priority::Low), (51, Priority::Low)] {
            let (spam, _) = stub("SpamFilter", false, 0, false);
            let (support, _) = stub("CustomerSupport", true, confidence, false);

            let supervisor = supervisor_with(spam, vec![support], silent_llm());
            let result = supervisor.triage(&test_email()).await.unwrap();

            assert_eq!(result.priority, expected, "confidence {confidence}");
        }
    }

    #[tokio::test]
    async fn conflict_resolution_picks_the_ruled_agent() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", true, 80, false);
        let (sales, _) = stub("Sales", true, 60, false);

        let mut llm = MockLlm::new();
        llm.expect_resolve()
            .withf(|_, user| user.contains("CustomerSupport (confidence 80)") && user.contains("Sales (confidence 60)"))
            .returning(|_, _| Ok("ASSIGNED_AGENT: Sales\nPRIORITY: high\nREASONING: Revenue opportunity.".to_string()));

        let supervisor = supervisor_with(spam, vec![support, sales], LlmClient::new(Arc::new(llm)));
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.assigned_agent, "Sales");
        assert_eq!(result.priority, Priority::High);
        // Summary comes from the winning agent's decision, not the ruling.
        assert_eq!(result.summary, "Sales stub reasoning");
        assert!(result.requires_human_review);
    }

    #[tokio::test]
    async fn conflict_failure_falls_back_to_highest_confidence_at_medium() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", true, 80, false);
        let (sales, _) = stub("Sales", true, 90, false);

        let mut llm = MockLlm::new();
        llm.expect_resolve().returning(|_, _| Err(anyhow::anyhow!("network error")));

        let supervisor = supervisor_with(spam, vec![support, sales], LlmClient::new(Arc::new(llm)));
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.assigned_agent, "Sales");
        assert_eq!(result.priority, Priority::Medium);
        assert!(!result.requires_human_review);
    }

    #[tokio::test]
    async fn ruling_for_an_unwilling_agent_takes_the_fallback() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", true, 80, false);
        let (sales, _) = stub("Sales", true, 60, false);

        let mut llm = MockLlm::new();
        llm.expect_resolve().returning(|_, _| Ok("ASSIGNED_AGENT: HR\nPRIORITY: urgent\nREASONING: nonsense".to_string()));

        let supervisor = supervisor_with(spam, vec![support, sales], LlmClient::new(Arc::new(llm)));
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.assigned_agent, "CustomerSupport");
        assert_eq!(result.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn equal_confidence_ties_break_by_registration_order() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", true, 75, false);
        let (sales, _) = stub("Sales", true, 75, false);

        let mut llm = MockLlm::new();
        llm.expect_resolve().returning(|_, _| Err(anyhow::anyhow!("down")));

        let supervisor = supervisor_with(spam, vec![support, sales], LlmClient::new(Arc::new(llm)));
        let result = supervisor.triage(&test_email()).await.unwrap();

        // CustomerSupport registered first, so it wins the tie.
        assert_eq!(result.assigned_agent, "CustomerSupport");
    }

    #[tokio::test]
    async fn summary_and_actions_come_from_the_winner() {
        let (spam, _) = stub("SpamFilter", false, 0, false);
        let (support, _) = stub("CustomerSupport", true, 85, false);

        let supervisor = supervisor_with(spam, vec![support], silent_llm());
        let result = supervisor.triage(&test_email()).await.unwrap();

        assert_eq!(result.summary, "CustomerSupport stub reasoning");
        assert_eq!(result.suggested_actions, vec!["CustomerSupport action"]);
    }
}
