//! Common types and result aliases for mailroom.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// An inbound email to be triaged.
///
/// Immutable once constructed; triage never mutates the email itself,
/// all per-run bookkeeping lives in [`TriageState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    /// Unique identifier for the email (e.g., `email-001`).
    pub id: String,
    /// Sender address. Treated as an opaque string, not validated.
    pub from: String,
    /// Recipient address. Treated as an opaque string, not validated.
    pub to: String,
    pub subject: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

/// The scored opinion one evaluator produces for one email.
///
/// Produced fresh per evaluation and never mutated afterwards. Confidence
/// is nominally 0–100 but is not range-enforced; the supervisor only ever
/// compares it numerically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDecision {
    pub should_handle: bool,
    pub confidence: u8,
    pub reasoning: String,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub escalate: bool,
}

impl AgentDecision {
    /// The safe default returned when an evaluator's external call or
    /// reply parse fails. `escalate` is role-dependent: CustomerSupport
    /// forces manual attention on ambiguous failures, the other roles
    /// do not.
    pub fn degraded(reasoning: impl Into<String>, escalate: bool) -> Self {
        Self {
            should_handle: false,
            confidence: 0,
            reasoning: reasoning.into(),
            suggested_actions: Vec::new(),
            escalate,
        }
    }
}

/// Priority assigned to a triaged email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Parse a priority from model output, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        };
        write!(f, "{s}")
    }
}

/// Transient aggregate scoped to one email's triage run.
///
/// Created when the supervisor starts on an email and discarded once the
/// result is produced; nothing here survives across runs.
#[derive(Debug)]
pub struct TriageState {
    pub email: Email,
    /// One decision per invoked evaluator, keyed by evaluator name.
    pub decisions: BTreeMap<String, AgentDecision>,
    pub result: Option<TriageResult>,
}

impl TriageState {
    pub fn new(email: Email) -> Self {
        Self {
            email,
            decisions: BTreeMap::new(),
            result: None,
        }
    }

    pub fn record(&mut self, agent: &str, decision: AgentDecision) {
        self.decisions.insert(agent.to_string(), decision);
    }
}

/// Final outcome of triaging one email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageResult {
    pub email_id: String,
    pub category: String,
    pub priority: Priority,
    /// One of the evaluator names, or the `General` fallback sentinel.
    pub assigned_agent: String,
    pub summary: String,
    pub suggested_actions: Vec<String>,
    pub requires_human_review: bool,
}
