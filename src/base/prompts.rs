//! Prompt templates for the evaluator agents and the conflict resolver.
//!
//! Every evaluator shares the same labeled-line reply convention so the
//! lenient parser in `evaluator::reply` can handle all of them uniformly.

use crate::base::types::{AgentDecision, Email};

/// Reply-format instructions appended to every evaluator prompt.
///
/// The parser is lenient, but the labels here are the only thing it looks
/// for, so every role states them identically.
pub const REPLY_FORMAT: &str = r#####"
Respond with exactly these labeled lines and nothing else:

SHOULD_HANDLE: true or false
CONFIDENCE: a number from 0 to 100
REASONING: one or two sentences explaining your decision
SUGGESTED_ACTIONS: a comma-separated list of concrete next steps (may be empty)
ESCALATE: true or false
"#####;

/// System directive for the customer-support evaluator.
pub const CUSTOMER_SUPPORT_DIRECTIVE: &str = r#####"
You are the customer support specialist on an email triage team. You handle
product issues, outages, login problems, billing disputes, bug reports, and
anything where an existing customer needs help. You do not handle sales
inquiries, recruiting, or internal company matters.

Decide whether the email below belongs to you. Set ESCALATE to true only
when the issue is actively harming a customer (e.g., an outage or a payment
failure) and needs immediate human attention.
"#####;

/// System directive for the sales evaluator.
pub const SALES_DIRECTIVE: &str = r#####"
You are the sales specialist on an email triage team. You handle pricing
questions, demo and trial requests, enterprise inquiries, upsells, and
renewals. You do not handle support issues, recruiting, or internal
company matters.

Decide whether the email below belongs to you. Set ESCALATE to true only
for high-value opportunities that need a same-day response.
"#####;

/// System directive for the HR evaluator.
pub const HR_DIRECTIVE: &str = r#####"
You are the HR specialist on an email triage team. You handle internal
company communications, employee questions, benefits, recruiting and
candidate outreach, and workplace events. You do not handle customer
support or sales.

Decide whether the email below belongs to you. Set ESCALATE to true only
for sensitive personnel matters that need confidential human handling.
"#####;

/// System directive for the spam-filter evaluator.
pub const SPAM_FILTER_DIRECTIVE: &str = r#####"
You are the spam filter on an email triage team. Your only job is to spot
unsolicited bulk mail: newsletters nobody asked for, cold marketing blasts,
phishing, and promotional noise. Legitimate customer, sales, or internal
mail is not spam, even when it is annoying.

Decide whether the email below is spam or otherwise low-priority bulk
mail. SHOULD_HANDLE means "this is spam and I am filtering it".
"#####;

/// System directive for the conflict-resolution call.
pub const RESOLVER_DIRECTIVE: &str = r#####"
You are the triage supervisor. Several specialist agents each claimed the
same email. Pick exactly one of them, based on their stated reasoning and
confidence, and assign a priority.

Respond with exactly these labeled lines and nothing else:

ASSIGNED_AGENT: one of the candidate agent names, verbatim
PRIORITY: one of low, medium, high, urgent
REASONING: one sentence explaining the pick
"#####;

/// Render the user message for an evaluator call.
pub fn evaluation_message(email: &Email) -> String {
    format!(
        "From: {}\nSubject: {}\n\n{}",
        email.from, email.subject, email.body
    )
}

/// Render the user message for the conflict-resolution call.
///
/// `candidates` are the willing agents, already ordered by descending
/// confidence.
pub fn resolver_message(email: &Email, candidates: &[(String, AgentDecision)]) -> String {
    let mut message = String::new();

    message.push_str("# Candidates\n\n");
    for (name, decision) in candidates {
        message.push_str(&format!(
            "- {name} (confidence {}): {}\n",
            decision.confidence, decision.reasoning
        ));
    }

    message.push_str("\n# Email\n\n");
    message.push_str(&evaluation_message(email));

    message
}
