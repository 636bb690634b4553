//! Lenient parsing of labeled-line LLM replies.
//!
//! Evaluator replies follow a loose convention of labeled lines
//! (`SHOULD_HANDLE:`, `CONFIDENCE:`, `REASONING:`, `SUGGESTED_ACTIONS:`,
//! `ESCALATE:`). Models do not always comply, so the parse is best-effort:
//! each missing or malformed field falls back to a fixed default, and the
//! result records which fields were defaulted so callers (and tests) can
//! tell a compliant reply from a fallback.

use std::sync::LazyLock;

use regex::Regex;

use crate::base::types::{AgentDecision, Priority};

/// Default confidence when the `CONFIDENCE:` line is missing or malformed.
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// Default reasoning when the `REASONING:` line is missing.
pub const DEFAULT_REASONING: &str = "Analysis completed";

static CONFIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"CONFIDENCE:\s*(\S+)").unwrap());
static REASONING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"REASONING:[ \t]*([^\n]+)").unwrap());
static ACTIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)SUGGESTED_ACTIONS:(.*?)(?:SHOULD_HANDLE:|CONFIDENCE:|REASONING:|ESCALATE:|$)").unwrap());
static ASSIGNED_AGENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ASSIGNED_AGENT:[ \t]*([^\n]+)").unwrap());
static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"PRIORITY:[ \t]*(\S+)").unwrap());

/// Which fields of a parsed reply fell back to their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultedFields {
    pub should_handle: bool,
    pub confidence: bool,
    pub reasoning: bool,
    pub suggested_actions: bool,
    pub escalate: bool,
}

impl DefaultedFields {
    /// True when every field came straight from the reply.
    pub fn none(&self) -> bool {
        !(self.should_handle || self.confidence || self.reasoning || self.suggested_actions || self.escalate)
    }
}

/// An evaluator reply parsed into a decision, plus per-field fallback flags.
#[derive(Debug, Clone)]
pub struct ParsedReply {
    pub decision: AgentDecision,
    pub defaulted: DefaultedFields,
}

/// Parse a free-text evaluator reply.
///
/// `should_handle` is true only if the literal substring
/// `SHOULD_HANDLE: true` is present; everything else is extracted from
/// its labeled line with a per-field default. Actions are captured from
/// after `SUGGESTED_ACTIONS:` up to the next recognized label or end of
/// text. This parse never fails.
pub fn parse_reply(text: &str) -> ParsedReply {
    let mut defaulted = DefaultedFields::default();

    let should_handle = text.contains("SHOULD_HANDLE: true");
    defaulted.should_handle = !text.contains("SHOULD_HANDLE:");

    let confidence = match CONFIDENCE_RE.captures(text).and_then(|c| c[1].parse::<u8>().ok()) {
        Some(value) => value,
        None => {
            defaulted.confidence = true;
            DEFAULT_CONFIDENCE
        }
    };

    let reasoning = match REASONING_RE.captures(text).map(|c| c[1].trim().to_string()).filter(|s| !s.is_empty()) {
        Some(value) => value,
        None => {
            defaulted.reasoning = true;
            DEFAULT_REASONING.to_string()
        }
    };

    let suggested_actions = match ACTIONS_RE.captures(text) {
        Some(captures) => parse_action_list(&captures[1]),
        None => {
            defaulted.suggested_actions = true;
            Vec::new()
        }
    };

    let escalate = text.contains("ESCALATE: true");
    defaulted.escalate = !text.contains("ESCALATE:");

    ParsedReply {
        decision: AgentDecision {
            should_handle,
            confidence,
            reasoning,
            suggested_actions,
            escalate,
        },
        defaulted,
    }
}

/// Split an actions block on newlines and commas, stripping bullets.
fn parse_action_list(block: &str) -> Vec<String> {
    block
        .split(['\n', ','])
        .map(|item| item.trim().trim_start_matches('-').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A conflict-resolution ruling parsed from the resolver's reply.
#[derive(Debug, Clone)]
pub struct Ruling {
    pub assigned_agent: String,
    pub priority: Priority,
    pub reasoning: String,
}

/// Parse the resolver's reply (`ASSIGNED_AGENT:` / `PRIORITY:` /
/// `REASONING:` labeled lines).
///
/// Unlike evaluator replies there is no useful degraded form here: a
/// reply with a missing or unparseable agent or priority returns `None`
/// and the caller takes its deterministic fallback instead.
pub fn parse_ruling(text: &str) -> Option<Ruling> {
    let assigned_agent = ASSIGNED_AGENT_RE.captures(text).map(|c| c[1].trim().to_string()).filter(|s| !s.is_empty())?;
    let priority = PRIORITY_RE.captures(text).and_then(|c| Priority::parse(&c[1]))?;
    let reasoning = REASONING_RE
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_REASONING.to_string());

    Some(Ruling {
        assigned_agent,
        priority,
        reasoning,
    })
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_compliant_reply() {
        let reply = "SHOULD_HANDLE: true\nCONFIDENCE: 85\nREASONING: Clear billing issue.\nSUGGESTED_ACTIONS: check invoice, refund customer\nESCALATE: false";

        let parsed = parse_reply(reply);

        assert!(parsed.decision.should_handle);
        assert_eq!(parsed.decision.confidence, 85);
        assert_eq!(parsed.decision.reasoning, "Clear billing issue.");
        assert_eq!(parsed.decision.suggested_actions, vec!["check invoice", "refund customer"]);
        assert!(!parsed.decision.escalate);
        assert!(parsed.defaulted.none());
    }

    #[test]
    fn should_handle_requires_the_literal_true() {
        // "TRUE" and "True" do not count; the check is a literal substring.
        assert!(!parse_reply("SHOULD_HANDLE: TRUE\nCONFIDENCE: 90").decision.should_handle);
        assert!(!parse_reply("SHOULD_HANDLE: false").decision.should_handle);
        assert!(parse_reply("blah blah SHOULD_HANDLE: true blah").decision.should_handle);
    }

    #[test]
    fn missing_fields_fall_back_and_are_flagged() {
        let parsed = parse_reply("The model rambled and ignored the format entirely.");

        assert!(!parsed.decision.should_handle);
        assert_eq!(parsed.decision.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(parsed.decision.reasoning, DEFAULT_REASONING);
        assert!(parsed.decision.suggested_actions.is_empty());
        assert!(!parsed.decision.escalate);

        assert!(parsed.defaulted.should_handle);
        assert!(parsed.defaulted.confidence);
        assert!(parsed.defaulted.reasoning);
        assert!(parsed.defaulted.suggested_actions);
        assert!(parsed.defaulted.escalate);
    }

    #[test]
    fn malformed_confidence_falls_back_but_is_flagged() {
        let parsed = parse_reply("SHOULD_HANDLE: true\nCONFIDENCE: ninety\nREASONING: ok");

        assert_eq!(parsed.decision.confidence, DEFAULT_CONFIDENCE);
        assert!(parsed.defaulted.confidence);
        // The rest of the reply still parses.
        assert!(parsed.decision.should_handle);
        assert!(!parsed.defaulted.reasoning);
    }

    #[test]
    fn confidence_over_u8_range_falls_back() {
        let parsed = parse_reply("CONFIDENCE: 9000");

        assert_eq!(parsed.decision.confidence, DEFAULT_CONFIDENCE);
        assert!(parsed.defaulted.confidence);
    }

    #[test]
    fn actions_stop_at_the_next_label() {
        let reply = "SUGGESTED_ACTIONS:\n- reset password\n- notify user\nESCALATE: true";

        let parsed = parse_reply(reply);

        assert_eq!(parsed.decision.suggested_actions, vec!["reset password", "notify user"]);
        assert!(parsed.decision.escalate);
    }

    #[test]
    fn actions_capture_runs_to_end_of_text_when_last() {
        let reply = "REASONING: fine\nSUGGESTED_ACTIONS: follow up, archive thread";

        let parsed = parse_reply(reply);

        assert_eq!(parsed.decision.suggested_actions, vec!["follow up", "archive thread"]);
    }

    #[test]
    fn empty_actions_block_yields_empty_list_without_default_flag() {
        let parsed = parse_reply("SUGGESTED_ACTIONS:\nESCALATE: false");

        assert!(parsed.decision.suggested_actions.is_empty());
        // The label was present, so this is the model's (empty) answer,
        // not a fallback.
        assert!(!parsed.defaulted.suggested_actions);
    }

    #[test]
    fn parses_a_ruling() {
        let ruling = parse_ruling("ASSIGNED_AGENT: Sales\nPRIORITY: high\nREASONING: Revenue at stake.").unwrap();

        assert_eq!(ruling.assigned_agent, "Sales");
        assert_eq!(ruling.priority, Priority::High);
        assert_eq!(ruling.reasoning, "Revenue at stake.");
    }

    #[test]
    fn ruling_without_agent_or_priority_is_none() {
        assert!(parse_ruling("PRIORITY: high\nREASONING: no agent line").is_none());
        assert!(parse_ruling("ASSIGNED_AGENT: Sales\nPRIORITY: whenever").is_none());
        assert!(parse_ruling("total nonsense").is_none());
    }

    #[test]
    fn ruling_reasoning_defaults_when_missing() {
        let ruling = parse_ruling("ASSIGNED_AGENT: HR\nPRIORITY: medium").unwrap();

        assert_eq!(ruling.reasoning, DEFAULT_REASONING);
    }
}
