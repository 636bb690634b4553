//! Service integrations for external APIs and clients.
//!
//! The only external service mailroom talks to is a hosted LLM. The module
//! defines a generic trait and a concrete OpenAI implementation, allowing
//! deterministic substitutes in tests.

pub mod llm;
