pub mod openai;

use crate::base::types::Res;
use async_trait::async_trait;
use std::sync::Arc;
use std::ops::Deref;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This is the single seam between triage logic and the hosted model:
/// evaluators and the conflict resolver only ever see this trait, which
/// is what lets tests substitute deterministic stubs.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Generate one free-text completion from a system directive and a
    /// user message, using the evaluator model.
    async fn complete(&self, system: &str, user: &str) -> Res<String>;

    /// Generate one free-text completion using the conflict-resolution
    /// model. Separate from [`complete`](Self::complete) because the
    /// resolver typically wants a stronger model than the per-role
    /// evaluators.
    async fn resolve(&self, system: &str, user: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    /// Wrap any trait implementation, usually a mock in tests.
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
