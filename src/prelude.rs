pub use crate::base::{
    config::Config,
    types::{AgentDecision, Email, Err, Priority, Res, TriageResult, Void},
};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
