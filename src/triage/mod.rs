//! Triage orchestration: the supervisor's selection procedure and the
//! batch runner that drives it over an email list.

pub mod batch;
pub mod samples;
pub mod supervisor;
