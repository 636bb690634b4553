//! Core components, types, and utilities for mailroom.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Role prompts and directives for LLM interactions.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
