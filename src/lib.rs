//! # Newsletter Research
//!
//! Research backend for an agent-driven newsletter generator.
//!
//! This library provides:
//! - A resilient client for the Exa search API with retry and pacing
//! - Research tools in the function-calling shape agent frameworks expect
//! - Glue that gathers a research brief for a topic, degrading to empty
//!
//! ## Call Flow
//!
//! ```text
//!   tool / brief ──► ResearchClient ──► RetryPolicy ──► SearchProvider (Exa)
//!                          │
//!                          └── one pacing pause after each success
//! ```
//!
//! ## Modules
//! - `research`: client, retry policy, provider trait and Exa implementation
//! - `tools`: `search_and_contents`, `find_similar`, `get_contents`
//! - `brief`: research gathering with fallback and markdown logs
//! - `newsletter`: run inputs (topic, message, template)
//! - `config`: environment-driven configuration

pub mod brief;
pub mod config;
pub mod newsletter;
pub mod research;
pub mod tools;

pub use config::{ConfigError, ResearchConfig};
pub use research::{ProviderError, ProviderErrorKind, ResearchClient, RetryPolicy};
