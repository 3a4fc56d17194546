//! Newsletter run inputs.
//!
//! A run needs a topic, a personal message for the reader, and the HTML
//! template the designer fills in. Inputs are validated here before any
//! research call is made.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::{json, Value};

use crate::brief::ResearchBrief;

/// Default location of the HTML template, relative to the working directory.
pub const DEFAULT_TEMPLATE_PATH: &str = "config/newsletter_template.html";

/// Inputs for one newsletter run.
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterRequest {
    pub topic: String,
    pub personal_message: String,
    pub html_template: String,
}

impl NewsletterRequest {
    /// Build a request, trimming the text inputs.
    ///
    /// # Errors
    ///
    /// Fails if the topic or template is blank.
    pub fn new(
        topic: &str,
        personal_message: &str,
        html_template: String,
    ) -> anyhow::Result<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            anyhow::bail!("Newsletter topic must not be empty");
        }
        if html_template.trim().is_empty() {
            anyhow::bail!("Newsletter template must not be empty");
        }

        Ok(Self {
            topic: topic.to_string(),
            personal_message: personal_message.trim().to_string(),
            html_template,
        })
    }

    /// Build a request with the template read from `template_path`.
    pub fn with_template_file(
        topic: &str,
        personal_message: &str,
        template_path: &Path,
    ) -> anyhow::Result<Self> {
        let html_template = load_template(template_path)?;
        Self::new(topic, personal_message, html_template)
    }
}

impl NewsletterRequest {
    /// Inputs handed to the orchestration layer for one run.
    ///
    /// `pre_fetched_news` carries the brief's hits; it is an empty array when
    /// research fell back to nothing, so the run proceeds without it.
    pub fn kickoff_inputs(&self, brief: &ResearchBrief) -> Value {
        json!({
            "topic": self.topic,
            "personal_message": self.personal_message,
            "html_template": self.html_template,
            "pre_fetched_news": brief.results.results,
        })
    }
}

/// Read the newsletter HTML template.
pub fn load_template(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("reading newsletter template {}", path.display()))
}
