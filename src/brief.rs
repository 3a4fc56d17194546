//! Research brief for one newsletter topic.
//!
//! This is the calling glue around [`ResearchClient`]: any provider failure
//! degrades to an empty (or partial) result set with a note, so newsletter
//! generation can continue without research.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::research::{ResearchClient, ResultSet};

/// Research gathered for a topic.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchBrief {
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub results: ResultSet,
    /// Why research is empty or partial, if it is
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Search the topic, then widen with articles similar to the top hit.
///
/// Never fails: errors are logged and recorded in `notes`.
pub async fn gather_research(client: &ResearchClient, topic: &str) -> ResearchBrief {
    let mut brief = ResearchBrief {
        topic: topic.to_string(),
        generated_at: client.now(),
        results: ResultSet::default(),
        notes: Vec::new(),
    };

    match client.search(topic).await {
        Ok(set) => brief.results = set,
        Err(e) => {
            tracing::warn!("Research search failed for {:?}, continuing without results: {}", topic, e);
            brief.notes.push(format!("search failed: {}", e));
            return brief;
        }
    }

    let Some(seed) = brief.results.results.first().map(|h| h.url.clone()) else {
        brief.notes.push("search returned no results".to_string());
        return brief;
    };

    match client.find_similar(&seed).await {
        Ok(similar) => {
            let mut seen: HashSet<String> =
                brief.results.results.iter().map(|h| h.url.clone()).collect();
            for hit in similar.results {
                if seen.insert(hit.url.clone()) {
                    brief.results.results.push(hit);
                }
            }
        }
        Err(e) => {
            tracing::warn!("find_similar failed for {}: {}", seed, e);
            brief.notes.push(format!("find_similar failed: {}", e));
        }
    }

    tracing::info!(
        "Gathered {} research results for {:?}",
        brief.results.len(),
        topic
    );
    brief
}

impl ResearchBrief {
    /// Render the brief as markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# Research: {}\n\n", self.topic);
        out.push_str(&format!(
            "_Generated {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if self.results.is_empty() {
            out.push_str("No research results available.\n\n");
        }

        for (i, hit) in self.results.results.iter().enumerate() {
            let title = hit.title.as_deref().unwrap_or("Untitled");
            out.push_str(&format!("## {}. {}\n**URL:** {}\n", i + 1, title, hit.url));
            if let Some(date) = &hit.published_date {
                out.push_str(&format!("**Published:** {}\n", date));
            }
            if !hit.text.is_empty() {
                out.push_str(&format!("\n{}\n", hit.text.trim()));
            }
            out.push('\n');
        }

        if !self.notes.is_empty() {
            out.push_str("---\n\n");
            for note in &self.notes {
                out.push_str(&format!("- {}\n", note));
            }
        }

        out
    }

    /// File name used for this brief's log, `<timestamp>_research_task.md`.
    pub fn log_file_name(&self) -> String {
        format!(
            "{}_research_task.md",
            self.generated_at.format("%Y-%m-%d_%H-%M-%S")
        )
    }

    /// Write the markdown brief into `dir`, creating it if needed.
    pub fn write_log(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
        let path = dir.join(self.log_file_name());
        std::fs::write(&path, self.to_markdown())
            .with_context(|| format!("writing research brief {}", path.display()))?;
        tracing::info!("Wrote research brief to {}", path.display());
        Ok(path)
    }
}
