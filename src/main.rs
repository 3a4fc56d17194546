//! newsletter-research - command line entry point
//!
//! Runs research operations against the configured provider.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use newsletter_research::{
    brief::gather_research,
    newsletter::{NewsletterRequest, DEFAULT_TEMPLATE_PATH},
    tools::ToolRegistry,
    ResearchClient, ResearchConfig,
};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "newsletter-research", version, about = "Newsletter research over the Exa API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the last 7 days of web content
    Search { query: String },
    /// Find articles similar to a URL
    Similar { url: String },
    /// Fetch excerpts for article IDs or URLs
    Contents {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Gather a research brief for a newsletter topic and write it to the log directory
    Brief {
        topic: String,
        /// Personal message for the newsletter
        #[arg(short, long, default_value = "")]
        message: String,
        /// HTML template the newsletter will use
        #[arg(short, long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,
    },
    /// Report configuration status without calling the provider
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsletter_research=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Search { query } => {
            let (_, client) = connect()?;
            let out = ToolRegistry::research(client)
                .execute("search_and_contents", json!({ "search_query": query }))
                .await?;
            println!("{}", out);
        }
        Command::Similar { url } => {
            let (_, client) = connect()?;
            let out = ToolRegistry::research(client)
                .execute("find_similar", json!({ "article_url": url }))
                .await?;
            println!("{}", out);
        }
        Command::Contents { ids } => {
            let (_, client) = connect()?;
            let out = ToolRegistry::research(client)
                .execute("get_contents", json!({ "article_ids": ids }))
                .await?;
            println!("{}", out);
        }
        Command::Brief {
            topic,
            message,
            template,
        } => {
            let request = NewsletterRequest::with_template_file(&topic, &message, &template)?;
            let (config, client) = connect()?;
            let brief = gather_research(&client, &request.topic).await;
            let path = brief.write_log(&config.log_dir)?;
            for note in &brief.notes {
                warn!("Research note: {}", note);
            }
            info!("Research brief written to {}", path.display());
            println!(
                "{}",
                serde_json::to_string_pretty(&request.kickoff_inputs(&brief))?
            );
        }
        Command::Check => check()?,
    }

    Ok(())
}

/// Load configuration and build the shared client.
fn connect() -> anyhow::Result<(ResearchConfig, Arc<ResearchClient>)> {
    let config = ResearchConfig::from_env()?;
    info!("Loaded configuration: base_url={}", config.base_url);
    let client = Arc::new(ResearchClient::from_config(&config)?);
    info!("Research provider: {}", client.provider_name());
    Ok((config, client))
}

fn check() -> anyhow::Result<()> {
    let config = ResearchConfig::from_env()?;
    println!("EXA_API_KEY: set");
    println!("base url: {}", config.base_url);
    println!("timeout: {:?}", config.timeout);
    println!("pacing: {:?}", config.pacing_delay);
    println!("log dir: {}", config.log_dir.display());
    Ok(())
}
