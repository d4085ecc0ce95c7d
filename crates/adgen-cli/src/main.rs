//! Adgen CLI - trigger and watch generation jobs
//!
//! Thin client over the Adgen API; `watch` drives the resilient
//! progress poller against the job routes.

mod api;
mod config;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use adgen::domain::Purpose;
use adgen::services::{CancelHandle, PollOutcome, ProgressPoller, ProgressUpdate};

use api::{AdgenClient, JobItem};
use config::Config;

#[derive(Parser)]
#[command(name = "adgen")]
#[command(about = "Adgen CLI - trigger and watch ad generation jobs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger a generation job
    Generate {
        /// Scene description
        #[arg(short, long)]
        prompt: Option<String>,
        /// Purpose: social, product or lifestyle
        #[arg(long, default_value = "social")]
        purpose: String,
        /// Business sector (food, tech, fashion, ...)
        #[arg(short, long)]
        sector: String,
        /// Communication style hint
        #[arg(long)]
        style: Option<String>,
        /// Brand name
        #[arg(short, long)]
        brand: Option<String>,
        /// Number of creatives to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Bypass the validated-artifact cache
        #[arg(long)]
        skip_cache: bool,
        /// Watch the job until it finishes
        #[arg(short, long)]
        watch: bool,
    },

    /// Watch a running job until it terminates
    Watch {
        /// Job id returned by `generate`
        job_id: String,
    },

    /// Show or update configuration
    Config {
        /// Set the server base URL and persist it
        #[arg(long)]
        set_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let client = Arc::new(AdgenClient::new(&config.base_url));

    match cli.command {
        Commands::Generate {
            prompt,
            purpose,
            sector,
            style,
            brand,
            count,
            skip_cache,
            watch,
        } => {
            let purpose = parse_purpose(&purpose)?;
            let items: Vec<JobItem> = (0..count.max(1))
                .map(|_| JobItem {
                    id: None,
                    prompt: prompt.clone(),
                    purpose,
                    sector: sector.clone(),
                    style: style.clone(),
                    brand: brand.clone(),
                })
                .collect();

            let job_id = client.create_job(&items, skip_cache).await?;
            println!("{} job {}", "Started".green().bold(), job_id.cyan());

            if watch {
                watch_job(client, &job_id).await?;
            } else {
                println!("Track it with: {}", format!("adgen watch {}", job_id).dimmed());
            }
        }

        Commands::Watch { job_id } => {
            watch_job(client, &job_id).await?;
        }

        Commands::Config { set_url } => {
            if let Some(url) = set_url {
                let mut config = config;
                config.base_url = url.trim_end_matches('/').to_string();
                config.save()?;
                println!(
                    "{} base_url saved to {:?}",
                    "✓".green(),
                    Config::config_path()?
                );
            } else {
                println!("{}", "Current configuration:".bold());
                println!("  config file: {:?}", Config::config_path()?);
                println!("  base_url:    {}", config.base_url);
                match client.health().await {
                    Ok(true) => println!("  server:      {}", "reachable".green()),
                    _ => println!("  server:      {}", "unreachable".red()),
                }
            }
        }
    }

    Ok(())
}

fn parse_purpose(value: &str) -> Result<Purpose> {
    match value {
        "social" => Ok(Purpose::Social),
        "product" => Ok(Purpose::Product),
        "lifestyle" => Ok(Purpose::Lifestyle),
        other => bail!("unknown purpose '{}': use social, product or lifestyle", other),
    }
}

async fn watch_job(client: Arc<AdgenClient>, job_id: &str) -> Result<()> {
    println!("{} job {}", "Watching".bold(), job_id.cyan());

    let poller = ProgressPoller::new(client);
    let cancel = CancelHandle::new();

    let outcome = poller
        .poll(job_id, &cancel, |update: ProgressUpdate| {
            let percent = (update.progress * 100.0).round() as u32;
            println!(
                "  {:>3}% {} ({} done)",
                percent,
                format!("{:?}", update.step).dimmed(),
                update.completed_count
            );
        })
        .await;

    match outcome {
        PollOutcome::Completed { items } => {
            println!("{}", "Completed".green().bold());
            for item in items {
                if let Some(url) = item.image_url {
                    println!("  {} {}", item.id.bold(), url);
                }
            }
            Ok(())
        }
        PollOutcome::Failed { error } => bail!("generation failed: {}", error),
        PollOutcome::TimedOut => {
            bail!("generation is taking longer than expected; it may still finish server-side")
        }
        PollOutcome::Cancelled => Ok(()),
    }
}
