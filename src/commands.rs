use crate::cli::{Cli, ViewMode};
use crate::format;
use crate::trmnl;
use crate::views::Payload;
use crate::zenml::ZenClient;
use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};

/// Number of runs to fetch for the 24-hour statistics calculation
const RUNS_FOR_STATS: usize = 100;
/// Number of runs to fetch from the in-progress query
const RUNS_IN_PROGRESS: usize = 20;
/// Number of pipelines to fetch for the overview
const PIPELINES_FOR_OVERVIEW: usize = 20;

/// Implementation for a refresh invocation: fetch, aggregate, and deliver
pub fn refresh(cli: &Cli) -> Result<()> {
    let client = ZenClient::new(&cli.server_url, cli.api_key.clone(), cli.project.clone())?;
    let tz = format::display_tz(&cli.timezone);
    let now = Utc::now();

    info!("Fetching data from {}", cli.server_url);
    debug!(
        "Project: {}, view mode: {:?}, display timezone: {tz}",
        cli.project, cli.view_mode
    );
    if cli.dry_run {
        info!("Dry run mode, nothing will be sent to TRMNL");
    }

    let payload = match cli.view_mode {
        ViewMode::RecentRuns => {
            let runs = client.fetch_runs(RUNS_FOR_STATS, false)?;
            Payload::recent_runs(&runs, now, tz)
        }
        ViewMode::PipelinesOverview => {
            let pipelines = client.fetch_pipelines(PIPELINES_FOR_OVERVIEW)?;
            Payload::pipelines_overview(&pipelines, now, tz)
        }
        ViewMode::RunningOnly => {
            // Fetch the full run list as well so that the view can fall back
            // to recent runs when nothing is in progress
            let in_progress = client.fetch_runs(RUNS_IN_PROGRESS, true)?;
            let all_runs = client.fetch_runs(RUNS_FOR_STATS, false)?;
            Payload::running_only(&in_progress, &all_runs, now, tz)
        }
    };

    if cli.dry_run {
        trmnl::dry_run(&payload)
    } else {
        let webhook_url = cli
            .webhook_url
            .as_deref()
            .context("TRMNL_WEBHOOK_URL is required unless --dry-run is passed")?;
        trmnl::push(webhook_url, &payload)
    }
}
