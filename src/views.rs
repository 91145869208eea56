use crate::format;
use crate::stats::DayStats;
use crate::zenml::{Pipeline, Run, RunStatus};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::info;
use serde::Serialize;

/// Maximum number of table rows that fit on the display
const MAX_ROWS: usize = 12;
/// The running-only template uses larger rows, so fewer fit
const MAX_RUNNING_ROWS: usize = 6;

/// Merge-variable payload for one of the display templates
/// The serialized field names are the contract with the markup templates.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload {
    RecentRuns(RecentRunsView),
    PipelinesOverview(PipelinesOverviewView),
    RunningOnly(RunningOnlyView),
}

impl Payload {
    /// Build the recent runs table with 24-hour statistics
    pub fn recent_runs(runs: &[Run], now: DateTime<Utc>, tz: Tz) -> Self {
        Self::RecentRuns(RecentRunsView::new(runs, now, tz))
    }

    /// Build the pipelines overview table
    pub fn pipelines_overview(pipelines: &[Pipeline], now: DateTime<Utc>, tz: Tz) -> Self {
        Self::PipelinesOverview(PipelinesOverviewView::new(pipelines, now, tz))
    }

    /// Build the running pipelines table, falling back to the recent runs view
    /// when nothing is in progress so that the display never renders an empty table
    pub fn running_only(in_progress: &[Run], all_runs: &[Run], now: DateTime<Utc>, tz: Tz) -> Self {
        let active = in_progress
            .iter()
            .filter(|run| run.body.in_progress)
            .collect::<Vec<_>>();
        if active.is_empty() {
            info!("No pipelines running, switching to the recent runs view");
            return Self::recent_runs(all_runs, now, tz);
        }

        Self::RunningOnly(RunningOnlyView::new(&active, now, tz))
    }
}

#[derive(Debug, Serialize)]
pub struct RecentRunsView {
    view: &'static str,
    title: &'static str,
    runs: Vec<RunRow>,
    total_runs: usize,
    running_count: usize,
    completed_count: usize,
    failed_count: usize,
    cached_count: usize,
    stats_period: &'static str,
    updated_at: String,
}

impl RecentRunsView {
    fn new(runs: &[Run], now: DateTime<Utc>, tz: Tz) -> Self {
        let rows = runs
            .iter()
            .take(MAX_ROWS)
            .map(|run| RunRow::from_run(run, now))
            .collect::<Vec<_>>();
        let stats = DayStats::collect(runs, now);

        Self {
            view: "recent_runs",
            title: "Recent Pipeline Runs",
            total_runs: rows.len(),
            runs: rows,
            running_count: stats.running,
            completed_count: stats.completed,
            failed_count: stats.failed,
            cached_count: stats.cached,
            stats_period: "24h",
            updated_at: format::local_clock(now, tz),
        }
    }
}

#[derive(Debug, Serialize)]
struct RunRow {
    name: String,
    pipeline: String,
    status: &'static str,
    status_icon: &'static str,
    started: String,
    duration: String,
    in_progress: bool,
    is_failed: bool,
}

impl RunRow {
    fn from_run(run: &Run, now: DateTime<Utc>) -> Self {
        let status = run.body.status;
        Self {
            name: truncate(run.display_name(), 30),
            pipeline: truncate(run.pipeline_name(), 20),
            status: status.as_str(),
            status_icon: status.icon(),
            started: format::time_ago(run.metadata.start_time, now),
            duration: format::duration(run.metadata.start_time, run.metadata.end_time, now),
            in_progress: run.body.in_progress,
            // The markup emphasizes failed rows
            is_failed: status == RunStatus::Failed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelinesOverviewView {
    view: &'static str,
    title: &'static str,
    pipelines: Vec<PipelineRow>,
    total_pipelines: usize,
    updated_at: String,
}

impl PipelinesOverviewView {
    fn new(pipelines: &[Pipeline], now: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            view: "pipelines_overview",
            title: "Pipelines Overview",
            pipelines: pipelines
                .iter()
                .take(MAX_ROWS)
                .map(PipelineRow::from_pipeline)
                .collect(),
            total_pipelines: pipelines.len(),
            updated_at: format::local_clock(now, tz),
        }
    }
}

#[derive(Debug, Serialize)]
struct PipelineRow {
    name: String,
    latest_status: &'static str,
    status_icon: &'static str,
    is_failed: bool,
}

impl PipelineRow {
    fn from_pipeline(pipeline: &Pipeline) -> Self {
        let status = pipeline.body.latest_run_status;
        Self {
            name: truncate(pipeline.display_name(), 25),
            latest_status: status.map_or("never run", RunStatus::as_str),
            status_icon: status.map_or("?", RunStatus::icon),
            is_failed: status == Some(RunStatus::Failed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunningOnlyView {
    view: &'static str,
    title: &'static str,
    runs: Vec<ActiveRunRow>,
    running_count: usize,
    updated_at: String,
}

impl RunningOnlyView {
    fn new(active: &[&Run], now: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            view: "running_only",
            title: "Running Pipelines",
            runs: active
                .iter()
                .take(MAX_RUNNING_ROWS)
                .map(|run| ActiveRunRow::from_run(run, now))
                .collect(),
            running_count: active.len(),
            updated_at: format::local_clock(now, tz),
        }
    }
}

#[derive(Debug, Serialize)]
struct ActiveRunRow {
    name: String,
    pipeline: String,
    status: &'static str,
    started: String,
    duration: String,
}

impl ActiveRunRow {
    fn from_run(run: &Run, now: DateTime<Utc>) -> Self {
        Self {
            name: truncate(run.display_name(), 30),
            pipeline: truncate(run.pipeline_name(), 20),
            status: run.body.status.as_str(),
            started: format::time_ago(run.metadata.start_time, now),
            // No end time yet, so the duration is measured up to now
            duration: format::duration(run.metadata.start_time, None, now),
        }
    }
}

/// Truncate a string to at most `max` characters to fit the fixed-width display
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use crate::zenml::{PipelineBody, PipelineRef, RunBody, RunMetadata, RunResources};
    use chrono::{Duration, TimeZone};
    use serde_json::{json, Value};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn run(name: &str, status: RunStatus, started_mins_ago: i64) -> Run {
        Run {
            name: Some(name.to_owned()),
            body: RunBody {
                status,
                in_progress: status == RunStatus::Running,
            },
            metadata: RunMetadata {
                start_time: Some(now() - Duration::minutes(started_mins_ago)),
                end_time: (status == RunStatus::Completed)
                    .then(|| now() - Duration::minutes(started_mins_ago - 5)),
            },
            resources: RunResources {
                pipeline: Some(PipelineRef {
                    name: String::from("etl"),
                }),
            },
        }
    }

    fn pipeline(name: &str, latest_run_status: Option<RunStatus>) -> Pipeline {
        Pipeline {
            name: Some(name.to_owned()),
            body: PipelineBody { latest_run_status },
        }
    }

    fn to_json(payload: &Payload) -> Value {
        serde_json::to_value(payload).unwrap()
    }

    #[test]
    fn test_recent_runs_fields() {
        let runs = [
            run("nightly-1", RunStatus::Completed, 30),
            run("nightly-2", RunStatus::Failed, 90),
        ];
        let payload = to_json(&Payload::recent_runs(&runs, now(), Tz::UTC));

        assert_eq!(payload["view"], "recent_runs");
        assert_eq!(payload["title"], "Recent Pipeline Runs");
        assert_eq!(payload["total_runs"], 2);
        assert_eq!(payload["completed_count"], 1);
        assert_eq!(payload["failed_count"], 1);
        assert_eq!(payload["running_count"], 0);
        assert_eq!(payload["cached_count"], 0);
        assert_eq!(payload["stats_period"], "24h");
        assert_eq!(payload["updated_at"], "12:00 UTC");

        assert_eq!(
            payload["runs"][0],
            json!({
                "name": "nightly-1",
                "pipeline": "etl",
                "status": "completed",
                "status_icon": "✓",
                "started": "30m ago",
                "duration": "5m 0s",
                "in_progress": false,
                "is_failed": false,
            })
        );
        assert_eq!(payload["runs"][1]["is_failed"], true);
        assert_eq!(payload["runs"][1]["status_icon"], "✗");
    }

    #[test]
    fn test_recent_runs_caps_rows_but_not_stats() {
        let runs = (0..20)
            .map(|index| run(&format!("run-{index}"), RunStatus::Completed, index))
            .collect::<Vec<_>>();
        let payload = to_json(&Payload::recent_runs(&runs, now(), Tz::UTC));

        // The table shows at most 12 rows, but the stats cover every fetched run
        assert_eq!(payload["runs"].as_array().unwrap().len(), 12);
        assert_eq!(payload["total_runs"], 12);
        assert_eq!(payload["completed_count"], 20);
    }

    #[test]
    fn test_pipelines_overview_fields() {
        let pipelines = [
            pipeline("etl", Some(RunStatus::Completed)),
            pipeline("training", Some(RunStatus::Failed)),
            pipeline("unused", None),
        ];
        let payload = to_json(&Payload::pipelines_overview(&pipelines, now(), Tz::UTC));

        assert_eq!(payload["view"], "pipelines_overview");
        assert_eq!(payload["title"], "Pipelines Overview");
        assert_eq!(payload["total_pipelines"], 3);
        assert_eq!(payload["updated_at"], "12:00 UTC");

        assert_eq!(
            payload["pipelines"][0],
            json!({
                "name": "etl",
                "latest_status": "completed",
                "status_icon": "✓",
                "is_failed": false,
            })
        );
        assert_eq!(payload["pipelines"][1]["is_failed"], true);
        assert_eq!(payload["pipelines"][2]["latest_status"], "never run");
        assert_eq!(payload["pipelines"][2]["status_icon"], "?");
    }

    #[test]
    fn test_running_only_fields() {
        let in_progress = [run("deploy-1", RunStatus::Running, 10)];
        let payload = to_json(&Payload::running_only(&in_progress, &[], now(), Tz::UTC));

        assert_eq!(payload["view"], "running_only");
        assert_eq!(payload["title"], "Running Pipelines");
        assert_eq!(payload["running_count"], 1);

        assert_eq!(
            payload["runs"][0],
            json!({
                "name": "deploy-1",
                "pipeline": "etl",
                "status": "running",
                "started": "10m ago",
                "duration": "10m 0s",
            })
        );
    }

    #[test]
    fn test_running_only_ignores_finished_runs() {
        // The in-progress query can race with runs finishing
        let in_progress = [
            run("done", RunStatus::Completed, 10),
            run("active", RunStatus::Running, 5),
        ];
        let payload = to_json(&Payload::running_only(&in_progress, &[], now(), Tz::UTC));

        assert_eq!(payload["view"], "running_only");
        assert_eq!(payload["running_count"], 1);
        assert_eq!(payload["runs"][0]["name"], "active");
    }

    #[test]
    fn test_running_only_falls_back_to_recent_runs() {
        let all_runs = [run("nightly-1", RunStatus::Completed, 30)];
        let payload = to_json(&Payload::running_only(&[], &all_runs, now(), Tz::UTC));

        assert_eq!(payload["view"], "recent_runs");
        assert_eq!(payload["total_runs"], 1);
    }

    #[test]
    fn test_running_only_caps_rows_but_not_count() {
        let in_progress = (0..8)
            .map(|index| run(&format!("run-{index}"), RunStatus::Running, index))
            .collect::<Vec<_>>();
        let payload = to_json(&Payload::running_only(&in_progress, &[], now(), Tz::UTC));

        assert_eq!(payload["runs"].as_array().unwrap().len(), 6);
        assert_eq!(payload["running_count"], 8);
    }

    #[test]
    fn test_name_truncation() {
        let long_name = "a".repeat(64);
        let runs = [run(&long_name, RunStatus::Completed, 5)];
        let payload = to_json(&Payload::recent_runs(&runs, now(), Tz::UTC));
        assert_eq!(payload["runs"][0]["name"], "a".repeat(30));

        let pipelines = [pipeline(&long_name, None)];
        let payload = to_json(&Payload::pipelines_overview(&pipelines, now(), Tz::UTC));
        assert_eq!(payload["pipelines"][0]["name"], "a".repeat(25));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("données-pipeline", 8), "données-");
        assert_eq!(truncate("short", 30), "short");
    }
}
