use crate::zenml::{Run, RunStatus};
use chrono::{DateTime, Duration, Utc};

/// Status counts for the runs that started within the trailing 24-hour window
#[derive(Debug, Default, Eq, PartialEq)]
pub struct DayStats {
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub cached: usize,
    pub other: usize,
}

impl DayStats {
    /// Tally the runs that started within 24 hours of `now`
    /// Runs without a start time cannot be aged out, so they are counted.
    pub fn collect(runs: &[Run], now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::hours(24);

        let mut stats = Self::default();
        for run in runs {
            if let Some(start_time) = run.metadata.start_time {
                if start_time < cutoff {
                    continue;
                }
            }

            match run.body.status {
                RunStatus::Running => stats.running += 1,
                RunStatus::Completed => stats.completed += 1,
                RunStatus::Failed => stats.failed += 1,
                RunStatus::Cached => stats.cached += 1,
                _ => stats.other += 1,
            }
        }

        stats
    }
}
