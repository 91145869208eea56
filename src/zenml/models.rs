use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Paginated envelope wrapping every ZenML list endpoint response
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct Project {
    pub id: String,
}

/// Status of a pipeline run as reported by the server
/// Statuses added in newer server versions deserialize as `Unknown` instead of failing.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Cached,
    Initializing,
    Provisioning,
    Stopped,
    Stopping,
    Retried,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Return a one-character indicator legible on a 1-bit e-ink panel
    pub fn icon(self) -> &'static str {
        match self {
            Self::Completed => "✓",
            Self::Running => "►",
            Self::Failed => "✗",
            Self::Initializing | Self::Provisioning => "○",
            Self::Cached => "≡",
            Self::Stopped => "■",
            Self::Stopping => "□",
            Self::Retried => "↻",
            Self::Unknown => "?",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cached => "cached",
            Self::Initializing => "initializing",
            Self::Provisioning => "provisioning",
            Self::Stopped => "stopped",
            Self::Stopping => "stopping",
            Self::Retried => "retried",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: RunBody,
    #[serde(default)]
    pub metadata: RunMetadata,
    #[serde(default)]
    pub resources: RunResources,
}

impl Run {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Return the name of the pipeline that this run executed
    pub fn pipeline_name(&self) -> &str {
        self.resources
            .pipeline
            .as_ref()
            .map_or("Unknown", |pipeline| pipeline.name.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RunBody {
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default)]
    pub in_progress: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunMetadata {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunResources {
    #[serde(default)]
    pub pipeline: Option<PipelineRef>,
}

#[derive(Debug, Deserialize)]
pub struct PipelineRef {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: PipelineBody,
}

impl Pipeline {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PipelineBody {
    /// Status of the pipeline's most recent run, absent for pipelines that never ran
    #[serde(default)]
    pub latest_run_status: Option<RunStatus>,
}

/// Parse an ISO-8601 timestamp that may carry an offset, a `Z` suffix, or no zone at all
/// Naive timestamps are interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .ok()
        .map(|naive| naive.and_utc())
}

// Timestamps come from several server versions with inconsistent formats, so a
// run with an unparseable timestamp keeps its other fields instead of failing
// the whole response
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
