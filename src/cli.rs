use clap::{Parser, ValueEnum};

/// Push pipeline status from a ZenML server to a TRMNL e-ink display
#[derive(Parser)]
#[clap(about, version, author)]
pub struct Cli {
    /// ZenML server base URL
    #[clap(long, env = "ZENML_SERVER_URL")]
    pub server_url: String,

    /// ZenML service account API key
    #[clap(long, env = "ZENML_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// ZenML project name or ID
    #[clap(long, env = "ZENML_PROJECT", default_value = "default")]
    pub project: String,

    /// TRMNL private plugin webhook URL
    #[clap(long, env = "TRMNL_WEBHOOK_URL", required_unless_present = "dry_run")]
    pub webhook_url: Option<String>,

    /// Which display template to render
    #[clap(long, env = "VIEW_MODE", value_enum, default_value = "recent-runs")]
    pub view_mode: ViewMode,

    /// IANA timezone for displayed timestamps
    #[clap(long, env = "DISPLAY_TIMEZONE", default_value = "UTC")]
    pub timezone: String,

    /// Print the payload without sending it to the webhook
    #[clap(long)]
    pub dry_run: bool,

    /// Log more messages
    #[clap(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ViewMode {
    /// Table of the most recent runs with 24-hour statistics
    RecentRuns,

    /// Every pipeline with the status of its latest run
    PipelinesOverview,

    /// Only the runs that are currently in progress
    RunningOnly,
}
