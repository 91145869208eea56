mod models;

pub use self::models::{
    Pipeline, PipelineBody, PipelineRef, Run, RunBody, RunMetadata, RunResources, RunStatus,
};
use self::models::{Page, Project};
use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::cell::OnceCell;
use std::time::Duration;

/// Client for the ZenML REST API
pub struct ZenClient {
    http: Client,
    base_url: String,
    api_key: String,
    project: String,
    project_id: OnceCell<String>,
}

impl ZenClient {
    /// Create a new client for the server at the given base URL
    pub fn new(server_url: &str, api_key: String, project: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: server_url.trim_end_matches('/').to_owned(),
            api_key,
            project,
            project_id: OnceCell::new(),
        })
    }

    /// Fetch the most recently created runs, newest first
    pub fn fetch_runs(&self, limit: usize, in_progress_only: bool) -> Result<Vec<Run>> {
        let size = limit.to_string();
        let mut params = vec![
            ("size", size.as_str()),
            ("sort_by", "desc:created"),
            ("hydrate", "true"),
            ("project", self.project_id()?),
        ];
        if in_progress_only {
            params.push(("in_progress", "true"));
        }

        let page: Page<Run> = self.get("/api/v1/runs", &params)?;
        Ok(page.items)
    }

    /// Fetch the most recently updated pipelines
    pub fn fetch_pipelines(&self, limit: usize) -> Result<Vec<Pipeline>> {
        let size = limit.to_string();
        let params = [
            ("size", size.as_str()),
            ("sort_by", "desc:updated"),
            ("hydrate", "true"),
            ("project", self.project_id()?),
        ];

        let page: Page<Pipeline> = self.get("/api/v1/pipelines", &params)?;
        Ok(page.items)
    }

    /// Resolve the configured project name to its ID, looking it up at most once
    /// ZenML Cloud scopes the list endpoints by project ID. A name that the server
    /// doesn't recognize is assumed to already be an ID and is used verbatim.
    fn project_id(&self) -> Result<&str> {
        if let Some(id) = self.project_id.get() {
            return Ok(id);
        }

        let page: Page<Project> =
            self.get("/api/v1/projects", &[("name", self.project.as_str())])?;
        let id = match page.items.into_iter().next() {
            Some(project) => {
                debug!("Resolved project {} to ID {}", self.project, project.id);
                project.id
            }
            None => self.project.clone(),
        };

        Ok(self.project_id.get_or_init(|| id))
    }

    /// Perform an authenticated GET request and deserialize the JSON response
    fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        self.http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(params)
            .send()
            .with_context(|| format!("Failed to connect to {url}"))?
            .error_for_status()
            .with_context(|| format!("Request to {url} failed"))?
            .json()
            .with_context(|| format!("Failed to deserialize the response from {url}"))
    }
}
