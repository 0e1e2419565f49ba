//! HTTP mapping of the job board operations.

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracker_core::{Credits, Job, JobId, JobState, RecencyWindow, StateHistoryEntry};

use crate::{ClientConfig, NetworkError};

/// Operations the board needs from the remote service.
///
/// [`ApiClient`] is the HTTP implementation; the sync engine only sees this
/// trait so it can run against any source.
#[allow(async_fn_in_trait)]
pub trait JobsApi {
    /// All tracked jobs, optionally restricted to a recency window.
    async fn list_jobs(&self, window: RecencyWindow) -> Result<Vec<Job>, NetworkError>;

    async fn get_job(&self, id: &JobId) -> Result<Job, NetworkError>;

    /// Move a job to another stage. Any stage is a valid target.
    async fn set_job_state(&self, id: &JobId, state: JobState)
    -> Result<Option<Job>, NetworkError>;

    /// Replace the notes of a job.
    async fn set_job_notes(&self, id: &JobId, notes: &str) -> Result<Option<Job>, NetworkError>;

    async fn job_history(&self, id: &JobId) -> Result<Vec<StateHistoryEntry>, NetworkError>;

    async fn credits(&self) -> Result<Credits, NetworkError>;
}

/// Stateless HTTP client for the `/api/v1` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn jobs_url(&self, window: RecencyWindow) -> String {
        let url = self.config.endpoint("/jobs");
        match window.as_param() {
            Some(range) => format!("{url}?range={range}"),
            None => url,
        }
    }

    pub fn job_url(&self, id: &JobId) -> String {
        self.job_endpoint(id, None)
    }

    pub fn state_url(&self, id: &JobId) -> String {
        self.job_endpoint(id, Some("state"))
    }

    pub fn notes_url(&self, id: &JobId) -> String {
        self.job_endpoint(id, Some("notes"))
    }

    pub fn history_url(&self, id: &JobId) -> String {
        self.job_endpoint(id, Some("history"))
    }

    /// `/jobs/{id}[/{action}]` with the id percent-encoded as one segment.
    fn job_endpoint(&self, id: &JobId, action: Option<&str>) -> String {
        let base = self.config.endpoint("/jobs");
        let mut url = match Url::parse(&base) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Invalid API base URL {}: {}", base, e);
                return match action {
                    Some(action) => format!("{base}/{id}/{action}"),
                    None => format!("{base}/{id}"),
                };
            }
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
            if let Some(action) = action {
                segments.push(action);
            }
        }
        url.into()
    }

    pub fn credits_url(&self) -> String {
        self.config.endpoint("/status/credits")
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, NetworkError> {
        let response = request.send().await.map_err(|e| NetworkError::Unreachable {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(NetworkError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("{} responded with {}: {}", url, status, body);
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn body(response: Response, url: &str) -> Result<String, NetworkError> {
        response.text().await.map_err(|e| NetworkError::Unreachable {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, NetworkError> {
        let body = Self::body(response, url).await?;
        serde_json::from_str(&body).map_err(|e| NetworkError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Mutations answer with the updated job, or with an empty or
    /// acknowledgement-only body.
    async fn read_updated_job(response: Response, url: &str) -> Result<Option<Job>, NetworkError> {
        let body = Self::body(response, url).await?;
        Ok(parse_updated_job(&body))
    }
}

/// Decode a mutation response body into the updated job, if it is one.
///
/// Only an object carrying a non-empty `id` counts as a job; anything else
/// is an acknowledgement.
pub fn parse_updated_job(body: &str) -> Option<Job> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Job>(body) {
        Ok(job) if !job.id.as_str().is_empty() => Some(job),
        Ok(_) => {
            tracing::debug!("Mutation response has no job id, treating as acknowledgement");
            None
        }
        Err(e) => {
            tracing::debug!("Mutation response is not a job ({}), treating as acknowledgement", e);
            None
        }
    }
}

impl JobsApi for ApiClient {
    async fn list_jobs(&self, window: RecencyWindow) -> Result<Vec<Job>, NetworkError> {
        let url = self.jobs_url(window);
        tracing::debug!("GET {}", url);
        let response = self.send(self.http.get(&url), &url).await?;
        Self::read_json(response, &url).await
    }

    async fn get_job(&self, id: &JobId) -> Result<Job, NetworkError> {
        let url = self.job_url(id);
        tracing::debug!("GET {}", url);
        let response = self.send(self.http.get(&url), &url).await?;
        // The backend answers `null` for unknown ids.
        Self::read_json::<Option<Job>>(response, &url)
            .await?
            .ok_or_else(|| NetworkError::NotFound { url: url.clone() })
    }

    async fn set_job_state(
        &self,
        id: &JobId,
        state: JobState,
    ) -> Result<Option<Job>, NetworkError> {
        let url = self.state_url(id);
        tracing::debug!("POST {} state={}", url, state);
        let request = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "state": state }));
        let response = self.send(request, &url).await?;
        Self::read_updated_job(response, &url).await
    }

    async fn set_job_notes(&self, id: &JobId, notes: &str) -> Result<Option<Job>, NetworkError> {
        let url = self.notes_url(id);
        tracing::debug!("PATCH {} ({} chars)", url, notes.len());
        let request = self
            .http
            .patch(&url)
            .json(&serde_json::json!({ "notes": notes }));
        let response = self.send(request, &url).await?;
        Self::read_updated_job(response, &url).await
    }

    async fn job_history(&self, id: &JobId) -> Result<Vec<StateHistoryEntry>, NetworkError> {
        let url = self.history_url(id);
        tracing::debug!("GET {}", url);
        let response = self.send(self.http.get(&url), &url).await?;
        Self::read_json(response, &url).await
    }

    async fn credits(&self) -> Result<Credits, NetworkError> {
        let url = self.credits_url();
        let response = self.send(self.http.get(&url), &url).await?;
        Self::read_json(response, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::new("http://localhost:8000"))
    }

    #[test]
    fn recency_window_becomes_range_parameter() {
        let client = client();
        assert_eq!(
            client.jobs_url(RecencyWindow::All),
            "http://localhost:8000/api/v1/jobs"
        );
        assert_eq!(
            client.jobs_url(RecencyWindow::Hours24),
            "http://localhost:8000/api/v1/jobs?range=24h"
        );
    }

    #[test]
    fn mutation_urls() {
        let client = client();
        let id = JobId::from("abc");
        assert_eq!(client.job_url(&id), "http://localhost:8000/api/v1/jobs/abc");
        assert_eq!(client.state_url(&id), "http://localhost:8000/api/v1/jobs/abc/state");
        assert_eq!(client.notes_url(&id), "http://localhost:8000/api/v1/jobs/abc/notes");
        assert_eq!(
            client.credits_url(),
            "http://localhost:8000/api/v1/status/credits"
        );
    }

    #[test]
    fn job_ids_are_encoded_as_one_path_segment() {
        let client = client();
        let id = JobId::from("a/b?c#d");
        assert_eq!(
            client.job_url(&id),
            "http://localhost:8000/api/v1/jobs/a%2Fb%3Fc%23d"
        );
        assert_eq!(
            client.history_url(&id),
            "http://localhost:8000/api/v1/jobs/a%2Fb%3Fc%23d/history"
        );
        assert_eq!(
            client.state_url(&JobId::from("x y")),
            "http://localhost:8000/api/v1/jobs/x%20y/state"
        );
    }

    #[test]
    fn mutation_bodies_may_be_empty_or_acknowledgements() {
        assert_eq!(parse_updated_job(""), None);
        assert_eq!(parse_updated_job("null"), None);
        assert_eq!(parse_updated_job(r#"{"job_id": 5, "notes": "x"}"#), None);
        assert_eq!(
            parse_updated_job(r#"{"job_id": "9f1c", "state": "applied", "notes": ""}"#),
            None
        );
        assert_eq!(parse_updated_job(r#"{"id": "", "state": "applied"}"#), None);

        let job = parse_updated_job(r#"{"id": 5, "title": "Dev", "state": "applied"}"#).unwrap();
        assert_eq!(job.id, JobId::from("5"));
        assert_eq!(job.stage(), JobState::Applied);
    }
}
