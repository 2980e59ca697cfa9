use std::time::Duration;

use hermes_refinement::{
    oracle::{
        client::{JobHandle, JobStatus, Oracle},
        error::OracleError,
    },
    problem::problem_instance::ProblemInstance,
    solution::route_solution::RouteSolution,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::responses::{
    JobResponse, SubmitResponse, classify_error, parse_job_status, solution_from_job,
};

pub const ORACLE_URL_ENV_VAR: &str = "HERMES_ORACLE_URL";
pub const ORACLE_API_KEY_ENV_VAR: &str = "HERMES_ORACLE_API_KEY";

#[derive(Debug, Error)]
pub enum HttpOracleConfigError {
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("failed to build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct HttpOracleParams {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl HttpOracleParams {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpOracleParams {
            base_url: base_url.into(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Reads the base url and the optional api key from the environment.
    pub fn from_env() -> Result<Self, HttpOracleConfigError> {
        let base_url = std::env::var(ORACLE_URL_ENV_VAR)
            .map_err(|_| HttpOracleConfigError::MissingVariable(ORACLE_URL_ENV_VAR))?;

        Ok(HttpOracleParams {
            api_key: std::env::var(ORACLE_API_KEY_ENV_VAR).ok(),
            ..HttpOracleParams::new(base_url)
        })
    }
}

/// [`Oracle`] backed by an asynchronous optimization HTTP API.
///
/// Jobs are posted to `{base}/optimize` and polled at `{base}/optimize/{id}`,
/// which also carries the solution once the job is finished.
pub struct HttpOracle {
    params: HttpOracleParams,
    client: reqwest::Client,
}

impl HttpOracle {
    pub fn new(params: HttpOracleParams) -> Result<Self, HttpOracleConfigError> {
        let client = reqwest::Client::builder()
            .timeout(params.request_timeout)
            .build()?;

        Ok(HttpOracle { params, client })
    }

    fn submit_url(&self) -> String {
        format!("{}/optimize", self.params.base_url.trim_end_matches('/'))
    }

    fn job_url(&self, handle: &JobHandle) -> String {
        format!("{}/{}", self.submit_url(), handle)
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.params.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, OracleError> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|error| OracleError::MalformedResponse(error.to_string()))
    }

    async fn get_job(&self, handle: &JobHandle) -> Result<JobResponse, OracleError> {
        let response = self
            .with_key(self.client.get(self.job_url(handle)))
            .send()
            .await
            .map_err(transport_error)?;

        self.read_json(response).await
    }
}

fn transport_error(error: reqwest::Error) -> OracleError {
    OracleError::Transport(error.to_string())
}

impl Oracle for HttpOracle {
    async fn submit(&self, instance: &ProblemInstance) -> Result<JobHandle, OracleError> {
        let response = self
            .with_key(self.client.post(self.submit_url()))
            .json(instance)
            .send()
            .await
            .map_err(transport_error)?;

        let job: SubmitResponse = self.read_json(response).await?;

        debug!("HttpOracle: Posted instance as job {}", job.job_id);

        Ok(JobHandle::new(job.job_id))
    }

    async fn poll_status(&self, handle: &JobHandle) -> Result<JobStatus, OracleError> {
        let job = self.get_job(handle).await?;

        parse_job_status(&job.status)
    }

    async fn fetch_result(&self, handle: &JobHandle) -> Result<RouteSolution, OracleError> {
        let job = self.get_job(handle).await?;

        solution_from_job(handle, job)
    }
}
