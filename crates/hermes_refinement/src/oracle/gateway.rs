use std::fmt::Display;

use jiff::SignedDuration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{problem::problem_instance::ProblemInstance, solution::route_solution::RouteSolution};

use super::{
    client::{JobHandle, JobStatus, Oracle},
    clock::Clock,
    error::{ErrorCategory, OracleError},
    gateway_params::{PollingParams, RetryParams},
    rate_gate::RateGate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleOperation {
    Submit,
    PollStatus,
    FetchResult,
}

impl Display for OracleOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OracleOperation::Submit => "submit",
                OracleOperation::PollStatus => "poll_status",
                OracleOperation::FetchResult => "fetch_result",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: OracleOperation,
        attempts: u32,
        source: OracleError,
    },

    #[error("{operation} rejected: {source}")]
    Rejected {
        operation: OracleOperation,
        source: OracleError,
    },

    #[error("{operation} returned an unusable result: {source}")]
    Unusable {
        operation: OracleOperation,
        source: OracleError,
    },

    #[error("job {handle} still processing after {waited:?}")]
    Timeout {
        handle: JobHandle,
        waited: SignedDuration,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OracleOutcome {
    Solved(RouteSolution),

    /// The oracle accepted the job but reported it failed or cancelled.
    ProcessingFailed { handle: JobHandle, status: JobStatus },

    /// The job finished with a result that cannot be read as a solution.
    InvalidSolution { handle: JobHandle, source: OracleError },
}

/// Runs submit, poll and fetch against an [`Oracle`] with call spacing,
/// retries of transient failures and a bounded polling wait. A finished job
/// whose result is unusable is an outcome, not an error.
pub struct OracleGateway<O, C> {
    oracle: O,
    clock: C,
    rate_gate: RateGate,
    polling: PollingParams,
    retry: RetryParams,
}

impl<O: Oracle, C: Clock> OracleGateway<O, C> {
    pub fn new(oracle: O, clock: C, polling: PollingParams, retry: RetryParams) -> Self {
        OracleGateway {
            oracle,
            clock,
            rate_gate: RateGate::new(polling.min_call_spacing),
            polling,
            retry,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[instrument(skip_all, level = "debug")]
    pub async fn solve(&mut self, instance: &ProblemInstance) -> Result<OracleOutcome, GatewayError> {
        let handle = self
            .call(OracleOperation::Submit, async |oracle: &O| {
                oracle.submit(instance).await
            })
            .await?;

        info!(job = %handle, "Oracle: Submitted instance");

        let started = self.clock.now();
        let mut polls = 0;

        loop {
            polls += 1;
            let status = self
                .call(OracleOperation::PollStatus, async |oracle: &O| {
                    oracle.poll_status(&handle).await
                })
                .await?;

            debug!(job = %handle, polls, "Oracle: Job is {}", status);

            match status {
                JobStatus::Completed => {
                    let fetched = self
                        .call(OracleOperation::FetchResult, async |oracle: &O| {
                            oracle.fetch_result(&handle).await
                        })
                        .await;

                    let solution = match fetched {
                        Ok(solution) => solution,
                        Err(GatewayError::Unusable { source, .. }) => {
                            warn!(job = %handle, "Oracle: {}", source);
                            return Ok(OracleOutcome::InvalidSolution { handle, source });
                        }
                        Err(error) => return Err(error),
                    };

                    info!(
                        job = %handle,
                        routes = solution.route_count(),
                        "Oracle: Fetched solution"
                    );

                    return Ok(OracleOutcome::Solved(solution));
                }
                JobStatus::Failed | JobStatus::Cancelled => {
                    warn!(job = %handle, "Oracle: Job ended as {}", status);
                    return Ok(OracleOutcome::ProcessingFailed { handle, status });
                }
                JobStatus::Processing => {
                    let waited = self.clock.now().duration_since(started);
                    if waited >= self.polling.max_wait {
                        return Err(GatewayError::Timeout { handle, waited });
                    }

                    self.clock.sleep(self.polling.poll_interval).await;
                }
            }
        }
    }

    async fn call<T>(
        &mut self,
        operation: OracleOperation,
        mut request: impl AsyncFnMut(&O) -> Result<T, OracleError>,
    ) -> Result<T, GatewayError> {
        let mut backoff = self.retry.initial_backoff;
        let mut attempt = 1;

        loop {
            self.rate_gate.acquire(&self.clock).await;

            let error = match request(&self.oracle).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match error.category() {
                ErrorCategory::Transient => {}
                ErrorCategory::Validation => {
                    return Err(GatewayError::Rejected {
                        operation,
                        source: error,
                    });
                }
                ErrorCategory::Unusable => {
                    return Err(GatewayError::Unusable {
                        operation,
                        source: error,
                    });
                }
            }

            if attempt >= self.retry.max_attempts {
                return Err(GatewayError::RetriesExhausted {
                    operation,
                    attempts: attempt,
                    source: error,
                });
            }

            warn!(
                %operation,
                attempt,
                "Oracle: {}, retrying in {:?}", error, backoff
            );

            self.clock.sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
            attempt += 1;
        }
    }
}
