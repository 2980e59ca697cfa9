use jiff::Timestamp;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::{
    analysis::SolutionAnalysis,
    oracle::{client::JobStatus, error::OracleError, gateway::GatewayError},
    problem::{problem_instance::ProblemInstance, validation::ValidationError},
    selector::best_solution::BestSolution,
    solution::route_solution::RouteSolution,
    strategy::refinement_strategy::PrioritizedStrategy,
};

/// Errors that end a run early.
#[derive(Debug, Error)]
pub enum RefinementError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("iteration {iteration} produced no routes and there is no earlier solution to revert to")]
    NothingToRevert { iteration: usize },
}

/// Why a single attempt produced nothing usable. Never ends the run by itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FailureReason {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Rejected(OracleError),

    #[error("solution has no routes")]
    Degenerate,

    #[error("oracle reported the job as {0}")]
    ProcessingFailed(JobStatus),

    #[error(transparent)]
    InvalidSolution(OracleError),
}

impl FailureReason {
    /// Whether the iteration is retried from the last adopted solution with
    /// the relaxed strategy set.
    pub fn needs_recovery(&self) -> bool {
        match self {
            FailureReason::Degenerate
            | FailureReason::ProcessingFailed(_)
            | FailureReason::InvalidSolution(_) => true,
            FailureReason::Invalid(_) | FailureReason::Rejected(_) => false,
        }
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An attempt that produced at least one route. Owns its own snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub relaxed: bool,
    pub timestamp: Timestamp,
    pub strategies: Vec<PrioritizedStrategy>,
    #[serde(skip)]
    pub instance: ProblemInstance,
    #[serde(skip)]
    pub solution: RouteSolution,
    pub analysis: SolutionAnalysis,
}

/// An attempt that produced nothing usable. The mutated instance is missing
/// when it failed validation, the solution when the oracle returned none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptFailure {
    pub iteration: usize,
    pub relaxed: bool,
    pub timestamp: Timestamp,
    pub strategies: Vec<PrioritizedStrategy>,
    #[serde(skip)]
    pub instance: Option<ProblemInstance>,
    #[serde(skip)]
    pub solution: Option<RouteSolution>,
    pub reason: FailureReason,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    IterationLimitReached,
    Failed {
        #[serde(serialize_with = "serialize_display")]
        error: RefinementError,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

fn serialize_display<S: Serializer>(
    error: &RefinementError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[derive(Debug, Serialize)]
pub struct RefinementReport {
    outcome: RunOutcome,
    target_min_load: f64,
    max_iterations: usize,
    best: Option<BestSolution>,
    records: Vec<IterationRecord>,
    failures: Vec<AttemptFailure>,
    warnings: Vec<String>,
    started_at: Timestamp,
    finished_at: Timestamp,
}

pub struct RefinementReportBuilder {
    outcome: RunOutcome,
    target_min_load: f64,
    max_iterations: usize,
    best: Option<BestSolution>,
    records: Vec<IterationRecord>,
    failures: Vec<AttemptFailure>,
    started_at: Timestamp,
    finished_at: Timestamp,
}

impl RefinementReportBuilder {
    pub fn new(outcome: RunOutcome, started_at: Timestamp, finished_at: Timestamp) -> Self {
        RefinementReportBuilder {
            outcome,
            target_min_load: 0.0,
            max_iterations: 0,
            best: None,
            records: Vec::new(),
            failures: Vec::new(),
            started_at,
            finished_at,
        }
    }

    pub fn set_target_min_load(&mut self, target_min_load: f64) -> &mut RefinementReportBuilder {
        self.target_min_load = target_min_load;
        self
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) -> &mut RefinementReportBuilder {
        self.max_iterations = max_iterations;
        self
    }

    pub fn set_best(&mut self, best: Option<BestSolution>) -> &mut RefinementReportBuilder {
        self.best = best;
        self
    }

    pub fn set_records(&mut self, records: Vec<IterationRecord>) -> &mut RefinementReportBuilder {
        self.records = records;
        self
    }

    pub fn set_failures(&mut self, failures: Vec<AttemptFailure>) -> &mut RefinementReportBuilder {
        self.failures = failures;
        self
    }

    pub fn build(self) -> RefinementReport {
        let warnings = self.warnings();

        RefinementReport {
            outcome: self.outcome,
            target_min_load: self.target_min_load,
            max_iterations: self.max_iterations,
            best: self.best,
            records: self.records,
            failures: self.failures,
            warnings,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if matches!(self.outcome, RunOutcome::IterationLimitReached) {
            warnings.push(format!(
                "reached the limit of {} iterations before every route carried {}",
                self.max_iterations, self.target_min_load
            ));
        }

        if !self.outcome.is_success() {
            match &self.best {
                Some(best) => warnings.push(format!(
                    "best solution is from iteration {} with a compliance rate of {:.1}%",
                    best.iteration,
                    best.analysis.compliance_rate().unwrap_or_default()
                )),
                None => warnings.push("no attempt produced a usable solution".to_string()),
            }
        }

        warnings
    }
}

impl RefinementReport {
    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    pub fn target_min_load(&self) -> f64 {
        self.target_min_load
    }

    pub fn best(&self) -> Option<&BestSolution> {
        self.best.as_ref()
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[AttemptFailure] {
        &self.failures
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn finished_at(&self) -> Timestamp {
        self.finished_at
    }

    /// Highest iteration index attempted, 0 when only the starting solution
    /// was analyzed.
    pub fn iterations_run(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.iteration)
            .chain(self.failures.iter().map(|failure| failure.iteration))
            .max()
            .unwrap_or(0)
    }

    pub fn is_all_failed(&self) -> bool {
        self.best.is_none()
    }
}
