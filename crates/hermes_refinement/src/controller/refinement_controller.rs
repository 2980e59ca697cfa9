use tracing::{error, info, instrument, warn};

use crate::{
    analysis::SolutionAnalysis,
    mutator::input_mutator::mutate,
    oracle::{
        client::{JobStatus, Oracle},
        clock::Clock,
        error::OracleError,
        gateway::{GatewayError, OracleGateway, OracleOutcome},
    },
    params::RefinementParams,
    problem::{problem_instance::ProblemInstance, validation::ValidationError},
    solution::route_solution::RouteSolution,
    strategy::{
        refinement_strategy::PrioritizedStrategy,
        strategy_generator::{StrategyContext, StrategyGenerator},
    },
    timer_debug,
};

use super::{
    artifact_sink::{ArtifactSink, NoopSink},
    refinement_report::{
        AttemptFailure, FailureReason, IterationRecord, RefinementError, RefinementReport,
        RunOutcome,
    },
    run_state::{Candidate, RunState},
};

enum Attempt {
    Solved {
        instance: ProblemInstance,
        solution: RouteSolution,
    },
    ProcessingFailed {
        instance: ProblemInstance,
        status: JobStatus,
    },
    InvalidSolution {
        instance: ProblemInstance,
        error: OracleError,
    },
    Invalid(ValidationError),
    Rejected {
        instance: ProblemInstance,
        error: OracleError,
    },
}

/// What a failed attempt leaves behind for the sink and the report.
struct FailedAttempt {
    instance: Option<ProblemInstance>,
    solution: Option<RouteSolution>,
    reason: FailureReason,
}

enum Evaluated {
    Adoptable {
        instance: ProblemInstance,
        solution: RouteSolution,
        analysis: SolutionAnalysis,
    },
    Failed(FailedAttempt),
}

enum Transition {
    Continue(RunState),
    Halt(RunState, RefinementError),
}

/// Iteratively rewrites a problem instance and resubmits it to the oracle
/// until every route carries the target load or the iteration budget runs
/// out.
pub struct RefinementController<O, C, S = NoopSink> {
    gateway: OracleGateway<O, C>,
    generator: StrategyGenerator,
    params: RefinementParams,
    sink: S,
}

impl<O: Oracle, C: Clock> RefinementController<O, C, NoopSink> {
    pub fn new(oracle: O, clock: C, params: RefinementParams) -> Self {
        RefinementController {
            gateway: OracleGateway::new(
                oracle,
                clock,
                params.polling.clone(),
                params.retry.clone(),
            ),
            generator: StrategyGenerator::new(params.strategy.clone()),
            params,
            sink: NoopSink,
        }
    }
}

impl<O: Oracle, C: Clock, S: ArtifactSink> RefinementController<O, C, S> {
    pub fn with_sink<T: ArtifactSink>(self, sink: T) -> RefinementController<O, C, T> {
        RefinementController {
            gateway: self.gateway,
            generator: self.generator,
            params: self.params,
            sink,
        }
    }

    pub fn params(&self) -> &RefinementParams {
        &self.params
    }

    pub fn gateway(&self) -> &OracleGateway<O, C> {
        &self.gateway
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Never fails: fatal errors end the run with [`RunOutcome::Failed`] and
    /// the report keeps everything gathered until then.
    #[instrument(skip_all, level = "debug")]
    pub async fn run(&mut self, instance: ProblemInstance, solution: RouteSolution) -> RefinementReport {
        let started_at = self.gateway.clock().now();
        let analysis = self.analyze(&solution);

        info!(
            routes = analysis.route_count(),
            compliance_rate = ?analysis.compliance_rate(),
            target = self.params.target_min_load,
            "Refinement: Starting run"
        );

        let mut state = RunState::start(
            Candidate {
                iteration: 0,
                instance,
                solution,
                analysis,
            },
            started_at,
        );

        for record in state.records() {
            self.store_iteration(record);
        }

        let outcome = loop {
            if state.current().analysis.is_acceptable() {
                info!(
                    iteration = state.current().iteration,
                    "Refinement: Every route meets the target"
                );
                break RunOutcome::Success;
            }

            if state.iteration() > self.params.max_iterations {
                warn!(
                    max_iterations = self.params.max_iterations,
                    "Refinement: Iteration limit reached"
                );
                break RunOutcome::IterationLimitReached;
            }

            match self.step(state).await {
                Transition::Continue(next) => state = next.advance(),
                Transition::Halt(halted, error) => {
                    error!("Refinement: {}", error);
                    state = halted;
                    break RunOutcome::Failed { error };
                }
            }
        };

        let report = state.into_report(
            outcome,
            &self.params,
            started_at,
            self.gateway.clock().now(),
        );

        if let Err(error) = self.sink.record_report(&report) {
            warn!("Refinement: Could not store report: {:#}", error);
        }

        report
    }

    fn analyze(&self, solution: &RouteSolution) -> SolutionAnalysis {
        SolutionAnalysis::evaluate(
            solution,
            self.params.target_min_load,
            &self.params.constraints,
        )
    }

    async fn step(&mut self, state: RunState) -> Transition {
        let iteration = state.iteration();
        let strategies = self.generator.generate(
            &state.current().analysis.metrics,
            StrategyContext {
                iteration,
                last_successful_iteration: state.last_successful_iteration(),
                target_min_load: self.params.target_min_load,
            },
        );

        info!(
            iteration,
            strategies = strategies.len(),
            "Refinement: Starting iteration"
        );

        let result = self.attempt(&state.current().instance, &strategies).await;
        let attempt = match result {
            Ok(attempt) => attempt,
            Err(error) => return Transition::Halt(state, error),
        };

        let failed = match self.evaluate(attempt) {
            Evaluated::Adoptable {
                instance,
                solution,
                analysis,
            } => {
                let record = self.record(iteration, false, strategies, instance, solution, analysis);
                return Transition::Continue(self.adopt(state, record));
            }
            Evaluated::Failed(failed) => failed,
        };

        let needs_recovery = failed.reason.needs_recovery();
        let state = self.fail(state, false, strategies, failed);
        if !needs_recovery {
            return Transition::Continue(state);
        }

        self.recover(state).await
    }

    /// Retries the iteration from the last adopted solution with the relaxed
    /// strategy set.
    async fn recover(&mut self, state: RunState) -> Transition {
        let iteration = state.iteration();
        let Some(revert_to) = state.last_successful_iteration() else {
            return Transition::Halt(state, RefinementError::NothingToRevert { iteration });
        };

        warn!(
            iteration,
            revert_to, "Refinement: Reverting and retrying with relaxed strategies"
        );

        let strategies = self
            .generator
            .generate_relaxed(&state.current().analysis.metrics, self.params.target_min_load);

        let result = self.attempt(&state.current().instance, &strategies).await;
        let attempt = match result {
            Ok(attempt) => attempt,
            Err(error) => return Transition::Halt(state, error),
        };

        match self.evaluate(attempt) {
            Evaluated::Adoptable {
                instance,
                solution,
                analysis,
            } => {
                let record = self.record(iteration, true, strategies, instance, solution, analysis);
                Transition::Continue(self.adopt(state, record))
            }
            Evaluated::Failed(failed) => Transition::Continue(self.fail(state, true, strategies, failed)),
        }
    }

    fn evaluate(&self, attempt: Attempt) -> Evaluated {
        let (instance, solution, reason) = match attempt {
            Attempt::Solved { instance, solution } => {
                let analysis = self.analyze(&solution);
                if !analysis.is_degenerate() {
                    return Evaluated::Adoptable {
                        instance,
                        solution,
                        analysis,
                    };
                }

                (Some(instance), Some(solution), FailureReason::Degenerate)
            }
            Attempt::ProcessingFailed { instance, status } => {
                (Some(instance), None, FailureReason::ProcessingFailed(status))
            }
            Attempt::InvalidSolution { instance, error } => {
                (Some(instance), None, FailureReason::InvalidSolution(error))
            }
            Attempt::Invalid(error) => (None, None, error.into()),
            Attempt::Rejected { instance, error } => {
                (Some(instance), None, FailureReason::Rejected(error))
            }
        };

        Evaluated::Failed(FailedAttempt {
            instance,
            solution,
            reason,
        })
    }

    async fn attempt(
        &mut self,
        instance: &ProblemInstance,
        strategies: &[PrioritizedStrategy],
    ) -> Result<Attempt, RefinementError> {
        let mutated = match mutate(instance, strategies) {
            Ok(mutated) => mutated,
            Err(error) => return Ok(Attempt::Invalid(error)),
        };

        let outcome = timer_debug!("Oracle round trip", self.gateway.solve(&mutated).await);

        match outcome {
            Ok(OracleOutcome::Solved(solution)) => Ok(Attempt::Solved {
                instance: mutated,
                solution,
            }),
            Ok(OracleOutcome::ProcessingFailed { status, .. }) => Ok(Attempt::ProcessingFailed {
                instance: mutated,
                status,
            }),
            Ok(OracleOutcome::InvalidSolution { source, .. }) => Ok(Attempt::InvalidSolution {
                instance: mutated,
                error: source,
            }),
            Err(GatewayError::Rejected { source, .. }) => Ok(Attempt::Rejected {
                instance: mutated,
                error: source,
            }),
            Err(error) => Err(error.into()),
        }
    }

    fn record(
        &self,
        iteration: usize,
        relaxed: bool,
        strategies: Vec<PrioritizedStrategy>,
        instance: ProblemInstance,
        solution: RouteSolution,
        analysis: SolutionAnalysis,
    ) -> IterationRecord {
        IterationRecord {
            iteration,
            relaxed,
            timestamp: self.gateway.clock().now(),
            strategies,
            instance,
            solution,
            analysis,
        }
    }

    fn adopt(&mut self, state: RunState, record: IterationRecord) -> RunState {
        info!(
            iteration = record.iteration,
            relaxed = record.relaxed,
            routes = record.analysis.route_count(),
            compliance_rate = ?record.analysis.compliance_rate(),
            "Refinement: Adopted solution"
        );

        self.store_iteration(&record);
        state.adopt(record)
    }

    fn fail(
        &mut self,
        state: RunState,
        relaxed: bool,
        strategies: Vec<PrioritizedStrategy>,
        failed: FailedAttempt,
    ) -> RunState {
        let failure = AttemptFailure {
            iteration: state.iteration(),
            relaxed,
            timestamp: self.gateway.clock().now(),
            strategies,
            instance: failed.instance,
            solution: failed.solution,
            reason: failed.reason,
        };

        warn!(
            iteration = failure.iteration,
            relaxed, "Refinement: Attempt failed: {}", failure.reason
        );

        if let Err(error) = self.sink.record_failure(&failure) {
            warn!("Refinement: Could not store failure: {:#}", error);
        }

        state.fail(failure)
    }

    fn store_iteration(&mut self, record: &IterationRecord) {
        if let Err(error) = self.sink.record_iteration(record) {
            warn!(
                iteration = record.iteration,
                "Refinement: Could not store iteration: {:#}", error
            );
        }
    }
}
