use jiff::Timestamp;

use crate::{
    analysis::SolutionAnalysis,
    params::RefinementParams,
    problem::problem_instance::ProblemInstance,
    selector::best_solution::{BestSolution, BestSolutionSelector},
    solution::route_solution::RouteSolution,
};

use super::refinement_report::{
    AttemptFailure, IterationRecord, RefinementReport, RefinementReportBuilder, RunOutcome,
};

/// Instance and solution the next iteration starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub iteration: usize,
    pub instance: ProblemInstance,
    pub solution: RouteSolution,
    pub analysis: SolutionAnalysis,
}

/// Everything a run has accumulated. Each transition consumes the state and
/// returns the next one.
///
/// `current` only ever holds the starting pair or an adopted solution, so it
/// is also the pair a degenerate result reverts to.
#[derive(Debug)]
pub struct RunState {
    iteration: usize,
    current: Candidate,
    last_successful_iteration: Option<usize>,
    selector: BestSolutionSelector,
    records: Vec<IterationRecord>,
    failures: Vec<AttemptFailure>,
}

impl RunState {
    /// A non-degenerate starting solution is recorded as iteration 0.
    pub fn start(initial: Candidate, timestamp: Timestamp) -> Self {
        let state = RunState {
            iteration: 1,
            current: initial.clone(),
            last_successful_iteration: None,
            selector: BestSolutionSelector::default(),
            records: Vec::new(),
            failures: Vec::new(),
        };

        if initial.analysis.is_degenerate() {
            return state;
        }

        state.adopt(IterationRecord {
            iteration: initial.iteration,
            relaxed: false,
            timestamp,
            strategies: Vec::new(),
            instance: initial.instance,
            solution: initial.solution,
            analysis: initial.analysis,
        })
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn current(&self) -> &Candidate {
        &self.current
    }

    pub fn last_successful_iteration(&self) -> Option<usize> {
        self.last_successful_iteration
    }

    pub fn best(&self) -> Option<&BestSolution> {
        self.selector.best()
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[AttemptFailure] {
        &self.failures
    }

    pub fn adopt(mut self, record: IterationRecord) -> Self {
        self.current = Candidate {
            iteration: record.iteration,
            instance: record.instance.clone(),
            solution: record.solution.clone(),
            analysis: record.analysis.clone(),
        };
        self.last_successful_iteration = Some(record.iteration);
        self.selector.offer(BestSolution {
            iteration: record.iteration,
            relaxed: record.relaxed,
            solution: record.solution.clone(),
            analysis: record.analysis.clone(),
        });
        self.records.push(record);
        self
    }

    pub fn fail(mut self, failure: AttemptFailure) -> Self {
        self.failures.push(failure);
        self
    }

    pub fn advance(mut self) -> Self {
        self.iteration += 1;
        self
    }

    pub fn into_report(
        self,
        outcome: RunOutcome,
        params: &RefinementParams,
        started_at: Timestamp,
        finished_at: Timestamp,
    ) -> RefinementReport {
        let mut builder = RefinementReportBuilder::new(outcome, started_at, finished_at);
        builder
            .set_target_min_load(params.target_min_load)
            .set_max_iterations(params.max_iterations)
            .set_best(self.selector.into_best())
            .set_records(self.records)
            .set_failures(self.failures);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        constraints::constraint_set::ConstraintSet,
        controller::refinement_report::FailureReason,
        problem::problem_instance::ProblemInstanceBuilder,
        solution::route::{Route, RouteSummary, Step},
    };

    use super::*;

    fn candidate(iteration: usize, loads: &[f64]) -> Candidate {
        let routes = loads
            .iter()
            .enumerate()
            .map(|(index, load)| {
                Route::new(
                    index as u64 + 1,
                    vec![Step::job(index as u64 + 1, *load)],
                    RouteSummary::default(),
                )
            })
            .collect();
        let solution = RouteSolution::new(routes, vec![]);

        Candidate {
            iteration,
            instance: ProblemInstanceBuilder::default().build(),
            analysis: SolutionAnalysis::evaluate(&solution, 12000.0, &ConstraintSet::default()),
            solution,
        }
    }

    fn record(candidate: Candidate, relaxed: bool) -> IterationRecord {
        IterationRecord {
            iteration: candidate.iteration,
            relaxed,
            timestamp: Timestamp::UNIX_EPOCH,
            strategies: Vec::new(),
            instance: candidate.instance,
            solution: candidate.solution,
            analysis: candidate.analysis,
        }
    }

    #[test]
    fn test_start_records_non_degenerate_solution() {
        let state = RunState::start(candidate(0, &[14000.0, 9000.0]), Timestamp::UNIX_EPOCH);

        assert_eq!(state.iteration(), 1);
        assert_eq!(state.last_successful_iteration(), Some(0));
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.best().map(|best| best.iteration), Some(0));
    }

    #[test]
    fn test_start_with_degenerate_solution_has_nothing_to_revert_to() {
        let state = RunState::start(candidate(0, &[]), Timestamp::UNIX_EPOCH);

        assert_eq!(state.last_successful_iteration(), None);
        assert!(state.records().is_empty());
        assert!(state.best().is_none());
        assert!(state.current().analysis.is_degenerate());
    }

    #[test]
    fn test_failure_keeps_current() {
        let state = RunState::start(candidate(0, &[14000.0, 9000.0]), Timestamp::UNIX_EPOCH)
            .fail(AttemptFailure {
                iteration: 1,
                relaxed: false,
                timestamp: Timestamp::UNIX_EPOCH,
                strategies: Vec::new(),
                instance: None,
                solution: Some(RouteSolution::empty()),
                reason: FailureReason::Degenerate,
            })
            .advance();

        assert_eq!(state.iteration(), 2);
        assert_eq!(state.current().iteration, 0);
        assert_eq!(state.failures().len(), 1);
    }

    #[test]
    fn test_adopt_moves_current_and_offers_best() {
        let state = RunState::start(candidate(0, &[14000.0, 9000.0]), Timestamp::UNIX_EPOCH)
            .adopt(record(candidate(1, &[13000.0, 12500.0]), true));

        assert_eq!(state.current().iteration, 1);
        assert_eq!(state.last_successful_iteration(), Some(1));
        let best = state.best().unwrap();
        assert_eq!(best.iteration, 1);
        assert!(best.relaxed);
    }

    #[test]
    fn test_worse_adoption_keeps_best() {
        let state = RunState::start(candidate(0, &[14000.0, 12000.0]), Timestamp::UNIX_EPOCH)
            .adopt(record(candidate(1, &[14000.0, 9000.0]), false));

        assert_eq!(state.current().iteration, 1);
        assert_eq!(state.best().map(|best| best.iteration), Some(0));
    }
}
