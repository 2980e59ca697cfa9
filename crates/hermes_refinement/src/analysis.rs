use schemars::JsonSchema;
use serde::Serialize;

use crate::{
    constraints::{
        constraint_checker::{ConstraintVerdict, check_constraints},
        constraint_set::ConstraintSet,
    },
    metrics::solution_metrics::SolutionMetrics,
    solution::route_solution::RouteSolution,
};

/// Metrics and constraint verdict of one solution.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SolutionAnalysis {
    pub metrics: SolutionMetrics,
    pub verdict: ConstraintVerdict,
}

impl SolutionAnalysis {
    /// `constraints.min_load_per_route` is replaced by `target_min_load`.
    pub fn evaluate(solution: &RouteSolution, target_min_load: f64, constraints: &ConstraintSet) -> Self {
        let constraints = constraints.clone().with_min_load_per_route(target_min_load);

        SolutionAnalysis {
            metrics: SolutionMetrics::compute(solution, target_min_load),
            verdict: check_constraints(solution, &constraints),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.metrics.is_degenerate()
    }

    /// Passes every constraint and has at least one route.
    pub fn is_acceptable(&self) -> bool {
        !self.is_degenerate() && self.verdict.passed()
    }

    pub fn compliance_rate(&self) -> Option<f64> {
        self.metrics.compliance_rate()
    }

    pub fn route_count(&self) -> usize {
        self.metrics.route_count()
    }
}

#[cfg(test)]
mod tests {
    use crate::solution::route::{Route, RouteSummary, Step};

    use super::*;

    #[test]
    fn test_acceptable_when_every_route_reaches_target() {
        let solution = RouteSolution::new(
            vec![
                Route::new(1, vec![Step::job(1, 12000.0)], RouteSummary::default()),
                Route::new(2, vec![Step::job(2, 15000.0)], RouteSummary::default()),
            ],
            vec![],
        );

        let analysis = SolutionAnalysis::evaluate(&solution, 12000.0, &ConstraintSet::default());

        assert!(analysis.is_acceptable());
        assert_eq!(analysis.compliance_rate(), Some(100.0));
    }

    #[test]
    fn test_extra_constraints_are_checked() {
        let solution = RouteSolution::new(
            vec![
                Route::new(1, vec![Step::job(1, 12000.0)], RouteSummary::default()),
                Route::new(2, vec![Step::job(2, 15000.0)], RouteSummary::default()),
            ],
            vec![],
        );

        let analysis = SolutionAnalysis::evaluate(
            &solution,
            12000.0,
            &ConstraintSet::default().with_max_routes(1),
        );

        assert!(!analysis.is_acceptable());
        assert_eq!(analysis.compliance_rate(), Some(100.0));
    }

    #[test]
    fn test_degenerate_is_never_acceptable() {
        let analysis =
            SolutionAnalysis::evaluate(&RouteSolution::empty(), 12000.0, &ConstraintSet::default());

        assert!(analysis.is_degenerate());
        assert!(!analysis.is_acceptable());
        assert_eq!(analysis.compliance_rate(), None);
    }
}
