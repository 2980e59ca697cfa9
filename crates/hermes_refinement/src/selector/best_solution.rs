use std::cmp::Ordering;

use serde::Serialize;

use crate::{analysis::SolutionAnalysis, solution::route_solution::RouteSolution};

/// Ordering key of a non-degenerate solution: higher compliance first, then
/// fewer routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionRank {
    pub compliance_rate: f64,
    pub route_count: usize,
}

impl SolutionRank {
    /// `None` for degenerate solutions, which are never ranked.
    pub fn of(analysis: &SolutionAnalysis) -> Option<Self> {
        analysis.compliance_rate().map(|compliance_rate| SolutionRank {
            compliance_rate,
            route_count: analysis.route_count(),
        })
    }
}

impl Eq for SolutionRank {}

impl Ord for SolutionRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compliance_rate
            .total_cmp(&other.compliance_rate)
            .then_with(|| other.route_count.cmp(&self.route_count))
    }
}

impl PartialOrd for SolutionRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSolution {
    pub iteration: usize,
    pub relaxed: bool,
    #[serde(skip)]
    pub solution: RouteSolution,
    pub analysis: SolutionAnalysis,
}

impl BestSolution {
    pub fn rank(&self) -> Option<SolutionRank> {
        SolutionRank::of(&self.analysis)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BestSolutionSelector {
    best: Option<BestSolution>,
}

impl BestSolutionSelector {
    /// Keeps `candidate` when it ranks strictly above the incumbent. Returns
    /// whether it was kept.
    pub fn offer(&mut self, candidate: BestSolution) -> bool {
        let Some(rank) = candidate.rank() else {
            return false;
        };

        let improves = match self.best.as_ref().and_then(BestSolution::rank) {
            Some(incumbent) => rank > incumbent,
            None => true,
        };

        if improves {
            self.best = Some(candidate);
        }

        improves
    }

    pub fn best(&self) -> Option<&BestSolution> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<BestSolution> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        constraints::constraint_set::ConstraintSet,
        solution::route::{Route, RouteSummary, Step},
    };

    use super::*;

    const TARGET: f64 = 12000.0;

    /// `compliant` routes at the target, the rest below it.
    fn candidate(iteration: usize, compliant: usize, routes: usize) -> BestSolution {
        let routes: Vec<Route> = (0..routes)
            .map(|index| {
                let load = if index < compliant { TARGET } else { TARGET / 2.0 };
                Route::new(
                    index as u64 + 1,
                    vec![Step::job(index as u64 + 1, load)],
                    RouteSummary::default(),
                )
            })
            .collect();
        let solution = RouteSolution::new(routes, vec![]);
        let analysis = SolutionAnalysis::evaluate(&solution, TARGET, &ConstraintSet::default());

        BestSolution {
            iteration,
            relaxed: false,
            solution,
            analysis,
        }
    }

    fn degenerate(iteration: usize) -> BestSolution {
        let solution = RouteSolution::empty();
        let analysis = SolutionAnalysis::evaluate(&solution, TARGET, &ConstraintSet::default());

        BestSolution {
            iteration,
            relaxed: false,
            solution,
            analysis,
        }
    }

    #[test]
    fn test_higher_compliance_beats_fewer_routes() {
        // 90% with 10 routes against 80% with 5 routes.
        let mut selector = BestSolutionSelector::default();
        assert!(selector.offer(candidate(1, 4, 5)));
        assert!(selector.offer(candidate(2, 9, 10)));

        assert_eq!(selector.best().map(|best| best.iteration), Some(2));
    }

    #[test]
    fn test_rank_prefers_compliance_then_routes() {
        let ninety_with_six = SolutionRank {
            compliance_rate: 90.0,
            route_count: 6,
        };
        let eighty_with_four = SolutionRank {
            compliance_rate: 80.0,
            route_count: 4,
        };
        let eighty_with_five = SolutionRank {
            compliance_rate: 80.0,
            route_count: 5,
        };
        let eighty_with_six = SolutionRank {
            compliance_rate: 80.0,
            route_count: 6,
        };

        assert!(ninety_with_six > eighty_with_four);
        assert!(eighty_with_five > eighty_with_six);
    }

    #[test]
    fn test_equal_rate_fewer_routes_wins() {
        let mut selector = BestSolutionSelector::default();
        assert!(selector.offer(candidate(1, 6, 6)));
        assert!(selector.offer(candidate(2, 5, 5)));

        assert_eq!(selector.best().map(|best| best.iteration), Some(2));
    }

    #[test]
    fn test_tie_keeps_incumbent() {
        let mut selector = BestSolutionSelector::default();
        assert!(selector.offer(candidate(1, 2, 4)));
        assert!(!selector.offer(candidate(2, 2, 4)));

        assert_eq!(selector.best().map(|best| best.iteration), Some(1));
    }

    #[test]
    fn test_worse_candidate_is_ignored() {
        let mut selector = BestSolutionSelector::default();
        assert!(selector.offer(candidate(1, 4, 4)));
        assert!(!selector.offer(candidate(2, 3, 4)));

        assert_eq!(selector.best().map(|best| best.iteration), Some(1));
    }

    #[test]
    fn test_degenerate_is_never_selected() {
        let mut selector = BestSolutionSelector::default();
        assert!(!selector.offer(degenerate(1)));
        assert!(selector.best().is_none());

        assert!(selector.offer(candidate(2, 0, 3)));
        assert!(!selector.offer(degenerate(3)));
        assert_eq!(selector.best().map(|best| best.iteration), Some(2));
    }
}
