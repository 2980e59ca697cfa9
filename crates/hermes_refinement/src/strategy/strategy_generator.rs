use jiff::SignedDuration;
use tracing::debug;

use crate::{metrics::solution_metrics::SolutionMetrics, problem::objective::Objective};

use super::{
    refinement_strategy::{
        PrioritizedStrategy, RefinementStrategy, StrategyPriority, sort_by_priority,
    },
    strategy_params::StrategyParams,
};

pub const MAX_ADDED_VEHICLES: usize = 15;

const LOW_COMPLIANCE_RATE: f64 = 30.0;
const MEDIUM_COMPLIANCE_RATE: f64 = 50.0;

const RELAXED_EXTRA_VEHICLES: usize = 5;
const RELAXED_SOFTENING_MINUTES: i64 = 120;
const RELAXED_WIDENING_MINUTES: i64 = 60;

#[derive(Clone, Copy)]
enum ObjectiveTemplate {
    BalanceTasks,
    MinimizeVehiclesWithLoadConstraint,
    MinimizeDuration,
}

impl ObjectiveTemplate {
    fn instantiate(self, target_min_load: f64) -> Objective {
        match self {
            ObjectiveTemplate::BalanceTasks => Objective::BalanceTasks,
            ObjectiveTemplate::MinimizeVehiclesWithLoadConstraint => {
                Objective::MinimizeVehiclesWithLoadConstraint {
                    min_load: target_min_load,
                }
            }
            ObjectiveTemplate::MinimizeDuration => Objective::MinimizeDuration,
        }
    }
}

const LOW_COMPLIANCE_OBJECTIVES: [ObjectiveTemplate; 3] = [
    ObjectiveTemplate::BalanceTasks,
    ObjectiveTemplate::MinimizeVehiclesWithLoadConstraint,
    ObjectiveTemplate::MinimizeDuration,
];

const SOFTENING_MINUTES: [i64; 6] = [30, 45, 60, 15, 90, 120];

const VEHICLE_CAPACITIES: [f64; 5] = [14000.0, 12000.0, 16000.0, 10000.0, 18000.0];

fn cycle<T: Copy>(table: &[T], iteration: usize) -> T {
    table[iteration % table.len()]
}

fn vehicles_for_gap(total_load_gap: f64, reference_capacity: f64) -> usize {
    if total_load_gap <= 0.0 || reference_capacity <= 0.0 {
        return 0;
    }

    (total_load_gap / reference_capacity).ceil() as usize
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyContext {
    /// 1-based index of the iteration the strategies are generated for.
    pub iteration: usize,
    pub last_successful_iteration: Option<usize>,
    pub target_min_load: f64,
}

/// Deterministic strategy policy: the same inputs always produce the same
/// ordered list.
#[derive(Debug, Clone, Default)]
pub struct StrategyGenerator {
    params: StrategyParams,
}

impl StrategyGenerator {
    pub fn new(params: StrategyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn generate(
        &self,
        metrics: &SolutionMetrics,
        context: StrategyContext,
    ) -> Vec<PrioritizedStrategy> {
        let iteration = context.iteration;
        let compliance = metrics.compliance();
        let compliance_rate = compliance.map_or(0.0, |report| report.compliance_rate());

        let mut strategies = Vec::new();

        if compliance_rate < LOW_COMPLIANCE_RATE {
            let objective =
                cycle(&LOW_COMPLIANCE_OBJECTIVES, iteration).instantiate(context.target_min_load);
            strategies.push(PrioritizedStrategy::new(
                StrategyPriority::High,
                RefinementStrategy::ObjectiveChange { objective },
            ));
        } else if compliance_rate < MEDIUM_COMPLIANCE_RATE {
            strategies.push(PrioritizedStrategy::new(
                StrategyPriority::High,
                RefinementStrategy::ObjectiveChange {
                    objective: Objective::BalanceTasks,
                },
            ));
        }

        strategies.push(PrioritizedStrategy::new(
            StrategyPriority::High,
            RefinementStrategy::TimeWindowSoftening {
                relaxation: SignedDuration::from_mins(cycle(&SOFTENING_MINUTES, iteration)),
            },
        ));

        if let Some(report) = compliance
            && report.below_target().len() * 2 > report.at_or_above_target().len()
        {
            let count = vehicles_for_gap(report.total_load_gap(), self.params.reference_capacity)
                .saturating_add(iteration % 3)
                .min(MAX_ADDED_VEHICLES);

            strategies.push(PrioritizedStrategy::new(
                StrategyPriority::Medium,
                RefinementStrategy::VehicleAddition {
                    count,
                    capacity: cycle(&VEHICLE_CAPACITIES, iteration),
                    time_window: self.params.default_vehicle_time_window,
                },
            ));
        }

        if let Some(balance_weight) = self.params.load_balance_weight {
            strategies.push(PrioritizedStrategy::new(
                StrategyPriority::Low,
                RefinementStrategy::LoadConstraintAddition {
                    min_load: context.target_min_load,
                    balance_weight,
                },
            ));
        }

        sort_by_priority(&mut strategies);

        debug!(
            iteration,
            since_last_success = ?context
                .last_successful_iteration
                .map(|last| iteration.saturating_sub(last)),
            compliance_rate,
            strategies = strategies.len(),
            "Generated strategies"
        );

        strategies
    }

    /// Fallback set used after a degenerate result, independent of the
    /// iteration index.
    pub fn generate_relaxed(
        &self,
        metrics: &SolutionMetrics,
        target_min_load: f64,
    ) -> Vec<PrioritizedStrategy> {
        let total_load_gap = metrics
            .compliance()
            .map_or(0.0, |report| report.total_load_gap());
        let count = vehicles_for_gap(total_load_gap, self.params.relaxed_reference_capacity)
            .saturating_add(RELAXED_EXTRA_VEHICLES)
            .min(MAX_ADDED_VEHICLES);

        vec![
            PrioritizedStrategy::new(
                StrategyPriority::High,
                RefinementStrategy::TimeWindowSoftening {
                    relaxation: SignedDuration::from_mins(RELAXED_SOFTENING_MINUTES),
                },
            ),
            PrioritizedStrategy::new(
                StrategyPriority::High,
                RefinementStrategy::VehicleAddition {
                    count,
                    capacity: self.params.relaxed_vehicle_capacity,
                    time_window: self.params.default_vehicle_time_window,
                },
            ),
            PrioritizedStrategy::new(
                StrategyPriority::Medium,
                RefinementStrategy::TimeWindowRelaxation {
                    relaxation: SignedDuration::from_mins(RELAXED_WIDENING_MINUTES),
                },
            ),
            PrioritizedStrategy::new(
                StrategyPriority::Medium,
                RefinementStrategy::ObjectiveChange {
                    objective: Objective::MinimizeVehiclesWithLoadConstraint {
                        min_load: target_min_load,
                    },
                },
            ),
        ]
    }
}
