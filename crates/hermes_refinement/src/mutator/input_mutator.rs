use jiff::SignedDuration;
use tracing::{debug, instrument};

use crate::{
    problem::{
        problem_instance::ProblemInstance,
        time_window::TimeWindow,
        validation::ValidationError,
        vehicle::{LOAD_BALANCING_DESCRIPTION, VehicleBuilder},
    },
    strategy::refinement_strategy::{PrioritizedStrategy, RefinementStrategy},
};

/// Upper bound of the visit lateness a softening may allow.
pub const MAX_VISIT_LATENESS: SignedDuration = SignedDuration::from_mins(30);

/// Applies `strategies` in order to a copy of `instance` and validates the
/// result. `instance` itself is never modified.
#[instrument(skip_all, level = "debug")]
pub fn mutate(
    instance: &ProblemInstance,
    strategies: &[PrioritizedStrategy],
) -> Result<ProblemInstance, ValidationError> {
    let mut mutated = instance.clone();

    for prioritized in strategies {
        debug!(priority = ?prioritized.priority, "Applying {}", prioritized.strategy);
        apply_strategy(&mut mutated, &prioritized.strategy);
    }

    mutated.validate()?;

    Ok(mutated)
}

fn apply_strategy(instance: &mut ProblemInstance, strategy: &RefinementStrategy) {
    match strategy {
        RefinementStrategy::ObjectiveChange { objective } => {
            instance.set_objective(objective.clone());
        }
        RefinementStrategy::VehicleAddition {
            count,
            capacity,
            time_window,
        } => add_vehicles(instance, *count, *capacity, *time_window),
        RefinementStrategy::TimeWindowRelaxation { relaxation } => {
            widen_time_windows(instance, *relaxation)
        }
        RefinementStrategy::TimeWindowSoftening { relaxation } => {
            let constraints = instance.constraints_mut();
            constraints.max_vehicle_overtime = Some(relaxation.as_secs());
            constraints.max_visit_lateness = Some((*relaxation).min(MAX_VISIT_LATENESS).as_secs());
        }
        RefinementStrategy::LoadConstraintAddition {
            min_load,
            balance_weight,
        } => {
            let constraints = instance.constraints_mut();
            constraints.min_load_per_route = Some(*min_load);
            constraints.load_balance_weight = Some(*balance_weight);
        }
    }
}

fn add_vehicles(
    instance: &mut ProblemInstance,
    count: usize,
    capacity: f64,
    time_window: Option<TimeWindow>,
) {
    let time_window = time_window.or_else(|| {
        TimeWindow::envelope(
            instance
                .vehicles()
                .iter()
                .filter_map(|vehicle| vehicle.time_window()),
        )
    });

    let first_id = instance.max_vehicle_id().map_or(1, |id| id + 1);

    let vehicles = instance.vehicles_mut();
    vehicles.reserve(count);
    for id in (first_id..).take(count) {
        let mut builder = VehicleBuilder::default();
        builder
            .set_id(id)
            .set_capacity(vec![capacity])
            .set_description(LOAD_BALANCING_DESCRIPTION);
        if let Some(time_window) = time_window {
            builder.set_time_window(time_window);
        }
        vehicles.push(builder.build());
    }
}

fn widen_time_windows(instance: &mut ProblemInstance, relaxation: SignedDuration) {
    for job in instance.jobs_mut() {
        for window in job.time_windows_mut() {
            *window = window.widened(relaxation);
        }
    }

    for vehicle in instance.vehicles_mut() {
        if let Some(window) = vehicle.time_window().copied() {
            vehicle.set_time_window(window.widened(relaxation));
        }
    }
}
