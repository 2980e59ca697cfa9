use fxhash::FxHashSet;
use thiserror::Error;

use super::{
    job::JobId,
    problem_instance::ProblemInstance,
    time_window::TimeWindow,
    vehicle::VehicleId,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationViolation {
    #[error("vehicle {vehicle_id} has a non-positive capacity {capacity:?}")]
    VehicleCapacity {
        vehicle_id: VehicleId,
        capacity: Vec<f64>,
    },

    #[error("vehicle {vehicle_id} has an empty time window {window:?}")]
    VehicleTimeWindow {
        vehicle_id: VehicleId,
        window: TimeWindow,
    },

    #[error("job {job_id} has an empty time window {window:?} at position {position}")]
    JobTimeWindow {
        job_id: JobId,
        position: usize,
        window: TimeWindow,
    },

    #[error("vehicle id {vehicle_id} is used more than once")]
    DuplicateVehicleId { vehicle_id: VehicleId },
}

/// Every violation found in a single pass over the instance.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("instance failed validation: {}", format_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<ValidationViolation>,
}

fn format_violations(violations: &[ValidationViolation]) -> String {
    violations
        .iter()
        .map(|violation| violation.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProblemInstance {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        let mut seen_vehicles = FxHashSet::default();

        for vehicle in self.vehicles() {
            if !seen_vehicles.insert(vehicle.id()) {
                violations.push(ValidationViolation::DuplicateVehicleId {
                    vehicle_id: vehicle.id(),
                });
            }

            let capacity = vehicle.capacity();
            if capacity.is_empty() || capacity.iter().any(|&dimension| dimension <= 0.0) {
                violations.push(ValidationViolation::VehicleCapacity {
                    vehicle_id: vehicle.id(),
                    capacity: capacity.to_vec(),
                });
            }

            if let Some(window) = vehicle.time_window()
                && !window.is_valid()
            {
                violations.push(ValidationViolation::VehicleTimeWindow {
                    vehicle_id: vehicle.id(),
                    window: *window,
                });
            }
        }

        for job in self.jobs() {
            for (position, window) in job.time_windows().iter().enumerate() {
                if !window.is_valid() {
                    violations.push(ValidationViolation::JobTimeWindow {
                        job_id: job.id(),
                        position,
                        window: *window,
                    });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::{
        job::JobBuilder, problem_instance::ProblemInstanceBuilder, vehicle::VehicleBuilder,
    };

    use super::*;

    fn vehicle(id: VehicleId, capacity: Vec<f64>, window: Option<TimeWindow>) -> crate::problem::vehicle::Vehicle {
        let mut builder = VehicleBuilder::default();
        builder.set_id(id).set_capacity(capacity);
        if let Some(window) = window {
            builder.set_time_window(window);
        }
        builder.build()
    }

    #[test]
    fn test_valid_instance() {
        let mut builder = ProblemInstanceBuilder::default();
        builder.set_vehicles(vec![vehicle(1, vec![100.0], Some(TimeWindow::new(0, 10)))]);
        assert!(builder.build().validate().is_ok());
    }

    #[test]
    fn test_reports_every_violation() {
        let mut job = JobBuilder::default();
        job.set_id(42)
            .set_time_windows(vec![TimeWindow::new(0, 100), TimeWindow::new(500, 400)]);

        let mut builder = ProblemInstanceBuilder::default();
        builder
            .set_vehicles(vec![
                vehicle(1, vec![0.0], None),
                vehicle(2, vec![100.0], Some(TimeWindow::new(50, 50))),
                vehicle(2, vec![], None),
            ])
            .set_jobs(vec![job.build()]);

        let error = builder.build().validate().unwrap_err();

        assert_eq!(
            error.violations,
            vec![
                ValidationViolation::VehicleCapacity {
                    vehicle_id: 1,
                    capacity: vec![0.0]
                },
                ValidationViolation::VehicleTimeWindow {
                    vehicle_id: 2,
                    window: TimeWindow::new(50, 50)
                },
                ValidationViolation::DuplicateVehicleId { vehicle_id: 2 },
                ValidationViolation::VehicleCapacity {
                    vehicle_id: 2,
                    capacity: vec![]
                },
                ValidationViolation::JobTimeWindow {
                    job_id: 42,
                    position: 1,
                    window: TimeWindow::new(500, 400)
                },
            ]
        );
        assert!(error.to_string().contains("vehicle 1 has a non-positive capacity"));
    }
}
