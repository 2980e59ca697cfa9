use schemars::JsonSchema;
use serde::Serialize;

use crate::problem::vehicle::VehicleId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct RouteLoad {
    pub vehicle_id: VehicleId,
    pub load: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct RouteGap {
    pub vehicle_id: VehicleId,
    pub load: f64,
    /// `target - load`, always positive.
    pub gap: f64,
}

/// Route loads measured against a target minimum load.
///
/// Only built for solutions with at least one route, so `compliance_rate`
/// always has a denominator.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ComplianceReport {
    target_min_load: f64,
    below_target: Vec<RouteGap>,
    at_or_above_target: Vec<RouteLoad>,
    compliance_rate: f64,
    total_load_gap: f64,
}

impl ComplianceReport {
    /// Returns `None` for an empty load list.
    pub fn from_route_loads(route_loads: &[RouteLoad], target_min_load: f64) -> Option<Self> {
        if route_loads.is_empty() {
            return None;
        }

        let (at_or_above_target, below): (Vec<RouteLoad>, Vec<RouteLoad>) = route_loads
            .iter()
            .partition(|route| route.load >= target_min_load);

        let below_target: Vec<RouteGap> = below
            .into_iter()
            .map(|route| RouteGap {
                vehicle_id: route.vehicle_id,
                load: route.load,
                gap: target_min_load - route.load,
            })
            .collect();

        let total_load_gap = below_target.iter().map(|route| route.gap).sum();
        let compliance_rate =
            at_or_above_target.len() as f64 / route_loads.len() as f64 * 100.0;

        Some(ComplianceReport {
            target_min_load,
            below_target,
            at_or_above_target,
            compliance_rate,
            total_load_gap,
        })
    }

    pub fn target_min_load(&self) -> f64 {
        self.target_min_load
    }

    pub fn below_target(&self) -> &[RouteGap] {
        &self.below_target
    }

    pub fn at_or_above_target(&self) -> &[RouteLoad] {
        &self.at_or_above_target
    }

    pub fn compliance_rate(&self) -> f64 {
        self.compliance_rate
    }

    pub fn total_load_gap(&self) -> f64 {
        self.total_load_gap
    }

    pub fn is_fully_compliant(&self) -> bool {
        self.below_target.is_empty()
    }

    pub fn route_count(&self) -> usize {
        self.below_target.len() + self.at_or_above_target.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loads(values: &[f64]) -> Vec<RouteLoad> {
        values
            .iter()
            .enumerate()
            .map(|(index, &load)| RouteLoad {
                vehicle_id: index as VehicleId + 1,
                load,
            })
            .collect()
    }

    #[test]
    fn test_half_compliant() {
        let report = ComplianceReport::from_route_loads(&loads(&[14000.0, 9000.0]), 12000.0).unwrap();

        assert_eq!(
            report.below_target(),
            &[RouteGap {
                vehicle_id: 2,
                load: 9000.0,
                gap: 3000.0
            }]
        );
        assert_eq!(report.total_load_gap(), 3000.0);
        assert_eq!(report.compliance_rate(), 50.0);
        assert!(!report.is_fully_compliant());
    }

    #[test]
    fn test_load_equal_to_target_is_compliant() {
        let report = ComplianceReport::from_route_loads(&loads(&[12000.0, 15000.0, 12000.0]), 12000.0)
            .unwrap();

        assert_eq!(report.compliance_rate(), 100.0);
        assert!(report.is_fully_compliant());
        assert_eq!(report.total_load_gap(), 0.0);
    }

    #[test]
    fn test_nothing_compliant() {
        let report = ComplianceReport::from_route_loads(&loads(&[0.0, 100.0, 11999.0]), 12000.0).unwrap();

        assert_eq!(report.compliance_rate(), 0.0);
        assert_eq!(report.total_load_gap(), 12000.0 + 11900.0 + 1.0);
        assert_eq!(report.route_count(), 3);
    }

    #[test]
    fn test_no_routes() {
        assert_eq!(ComplianceReport::from_route_loads(&[], 12000.0), None);
    }

    #[test]
    fn test_rate_bounds_and_full_compliance_equivalence() {
        let cases: [&[f64]; 5] = [
            &[1.0],
            &[12000.0],
            &[5.0, 13000.0, 20000.0],
            &[11999.99, 11999.99],
            &[30000.0, 12000.0, 12000.01, 0.0, 7.5, 18000.0, 2.0],
        ];

        for case in cases {
            let report = ComplianceReport::from_route_loads(&loads(case), 12000.0).unwrap();
            assert!((0.0..=100.0).contains(&report.compliance_rate()));
            assert_eq!(
                report.compliance_rate() == 100.0,
                report.below_target().is_empty()
            );
        }
    }
}
