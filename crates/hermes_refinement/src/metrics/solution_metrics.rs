use schemars::JsonSchema;
use serde::Serialize;

use crate::solution::route_solution::RouteSolution;

use super::{
    compliance_report::{ComplianceReport, RouteLoad},
    load_distribution::LoadDistribution,
};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RouteMetrics {
    pub route_loads: Vec<RouteLoad>,
    pub distribution: LoadDistribution,
    pub compliance: ComplianceReport,
    pub total_distance: f64,
    pub total_duration: f64,
    pub unassigned_count: usize,
}

impl RouteMetrics {
    pub fn route_count(&self) -> usize {
        self.route_loads.len()
    }

    pub fn compliance_rate(&self) -> f64 {
        self.compliance.compliance_rate()
    }
}

/// A solution without routes never gets a compliance rate, it is reported as
/// `Degenerate` instead.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolutionMetrics {
    Degenerate { unassigned_count: usize },
    Evaluated(Box<RouteMetrics>),
}

impl SolutionMetrics {
    pub fn compute(solution: &RouteSolution, target_min_load: f64) -> Self {
        let route_loads: Vec<RouteLoad> = solution
            .routes()
            .iter()
            .map(|route| RouteLoad {
                vehicle_id: route.vehicle_id(),
                load: route.load(),
            })
            .collect();

        let loads: Vec<f64> = route_loads.iter().map(|route| route.load).collect();

        let (Some(distribution), Some(compliance)) = (
            LoadDistribution::from_loads(&loads),
            ComplianceReport::from_route_loads(&route_loads, target_min_load),
        ) else {
            return SolutionMetrics::Degenerate {
                unassigned_count: solution.unassigned_count(),
            };
        };

        SolutionMetrics::Evaluated(Box::new(RouteMetrics {
            total_distance: solution.routes().iter().map(|r| r.summary().distance).sum(),
            total_duration: solution.routes().iter().map(|r| r.summary().duration).sum(),
            unassigned_count: solution.unassigned_count(),
            route_loads,
            distribution,
            compliance,
        }))
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, SolutionMetrics::Degenerate { .. })
    }

    pub fn route_metrics(&self) -> Option<&RouteMetrics> {
        match self {
            SolutionMetrics::Degenerate { .. } => None,
            SolutionMetrics::Evaluated(metrics) => Some(metrics),
        }
    }

    pub fn compliance(&self) -> Option<&ComplianceReport> {
        self.route_metrics().map(|metrics| &metrics.compliance)
    }

    pub fn compliance_rate(&self) -> Option<f64> {
        self.route_metrics().map(RouteMetrics::compliance_rate)
    }

    pub fn route_count(&self) -> usize {
        self.route_metrics().map_or(0, RouteMetrics::route_count)
    }
}
