use std::fmt::Display;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::debug;

use crate::{
    problem::vehicle::VehicleId,
    solution::{route::Route, route_solution::RouteSolution},
};

use super::constraint_set::{ConstraintKind, ConstraintSet};

/// Relative distance to a bound under which a passing value is still reported.
pub const WARNING_MARGIN: f64 = 0.1;

#[derive(Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ConstraintIssue {
    pub kind: ConstraintKind,
    pub severity: Severity,
    /// `None` for solution-wide checks.
    pub vehicle_id: Option<VehicleId>,
    pub actual: f64,
    pub bound: f64,
}

impl Display for ConstraintIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.vehicle_id) {
            (ConstraintKind::NonEmptySolution, _) => write!(f, "solution has no routes"),
            (kind, Some(vehicle_id)) => write!(
                f,
                "{kind} on route of vehicle {vehicle_id}: {} (bound {})",
                self.actual, self.bound
            ),
            (kind, None) => write!(f, "{kind}: {} (bound {})", self.actual, self.bound),
        }
    }
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
pub struct ConstraintVerdict {
    violations: Vec<ConstraintIssue>,
    warnings: Vec<ConstraintIssue>,
}

impl ConstraintVerdict {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[ConstraintIssue] {
        &self.violations
    }

    pub fn warnings(&self) -> &[ConstraintIssue] {
        &self.warnings
    }

    fn record(&mut self, issue: ConstraintIssue) {
        match issue.severity {
            Severity::Medium => self.warnings.push(issue),
            Severity::High | Severity::Critical => self.violations.push(issue),
        }
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Lower(f64),
    Upper(f64),
}

impl Bound {
    fn value(&self) -> f64 {
        match self {
            Bound::Lower(bound) | Bound::Upper(bound) => *bound,
        }
    }

    fn classify(&self, actual: f64) -> Option<Severity> {
        match *self {
            Bound::Lower(bound) if actual < bound => Some(Severity::High),
            Bound::Lower(bound) if actual < bound * (1.0 + WARNING_MARGIN) => Some(Severity::Medium),
            Bound::Upper(bound) if actual > bound => Some(Severity::High),
            Bound::Upper(bound) if actual > bound * (1.0 - WARNING_MARGIN) => Some(Severity::Medium),
            _ => None,
        }
    }
}

type RouteMetric = fn(&Route) -> f64;

fn route_load(route: &Route) -> f64 {
    route.load()
}

fn route_distance(route: &Route) -> f64 {
    route.summary().distance
}

fn route_duration(route: &Route) -> f64 {
    route.summary().duration
}

fn check_routes(
    verdict: &mut ConstraintVerdict,
    solution: &RouteSolution,
    kind: ConstraintKind,
    bound: Bound,
    metric: RouteMetric,
) {
    for route in solution.routes() {
        let actual = metric(route);
        if let Some(severity) = bound.classify(actual) {
            verdict.record(ConstraintIssue {
                kind,
                severity,
                vehicle_id: Some(route.vehicle_id()),
                actual,
                bound: bound.value(),
            });
        }
    }
}

/// Checks every active constraint of `constraints` against `solution`.
///
/// A solution without routes yields a single critical violation and nothing
/// else is evaluated.
pub fn check_constraints(solution: &RouteSolution, constraints: &ConstraintSet) -> ConstraintVerdict {
    let mut verdict = ConstraintVerdict::default();

    if solution.is_degenerate() {
        verdict.record(ConstraintIssue {
            kind: ConstraintKind::NonEmptySolution,
            severity: Severity::Critical,
            vehicle_id: None,
            actual: 0.0,
            bound: 1.0,
        });
        return verdict;
    }

    if let Some(min_load) = constraints.min_load_per_route {
        check_routes(
            &mut verdict,
            solution,
            ConstraintKind::MinLoadPerRoute,
            Bound::Lower(min_load),
            route_load,
        );
    }

    if let Some(max_load) = constraints.max_load_per_route {
        check_routes(
            &mut verdict,
            solution,
            ConstraintKind::MaxLoadPerRoute,
            Bound::Upper(max_load),
            route_load,
        );
    }

    if let Some(max_routes) = constraints.max_routes {
        let bound = Bound::Upper(max_routes as f64);
        let actual = solution.route_count() as f64;
        if let Some(severity) = bound.classify(actual) {
            verdict.record(ConstraintIssue {
                kind: ConstraintKind::MaxRoutes,
                severity,
                vehicle_id: None,
                actual,
                bound: bound.value(),
            });
        }
    }

    if let Some(max_distance) = constraints.max_distance {
        check_routes(
            &mut verdict,
            solution,
            ConstraintKind::MaxDistance,
            Bound::Upper(max_distance),
            route_distance,
        );
    }

    if let Some(max_duration) = constraints.max_duration {
        check_routes(
            &mut verdict,
            solution,
            ConstraintKind::MaxDuration,
            Bound::Upper(max_duration),
            route_duration,
        );
    }

    debug!(
        violations = verdict.violations.len(),
        warnings = verdict.warnings.len(),
        "Checked constraints"
    );

    verdict
}
