use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named bounds a solution is checked against. Unset bounds are not checked.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_load_per_route: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_load_per_route: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_routes: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
}

impl ConstraintSet {
    pub fn with_min_load_per_route(mut self, min_load: f64) -> Self {
        self.min_load_per_route = Some(min_load);
        self
    }

    pub fn with_max_load_per_route(mut self, max_load: f64) -> Self {
        self.max_load_per_route = Some(max_load);
        self
    }

    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = Some(max_routes);
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_max_duration(mut self, max_duration: f64) -> Self {
        self.max_duration = Some(max_duration);
        self
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    /// Not a configurable bound: a solution must contain at least one route.
    NonEmptySolution,
    MinLoadPerRoute,
    MaxLoadPerRoute,
    MaxRoutes,
    MaxDistance,
    MaxDuration,
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ConstraintKind::NonEmptySolution => "nonEmptySolution",
                ConstraintKind::MinLoadPerRoute => "minLoadPerRoute",
                ConstraintKind::MaxLoadPerRoute => "maxLoadPerRoute",
                ConstraintKind::MaxRoutes => "maxRoutes",
                ConstraintKind::MaxDistance => "maxDistance",
                ConstraintKind::MaxDuration => "maxDuration",
            }
        )
    }
}
