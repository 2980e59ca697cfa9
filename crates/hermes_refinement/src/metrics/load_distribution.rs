use schemars::JsonSchema;
use serde::Serialize;

/// Summary statistics of the route loads of a solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct LoadDistribution {
    pub mean: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl LoadDistribution {
    /// `None` when there are no loads, there is nothing to describe.
    pub fn from_loads(loads: &[f64]) -> Option<Self> {
        if loads.is_empty() {
            return None;
        }

        let mut sorted = loads.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / count;
        let variance = sorted
            .iter()
            .map(|load| (load - mean).powi(2))
            .sum::<f64>()
            / count;
        let std_dev = variance.sqrt();

        Some(LoadDistribution {
            mean,
            std_dev,
            coefficient_of_variation: if mean == 0.0 { 0.0 } else { std_dev / mean },
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
        })
    }
}

/// Linear interpolation between closest ranks, `sorted` must not be empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
