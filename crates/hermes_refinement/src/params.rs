use serde::{Deserialize, Serialize};

use crate::{
    constraints::constraint_set::ConstraintSet,
    oracle::gateway_params::{PollingParams, RetryParams},
    strategy::strategy_params::StrategyParams,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefinementParams {
    /// Minimum load every route should carry.
    pub target_min_load: f64,
    pub max_iterations: usize,

    /// Bounds checked on top of the target, which always overrides
    /// `minLoadPerRoute`.
    pub constraints: ConstraintSet,

    pub polling: PollingParams,
    pub retry: RetryParams,
    pub strategy: StrategyParams,
}

impl Default for RefinementParams {
    fn default() -> Self {
        Self {
            target_min_load: 12000.0,
            max_iterations: 5,
            constraints: ConstraintSet::default(),
            polling: PollingParams::default(),
            retry: RetryParams::default(),
            strategy: StrategyParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params: RefinementParams = serde_json::from_value(json!({
            "target_min_load": 10000.0,
            "constraints": { "maxRoutes": 8 },
            "polling": { "poll_interval": "PT5S" },
            "strategy": { "load_balance_weight": 0.5 }
        }))
        .unwrap();

        assert_eq!(params.target_min_load, 10000.0);
        assert_eq!(params.max_iterations, 5);
        assert_eq!(params.constraints.max_routes, Some(8));
        assert_eq!(params.polling.poll_interval, SignedDuration::from_secs(5));
        assert_eq!(params.polling.max_wait, SignedDuration::from_mins(10));
        assert_eq!(params.retry, RetryParams::default());
        assert_eq!(params.strategy.load_balance_weight, Some(0.5));
        assert_eq!(params.strategy.reference_capacity, 12000.0);
    }
}
