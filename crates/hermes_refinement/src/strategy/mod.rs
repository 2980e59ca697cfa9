pub mod refinement_strategy;
pub mod strategy_generator;
pub mod strategy_params;
