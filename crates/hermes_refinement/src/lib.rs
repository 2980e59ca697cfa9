pub mod analysis;
pub mod constraints;
pub mod controller;
pub mod json;
pub mod metrics;
pub mod mutator;
pub mod oracle;
pub mod params;
pub mod problem;
pub mod selector;
pub mod solution;
pub mod strategy;
pub mod utils;
