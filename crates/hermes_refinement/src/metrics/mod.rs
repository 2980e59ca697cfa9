pub mod compliance_report;
pub mod load_distribution;
pub mod solution_metrics;
