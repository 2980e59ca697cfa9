pub mod artifact_sink;
pub mod refinement_controller;
pub mod refinement_report;
pub mod run_state;
