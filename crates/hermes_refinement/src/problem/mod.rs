pub mod job;
pub mod objective;
pub mod problem_instance;
pub mod time_window;
pub mod validation;
pub mod vehicle;
