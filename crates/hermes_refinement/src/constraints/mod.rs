pub mod constraint_checker;
pub mod constraint_set;
