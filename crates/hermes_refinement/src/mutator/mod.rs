pub mod input_mutator;
