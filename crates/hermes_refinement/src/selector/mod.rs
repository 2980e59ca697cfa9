pub mod best_solution;
