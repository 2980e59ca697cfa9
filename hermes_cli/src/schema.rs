use clap::ValueEnum;
use hermes_refinement::json::schema::{generate_problem_schema, generate_solution_schema};

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaKind {
    Problem,
    Solution,
}

pub fn run(kind: SchemaKind) -> anyhow::Result<()> {
    let schema = match kind {
        SchemaKind::Problem => generate_problem_schema()?,
        SchemaKind::Solution => generate_solution_schema()?,
    };

    println!("{schema}");

    Ok(())
}
