use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use serde::de::DeserializeOwned;
use hermes_oracle_http::http_oracle::{HttpOracle, HttpOracleParams};
use hermes_refinement::{
    controller::{
        artifact_sink::ArtifactSink, refinement_controller::RefinementController,
        refinement_report::{RefinementReport, RunOutcome},
    },
    oracle::{client::Oracle, clock::{Clock, TokioClock}},
    params::RefinementParams,
    problem::problem_instance::ProblemInstance,
    solution::route_solution::RouteSolution,
};
use tracing::{info, warn};

use crate::{artifact_store::DirectorySink, parsers, summary};

#[derive(Args)]
pub struct RefineArgs {
    /// Problem instance the starting solution was computed for
    #[arg(short, long)]
    problem: PathBuf,

    /// Starting solution
    #[arg(short, long)]
    solution: PathBuf,

    /// Minimum load every route should carry
    #[arg(short, long, value_parser = parsers::parse_load)]
    target_load: f64,

    #[arg(short, long)]
    max_iterations: Option<usize>,

    /// Folder receiving one sub folder per iteration and the final report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with refinement parameters, flags take precedence
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long)]
    load_balance_weight: Option<f64>,

    /// Interval between two status checks (e.g., "10s", "PT1M")
    #[arg(long, value_parser = parsers::parse_duration)]
    poll_interval: Option<jiff::SignedDuration>,

    /// Time a job may stay in processing before giving up
    #[arg(long, value_parser = parsers::parse_duration)]
    max_wait: Option<jiff::SignedDuration>,
}

fn open_file(path: &PathBuf) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn read_json<T: DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    serde_json::from_reader(open_file(path)?)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn build_params(args: &RefineArgs) -> anyhow::Result<RefinementParams> {
    let mut params = match &args.params {
        Some(path) => read_json(path)?,
        None => RefinementParams::default(),
    };

    params.target_min_load = args.target_load;

    if let Some(max_iterations) = args.max_iterations {
        params.max_iterations = max_iterations;
    }
    if let Some(weight) = args.load_balance_weight {
        params.strategy.load_balance_weight = Some(weight);
    }
    if let Some(poll_interval) = args.poll_interval {
        params.polling.poll_interval = poll_interval;
    }
    if let Some(max_wait) = args.max_wait {
        params.polling.max_wait = max_wait;
    }

    Ok(params)
}

async fn refine<O: Oracle, C: Clock, S: ArtifactSink>(
    mut controller: RefinementController<O, C, S>,
    instance: ProblemInstance,
    solution: RouteSolution,
) -> RefinementReport {
    controller.run(instance, solution).await
}

pub async fn run(args: RefineArgs) -> anyhow::Result<()> {
    let params = build_params(&args)?;

    let instance = ProblemInstance::from_reader(open_file(&args.problem)?)
        .with_context(|| format!("failed to parse {}", args.problem.display()))?;
    let solution = RouteSolution::from_reader(open_file(&args.solution)?)
        .with_context(|| format!("failed to parse {}", args.solution.display()))?;

    if let Err(error) = instance.validate() {
        warn!("Starting instance is invalid, every mutation will be rejected: {}", error);
    }

    info!(
        "Refining {} vehicles, {} jobs, {} routes towards {} per route",
        instance.vehicles().len(),
        instance.jobs().len(),
        solution.route_count(),
        params.target_min_load
    );

    let oracle = HttpOracle::new(HttpOracleParams::from_env()?)?;
    let controller = RefinementController::new(oracle, TokioClock, params);

    let report = match args.output {
        Some(output) => {
            let sink = DirectorySink::create(output)?;
            refine(controller.with_sink(sink), instance, solution).await
        }
        None => refine(controller, instance, solution).await,
    };

    println!("{}", summary::iterations_table(&report));

    for warning in report.warnings() {
        warn!("{}", warning);
    }

    if let RunOutcome::Failed { error } = report.outcome() {
        bail!("refinement failed: {error}");
    }

    Ok(())
}
