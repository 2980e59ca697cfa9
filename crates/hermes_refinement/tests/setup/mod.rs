#![allow(dead_code)]

use std::{collections::VecDeque, sync::Arc};

use hermes_refinement::{
    oracle::{
        client::{JobHandle, JobStatus, Oracle},
        clock::{Clock, ManualClock},
        error::OracleError,
    },
    problem::{
        job::JobBuilder,
        problem_instance::{ProblemInstance, ProblemInstanceBuilder},
        time_window::TimeWindow,
        vehicle::VehicleBuilder,
    },
    solution::{
        route::{Route, RouteSummary, Step},
        route_solution::RouteSolution,
    },
};
use jiff::Timestamp;
use parking_lot::Mutex;

pub const TARGET: f64 = 12000.0;

pub const VEHICLE_WINDOW: TimeWindow = TimeWindow::new(28800, 61200);

/// Vehicles with the given capacities, ids starting at 1.
pub fn create_test_problem(capacities: &[f64]) -> ProblemInstance {
    let vehicles = capacities
        .iter()
        .enumerate()
        .map(|(index, &capacity)| {
            let mut builder = VehicleBuilder::default();
            builder
                .set_id(index as u64 + 1)
                .set_capacity(vec![capacity])
                .set_time_window(VEHICLE_WINDOW);
            builder.build()
        })
        .collect();

    let jobs = (1..=4)
        .map(|id| {
            let mut builder = JobBuilder::default();
            builder
                .set_id(id)
                .set_delivery(vec![3000.0])
                .set_time_windows(vec![TimeWindow::new(32400, 46800)]);
            builder.build()
        })
        .collect();

    let mut builder = ProblemInstanceBuilder::default();
    builder.set_vehicles(vehicles).set_jobs(jobs);
    builder.build()
}

/// One route per load, each with a single job step carrying that load.
pub fn create_test_solution(loads: &[f64]) -> RouteSolution {
    let routes = loads
        .iter()
        .enumerate()
        .map(|(index, &load)| {
            Route::new(
                index as u64 + 1,
                vec![Step::job(index as u64 + 1, load)],
                RouteSummary {
                    distance: 10000.0,
                    duration: 3600.0,
                },
            )
        })
        .collect();

    RouteSolution::new(routes, vec![])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Submit,
    PollStatus,
    FetchResult,
}

#[derive(Default)]
struct ScriptedOracleState {
    submits: VecDeque<Result<JobHandle, OracleError>>,
    statuses: VecDeque<Result<JobStatus, OracleError>>,
    results: VecDeque<Result<RouteSolution, OracleError>>,
    submitted: Vec<ProblemInstance>,
    calls: Vec<(Call, Timestamp)>,
    jobs: usize,
}

/// Oracle answering from scripted queues.
///
/// Empty queues fall back to accepting the submission and reporting it as
/// completed; a fetch with no scripted result is a malformed response.
#[derive(Clone)]
pub struct ScriptedOracle {
    clock: ManualClock,
    state: Arc<Mutex<ScriptedOracleState>>,
}

impl ScriptedOracle {
    pub fn new(clock: ManualClock) -> Self {
        ScriptedOracle {
            clock,
            state: Arc::new(Mutex::new(ScriptedOracleState::default())),
        }
    }

    pub fn with_solutions(clock: ManualClock, solutions: Vec<RouteSolution>) -> Self {
        let oracle = ScriptedOracle::new(clock);
        for solution in solutions {
            oracle.push_result(Ok(solution));
        }
        oracle
    }

    pub fn push_submit(&self, result: Result<JobHandle, OracleError>) {
        self.state.lock().submits.push_back(result);
    }

    pub fn push_status(&self, result: Result<JobStatus, OracleError>) {
        self.state.lock().statuses.push_back(result);
    }

    pub fn push_result(&self, result: Result<RouteSolution, OracleError>) {
        self.state.lock().results.push_back(result);
    }

    /// Instances whose submission succeeded.
    pub fn submitted(&self) -> Vec<ProblemInstance> {
        self.state.lock().submitted.clone()
    }

    pub fn calls(&self) -> Vec<(Call, Timestamp)> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|(made, _)| *made == call)
            .count()
    }

    fn log(&self, call: Call) {
        let now = self.clock.now();
        self.state.lock().calls.push((call, now));
    }
}

impl Oracle for ScriptedOracle {
    async fn submit(&self, instance: &ProblemInstance) -> Result<JobHandle, OracleError> {
        self.log(Call::Submit);

        let mut state = self.state.lock();
        state.jobs += 1;
        let default = JobHandle::new(format!("job-{}", state.jobs));
        let result = state.submits.pop_front().unwrap_or(Ok(default));
        if result.is_ok() {
            state.submitted.push(instance.clone());
        }

        result
    }

    async fn poll_status(&self, _handle: &JobHandle) -> Result<JobStatus, OracleError> {
        self.log(Call::PollStatus);

        self.state
            .lock()
            .statuses
            .pop_front()
            .unwrap_or(Ok(JobStatus::Completed))
    }

    async fn fetch_result(&self, _handle: &JobHandle) -> Result<RouteSolution, OracleError> {
        self.log(Call::FetchResult);

        self.state
            .lock()
            .results
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::MalformedResponse("no scripted result".to_string())))
    }
}
