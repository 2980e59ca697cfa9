use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use hermes_refinement::controller::{
    artifact_sink::ArtifactSink,
    refinement_report::{AttemptFailure, IterationRecord, RefinementReport},
};
use serde::Serialize;
use tracing::debug;

/// Writes `iteration_<n>[_relaxed]/{problem,solution,strategies}.json` for
/// every adopted solution, `iteration_<n>[_relaxed]_failed/` with whatever a
/// failed attempt left plus `reason.json`, and `report.json` plus
/// `best_solution.json` at the end of the run.
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn create(root: PathBuf) -> anyhow::Result<Self> {
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create {}", root.display()))?;

        Ok(DirectorySink { root })
    }

    pub fn iteration_folder(&self, iteration: usize, relaxed: bool) -> PathBuf {
        let name = if relaxed {
            format!("iteration_{iteration}_relaxed")
        } else {
            format!("iteration_{iteration}")
        };

        self.root.join(name)
    }

    pub fn failure_folder(&self, iteration: usize, relaxed: bool) -> PathBuf {
        let mut folder = self.iteration_folder(iteration, relaxed).into_os_string();
        folder.push("_failed");
        PathBuf::from(folder)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;

    debug!("Wrote {}", path.display());

    Ok(())
}

impl ArtifactSink for DirectorySink {
    fn record_iteration(&mut self, record: &IterationRecord) -> anyhow::Result<()> {
        let folder = self.iteration_folder(record.iteration, record.relaxed);
        fs::create_dir_all(&folder)?;

        write_json(&folder.join("problem.json"), &record.instance)?;
        write_json(&folder.join("solution.json"), &record.solution)?;
        write_json(&folder.join("strategies.json"), &record.strategies)?;

        Ok(())
    }

    fn record_failure(&mut self, failure: &AttemptFailure) -> anyhow::Result<()> {
        let folder = self.failure_folder(failure.iteration, failure.relaxed);
        fs::create_dir_all(&folder)?;

        if let Some(instance) = &failure.instance {
            write_json(&folder.join("problem.json"), instance)?;
        }
        if let Some(solution) = &failure.solution {
            write_json(&folder.join("solution.json"), solution)?;
        }
        write_json(&folder.join("strategies.json"), &failure.strategies)?;
        write_json(&folder.join("reason.json"), &failure.reason)?;

        Ok(())
    }

    fn record_report(&mut self, report: &RefinementReport) -> anyhow::Result<()> {
        write_json(&self.root.join("report.json"), report)?;

        if let Some(best) = report.best() {
            write_json(&self.root.join("best_solution.json"), &best.solution)?;
        }

        Ok(())
    }
}
