//! Scenario runner and session-scoped saved scenarios
//!
//! Holds one engine, runs projections on demand and keeps an append-only list
//! of the input/result pairs the caller chose to save.

pub mod loader;

pub use loader::{load_scenarios, load_scenarios_from_reader, NamedInput};

use crate::error::EngineResult;
use crate::projection::{ProjectionEngine, ProjectionInput, ProjectionResult};
use crate::regions::RegionRegistry;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

/// Immutable snapshot of one calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedScenario {
    pub label: String,
    pub saved_at: DateTime<Utc>,
    pub input: ProjectionInput,
    pub result: ProjectionResult,
}

/// Runs projections and keeps the scenarios saved during a session
///
/// # Example
/// ```ignore
/// let mut runner = ScenarioRunner::new();
///
/// for fee in [0.2, 0.8, 1.5] {
///     let input = ProjectionInput::new("uk", "ISA").with_fee("Expense ratio", fee);
///     runner.run_and_save(&format!("{fee}% fund"), input)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner<'r> {
    engine: ProjectionEngine<'r>,
    saved: Vec<SavedScenario>,
}

impl ScenarioRunner<'static> {
    /// Runner over the built-in regions
    pub fn new() -> Self {
        Self::with_engine(ProjectionEngine::builtin())
    }
}

impl<'r> ScenarioRunner<'r> {
    /// Runner over a specific registry
    pub fn with_registry(registry: &'r RegionRegistry) -> Self {
        Self::with_engine(ProjectionEngine::new(registry))
    }

    pub fn with_engine(engine: ProjectionEngine<'r>) -> Self {
        Self {
            engine,
            saved: Vec::new(),
        }
    }

    /// Run a single projection without saving it
    pub fn run(&self, input: &ProjectionInput) -> EngineResult<ProjectionResult> {
        self.engine.project(input)
    }

    /// Run a projection and append it to the saved list
    ///
    /// Failed projections are not saved.
    pub fn run_and_save(&mut self, label: &str, input: ProjectionInput) -> EngineResult<&SavedScenario> {
        let result = self.engine.project(&input)?;
        log::debug!("saving scenario '{}' ({} saved so far)", label, self.saved.len());
        let index = self.saved.len();
        self.saved.push(SavedScenario {
            label: label.to_string(),
            saved_at: Utc::now(),
            input,
            result,
        });
        Ok(&self.saved[index])
    }

    /// Run independent inputs in parallel, preserving input order
    pub fn run_batch(&self, inputs: &[ProjectionInput]) -> Vec<EngineResult<ProjectionResult>> {
        let engine = self.engine;
        inputs.par_iter().map(|input| engine.project(input)).collect()
    }

    /// Saved scenarios in the order they were saved
    pub fn saved(&self) -> &[SavedScenario] {
        &self.saved
    }

    /// Saved scenario with the highest retention score
    pub fn best_retention(&self) -> Option<&SavedScenario> {
        self.saved
            .iter()
            .filter_map(|s| s.result.retention_score().ok().map(|score| (s, score)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(s, _)| s)
    }

    pub fn engine(&self) -> ProjectionEngine<'r> {
        self.engine
    }
}

impl Default for ScenarioRunner<'static> {
    fn default() -> Self {
        Self::new()
    }
}
