//! Dependency-ordered step runner.
//!
//! A run walks its plan front to back. A failing step is recorded and the
//! run moves on; nothing is retried or resumed at this level.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::StepError;
use crate::ValidationError;

/// Registered extraction steps, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepName {
    Teams,
    Players,
    Schedule,
    Games,
    BattingStats,
    PitchingStats,
    Statcast,
}

impl StepName {
    pub const ALL: [Self; 7] = [
        Self::Teams,
        Self::Players,
        Self::Schedule,
        Self::Games,
        Self::BattingStats,
        Self::PitchingStats,
        Self::Statcast,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teams => "teams",
            Self::Players => "players",
            Self::Schedule => "schedule",
            Self::Games => "games",
            Self::BattingStats => "batting_stats",
            Self::PitchingStats => "pitching_stats",
            Self::Statcast => "statcast",
        }
    }
}

impl Display for StepName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepName {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == normalized)
            .ok_or(ValidationError::UnknownStep {
                value: value.to_owned(),
            })
    }
}

type StepAction<C> = Box<dyn Fn(&C) -> Result<usize, StepError>>;

/// A named unit of extraction work producing a row count.
pub struct ExtractionStep<C> {
    name: StepName,
    action: StepAction<C>,
}

impl<C> ExtractionStep<C> {
    pub fn new<F>(name: StepName, action: F) -> Self
    where
        F: Fn(&C) -> Result<usize, StepError> + 'static,
    {
        Self {
            name,
            action: Box::new(action),
        }
    }

    pub fn name(&self) -> StepName {
        self.name
    }

    pub fn run(&self, context: &C) -> Result<usize, StepError> {
        (self.action)(context)
    }
}

/// Steps selected for one invocation, in registry order.
pub struct RunPlan<C> {
    steps: Vec<ExtractionStep<C>>,
}

impl<C> RunPlan<C> {
    /// An empty `only` selects every step; `skip` is applied afterwards.
    pub fn build(registry: Vec<ExtractionStep<C>>, only: &[StepName], skip: &[StepName]) -> Self {
        let steps = registry
            .into_iter()
            .filter(|step| only.is_empty() || only.contains(&step.name))
            .filter(|step| !skip.contains(&step.name))
            .collect();
        Self { steps }
    }

    pub fn names(&self) -> Vec<StepName> {
        self.steps.iter().map(ExtractionStep::name).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Success { rows: usize },
    Failed { error: String },
}

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub name: StepName,
    pub status: StepStatus,
    pub elapsed: Duration,
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, StepStatus::Success { .. })
    }
}

impl Display for StepResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let seconds = self.elapsed.as_secs_f64();
        match &self.status {
            StepStatus::Success { rows } => {
                write!(f, "{}: SUCCESS ({rows} rows, {seconds:.1}s)", self.name)
            }
            StepStatus::Failed { error } => {
                write!(f, "{}: FAILED ({error}, {seconds:.1}s)", self.name)
            }
        }
    }
}

/// Ordered results of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    results: Vec<StepResult>,
}

impl RunSummary {
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn failed_steps(&self) -> Vec<StepName> {
        self.results
            .iter()
            .filter(|result| !result.is_success())
            .map(|result| result.name)
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        self.results
            .iter()
            .map(|result| match result.status {
                StepStatus::Success { rows } => rows,
                StepStatus::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(StepResult::is_success)
    }

    /// 0 when every step succeeded, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    fn log(&self) {
        tracing::info!("extraction summary");
        for result in &self.results {
            if result.is_success() {
                tracing::info!("  {result}");
            } else {
                tracing::error!("  {result}");
            }
        }

        let failed = self.failed_steps();
        if failed.is_empty() {
            tracing::info!(total_rows = self.total_rows(), "all steps succeeded");
        } else {
            let names = failed
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::error!(failed = names.as_str(), "steps failed");
        }
    }
}

/// Executes a plan exactly once.
pub struct Orchestrator<C> {
    plan: RunPlan<C>,
}

impl<C> Orchestrator<C> {
    pub fn new(plan: RunPlan<C>) -> Self {
        Self { plan }
    }

    pub fn run(self, context: &C) -> RunSummary {
        if self.plan.is_empty() {
            tracing::warn!("no steps selected");
        }

        let mut summary = RunSummary::default();
        for step in &self.plan.steps {
            let span = tracing::info_span!("step", step = step.name.as_str());
            let _entered = span.enter();

            tracing::info!("step started");
            let started = Instant::now();
            let status = match step.run(context) {
                Ok(rows) => {
                    tracing::info!(rows, "step completed");
                    StepStatus::Success { rows }
                }
                Err(error) => {
                    tracing::error!(%error, "step failed");
                    StepStatus::Failed {
                        error: error.to_string(),
                    }
                }
            };
            summary.results.push(StepResult {
                name: step.name,
                status,
                elapsed: started.elapsed(),
            });
        }

        summary.log();
        summary
    }
}
