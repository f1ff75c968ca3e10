//! Run a named heuristic against an instance.
//!
//! [`HeuristicRunner`] validates the call, hands it to the backend in a
//! single blocking call and repackages the outcome as a
//! [`HeuristicResult`]. It neither retries nor enforces the time budget;
//! both are the backend's business.

use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::backend::{BackendError, HeuristicBackend, Invocation, RunOutcome};
use crate::instance::Instance;
use crate::metrics::{MetricsReport, compute_metrics};
use crate::registry::{HeuristicCatalog, list_heuristics};

/// Errors returned by [`HeuristicRunner::run`] and the argument parsers it
/// relies on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// The heuristic name was empty or whitespace.
    #[error("heuristic name must not be empty")]
    EmptyHeuristicName,
    /// The time budget was negative, NaN or infinite.
    #[error("time budget must be a finite, non-negative number of seconds, got {seconds}")]
    InvalidTimeBudget {
        /// Rejected value.
        seconds: f64,
    },
    /// The seed was neither the `-1` default marker nor a `u32`.
    #[error("seed must be -1 or an integer in 0..={max}, got {seed}", max = u32::MAX)]
    InvalidSeed {
        /// Rejected value.
        seed: i64,
    },
    /// The backend failed; the error is passed through unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Advisory wall-clock limit for a heuristic run.
///
/// The backend checks the budget cooperatively; runs may overshoot it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeBudget(f64);

impl TimeBudget {
    /// Validate a budget expressed in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidTimeBudget`] for negative or non-finite
    /// values.
    ///
    /// # Examples
    ///
    /// ```
    /// use mqlib_core::TimeBudget;
    ///
    /// assert!(TimeBudget::from_secs(1.5).is_ok());
    /// assert!(TimeBudget::from_secs(-1.0).is_err());
    /// assert!(TimeBudget::from_secs(f64::NAN).is_err());
    /// ```
    pub fn from_secs(seconds: f64) -> Result<Self, RunError> {
        if seconds.is_finite() && seconds >= 0.0 {
            Ok(Self(seconds))
        } else {
            Err(RunError::InvalidTimeBudget { seconds })
        }
    }

    /// Budget in seconds.
    #[must_use]
    pub const fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Budget as a [`Duration`].
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs_f64(self.0)
    }
}

impl From<Duration> for TimeBudget {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs_f64())
    }
}

/// Random seed handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Seed {
    /// Let the backend pick a seed.
    #[default]
    Default,
    /// Use a fixed seed for reproducible runs.
    Fixed(u32),
}

impl Seed {
    /// Raw marker meaning "let the backend choose".
    pub const DEFAULT_MARKER: i64 = -1;

    /// Interpret a raw integer seed where `-1` means [`Seed::Default`].
    ///
    /// Fixed seeds are limited to `0..=u32::MAX`. Negative values are
    /// reserved so that no fixed seed can be confused with the default
    /// marker, and the upper bound keeps every fixed seed distinct on the
    /// wire.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidSeed`] for negative values other than `-1`
    /// and for values above `u32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mqlib_core::Seed;
    ///
    /// assert_eq!(Seed::from_raw(-1), Ok(Seed::Default));
    /// assert_eq!(Seed::from_raw(42), Ok(Seed::Fixed(42)));
    /// assert!(Seed::from_raw(-7).is_err());
    /// assert!(Seed::from_raw(i64::from(u32::MAX) + 1).is_err());
    /// ```
    pub fn from_raw(seed: i64) -> Result<Self, RunError> {
        if seed == Self::DEFAULT_MARKER {
            return Ok(Self::Default);
        }
        u32::try_from(seed)
            .map(Self::Fixed)
            .map_err(|_| RunError::InvalidSeed { seed })
    }

    /// Raw integer form, `-1` for [`Seed::Default`].
    #[must_use]
    pub fn to_raw(self) -> i64 {
        match self {
            Self::Default => Self::DEFAULT_MARKER,
            Self::Fixed(seed) => i64::from(seed),
        }
    }
}

/// Errors returned by [`HyperheuristicData::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HyperheuristicDataError {
    /// The path was relative.
    #[error("hyperheuristic data path {path} must be absolute")]
    RelativePath {
        /// Rejected path.
        path: Utf8PathBuf,
    },
}

/// Absolute path to the hyperheuristic model directory.
///
/// The directory is read by the backend and never modified here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperheuristicData(Utf8PathBuf);

impl HyperheuristicData {
    /// Accept an absolute directory path.
    ///
    /// # Errors
    ///
    /// Returns [`HyperheuristicDataError::RelativePath`] for relative paths.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self, HyperheuristicDataError> {
        let path = path.into();
        if path.is_absolute() {
            Ok(Self(path))
        } else {
            Err(HyperheuristicDataError::RelativePath { path })
        }
    }

    /// Directory path.
    #[must_use]
    pub fn as_path(&self) -> &Utf8Path {
        &self.0
    }
}

/// One strict improvement of the best objective during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    /// New best objective.
    pub objective: f64,
    /// Seconds since the run started.
    pub runtime_secs: f64,
}

/// Chronological list of improvements reported by the backend.
///
/// Objectives and runtimes are stored pairwise, so the two views returned by
/// [`objective_values`](Self::objective_values) and
/// [`runtimes`](Self::runtimes) always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "HistoryColumns", into = "HistoryColumns")
)]
pub struct ImprovementHistory(Vec<Improvement>);

impl ImprovementHistory {
    /// Pair parallel objective and runtime columns.
    ///
    /// Entries without a partner in the other column are dropped.
    #[must_use]
    pub fn from_columns(objectives: Vec<f64>, runtimes: Vec<f64>) -> Self {
        if objectives.len() != runtimes.len() {
            log::warn!(
                "solver returned {} history objectives but {} runtimes; truncating",
                objectives.len(),
                runtimes.len()
            );
        }
        Self(
            objectives
                .into_iter()
                .zip(runtimes)
                .map(|(objective, runtime_secs)| Improvement {
                    objective,
                    runtime_secs,
                })
                .collect(),
        )
    }

    /// Improvements in order.
    #[must_use]
    pub fn improvements(&self) -> &[Improvement] {
        &self.0
    }

    /// Objective values in order.
    pub fn objective_values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.0.iter().map(|step| step.objective)
    }

    /// Elapsed seconds in order.
    pub fn runtimes(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.0.iter().map(|step| step.runtime_secs)
    }

    /// Most recent improvement.
    #[must_use]
    pub fn last(&self) -> Option<&Improvement> {
        self.0.last()
    }

    /// Number of improvements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no improvement was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct HistoryColumns {
    bestsolhistory_objvals: Vec<f64>,
    bestsolhistory_runtimes: Vec<f64>,
}

#[cfg(feature = "serde")]
impl From<HistoryColumns> for ImprovementHistory {
    fn from(columns: HistoryColumns) -> Self {
        Self::from_columns(columns.bestsolhistory_objvals, columns.bestsolhistory_runtimes)
    }
}

#[cfg(feature = "serde")]
impl From<ImprovementHistory> for HistoryColumns {
    fn from(history: ImprovementHistory) -> Self {
        Self {
            bestsolhistory_objvals: history.objective_values().collect(),
            bestsolhistory_runtimes: history.runtimes().collect(),
        }
    }
}

/// Outcome of one heuristic run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicResult {
    /// Heuristic that actually ran.
    pub heuristic: String,
    /// Heuristic the caller asked for.
    pub requested: String,
    /// Instance the run used.
    pub instance: Arc<Instance>,
    /// Best objective found.
    #[cfg_attr(feature = "serde", serde(rename = "objval"))]
    pub objective: f64,
    /// Best solution found, one entry per variable.
    pub solution: Vec<i32>,
    /// Improvements found during the run.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub history: ImprovementHistory,
}

impl HeuristicResult {
    /// Whether the backend ran a different heuristic than requested, as a
    /// hyperheuristic does when it dispatches to a concrete algorithm.
    #[must_use]
    pub fn was_dispatched(&self) -> bool {
        self.heuristic != self.requested
    }
}

/// Executes heuristics through a [`HeuristicBackend`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mqlib_core::test_support::ScriptedBackend;
/// use mqlib_core::{HeuristicRunner, HyperheuristicData, Instance, ProblemFamily, Seed, TimeBudget};
///
/// let backend = ScriptedBackend::default().with_run("BURER2002", 4.0, vec![1, -1, 1, -1]);
/// let data = HyperheuristicData::new("/opt/mqlib/hhdata")?;
/// let runner = HeuristicRunner::new(backend, data);
/// let instance = Arc::new(Instance::from_file(ProblemFamily::MaxCut, "cycle.rf"));
/// let result = runner.run("BURER2002", &instance, TimeBudget::from_secs(1.0)?, Seed::Fixed(42))?;
/// assert_eq!(result.objective, 4.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicRunner<B> {
    backend: B,
    hyperheuristic_data: HyperheuristicData,
}

impl<B: HeuristicBackend> HeuristicRunner<B> {
    /// Create a runner bound to `backend`.
    pub const fn new(backend: B, hyperheuristic_data: HyperheuristicData) -> Self {
        Self {
            backend,
            hyperheuristic_data,
        }
    }

    /// Backend used for every call.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Hyperheuristic model directory passed to every run.
    pub const fn hyperheuristic_data(&self) -> &HyperheuristicData {
        &self.hyperheuristic_data
    }

    /// Run `heuristic` on `instance`, blocking until the backend returns.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::EmptyHeuristicName`] before contacting the
    /// backend, and [`RunError::Backend`] for any backend failure.
    pub fn run(
        &self,
        heuristic: &str,
        instance: &Arc<Instance>,
        time_budget: TimeBudget,
        seed: Seed,
    ) -> Result<HeuristicResult, RunError> {
        if heuristic.trim().is_empty() {
            return Err(RunError::EmptyHeuristicName);
        }
        log::debug!(
            "running {heuristic} on {} instance for {:.3}s (seed {})",
            instance.family(),
            time_budget.as_secs_f64(),
            seed.to_raw()
        );
        let invocation = Invocation {
            heuristic,
            instance,
            time_budget,
            seed,
            hyperheuristic_data: self.hyperheuristic_data.as_path(),
        };
        let outcome = self.backend.run_heuristic(&invocation)?;
        Ok(package(heuristic, instance, outcome))
    }

    /// Compute metrics for `instance` with the runner's backend.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`BackendError`] unchanged.
    pub fn metrics(&self, instance: &Instance) -> Result<MetricsReport, BackendError> {
        compute_metrics(&self.backend, instance)
    }

    /// List the backend's heuristics.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`BackendError`] unchanged.
    pub fn heuristics(&self) -> Result<HeuristicCatalog, BackendError> {
        list_heuristics(&self.backend)
    }
}

fn package(requested: &str, instance: &Arc<Instance>, outcome: RunOutcome) -> HeuristicResult {
    if outcome.heuristic != requested {
        log::debug!("{requested} dispatched to {}", outcome.heuristic);
    }
    HeuristicResult {
        heuristic: outcome.heuristic,
        requested: requested.to_owned(),
        instance: Arc::clone(instance),
        objective: outcome.objective,
        solution: outcome.solution,
        history: ImprovementHistory::from_columns(
            outcome.history_objectives,
            outcome.history_runtimes,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProblemFamily;
    use crate::backend::BackendErrorKind;
    use crate::test_support::ScriptedBackend;
    use rstest::{fixture, rstest};

    #[fixture]
    fn instance() -> Arc<Instance> {
        Arc::new(Instance::from_file(ProblemFamily::MaxCut, "g.rf"))
    }

    #[fixture]
    fn data() -> HyperheuristicData {
        HyperheuristicData::new("/srv/hhdata").expect("absolute path")
    }

    fn budget() -> TimeBudget {
        TimeBudget::from_secs(1.0).expect("valid budget")
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn empty_names_never_reach_the_backend(
        #[case] name: &str,
        instance: Arc<Instance>,
        data: HyperheuristicData,
    ) {
        let runner = HeuristicRunner::new(ScriptedBackend::default(), data);
        let err = runner
            .run(name, &instance, budget(), Seed::Default)
            .expect_err("empty name");
        assert_eq!(err, RunError::EmptyHeuristicName);
        assert_eq!(runner.backend().run_count(), 0);
    }

    #[rstest]
    fn forwards_arguments_to_the_backend(instance: Arc<Instance>, data: HyperheuristicData) {
        let backend = ScriptedBackend::default().with_run("BURER2002", 3.0, vec![1, -1]);
        let runner = HeuristicRunner::new(backend, data);
        runner
            .run("BURER2002", &instance, budget(), Seed::Fixed(42))
            .expect("run succeeds");
        let call = runner.backend().last_call().expect("call recorded");
        assert_eq!(call.heuristic, "BURER2002");
        assert_eq!(call.seed, Seed::Fixed(42));
        assert_eq!(call.time_budget, budget());
        assert_eq!(call.hyperheuristic_data, Utf8PathBuf::from("/srv/hhdata"));
    }

    #[rstest]
    fn repackages_the_backend_outcome(instance: Arc<Instance>, data: HyperheuristicData) {
        let backend = ScriptedBackend::default().with_outcome(RunOutcome {
            heuristic: "BURER2002".into(),
            objective: 5.0,
            solution: vec![1, -1, 1],
            history_objectives: vec![2.0, 4.0, 5.0],
            history_runtimes: vec![0.01, 0.02, 0.05],
        });
        let runner = HeuristicRunner::new(backend, data);
        let result = runner
            .run("HH", &instance, budget(), Seed::Default)
            .expect("run succeeds");
        assert_eq!(result.heuristic, "BURER2002");
        assert_eq!(result.requested, "HH");
        assert!(result.was_dispatched());
        assert!(Arc::ptr_eq(&result.instance, &instance));
        assert_eq!(result.solution, vec![1, -1, 1]);
        assert_eq!(
            result.history.objective_values().collect::<Vec<_>>(),
            vec![2.0, 4.0, 5.0]
        );
        assert_eq!(result.history.runtimes().len(), 3);
    }

    #[rstest]
    fn mismatched_history_is_truncated() {
        let history = ImprovementHistory::from_columns(vec![1.0, 2.0, 3.0], vec![0.1]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.runtimes().len(), history.objective_values().len());
    }

    #[rstest]
    fn backend_failures_pass_through(instance: Arc<Instance>, data: HyperheuristicData) {
        let failure = BackendError::new(BackendErrorKind::UnknownHeuristic, "FOO is not a heuristic");
        let runner =
            HeuristicRunner::new(ScriptedBackend::default().failing_with(failure.clone()), data);
        let err = runner
            .run("FOO", &instance, budget(), Seed::Default)
            .expect_err("backend failure");
        assert_eq!(err, RunError::Backend(failure));
    }

    #[rstest]
    #[case(-1, Seed::Default)]
    #[case(0, Seed::Fixed(0))]
    #[case(144, Seed::Fixed(144))]
    #[case(4_294_967_295, Seed::Fixed(u32::MAX))]
    fn seeds_round_trip_through_raw_form(#[case] raw: i64, #[case] seed: Seed) {
        assert_eq!(Seed::from_raw(raw), Ok(seed));
        assert_eq!(seed.to_raw(), raw);
    }

    #[rstest]
    #[case(-2)]
    #[case(i64::MIN)]
    #[case(4_294_967_296)]
    #[case(i64::MAX)]
    fn rejects_seeds_outside_the_wire_range(#[case] raw: i64) {
        assert_eq!(Seed::from_raw(raw), Err(RunError::InvalidSeed { seed: raw }));
    }

    #[rstest]
    fn distinct_fixed_seeds_stay_distinct_on_the_wire() {
        let top = Seed::Fixed(u32::MAX);
        let below = Seed::Fixed(u32::MAX - 1);
        assert_ne!(top.to_raw(), below.to_raw());
        assert_ne!(top.to_raw(), Seed::Default.to_raw());
        assert_eq!(Seed::from_raw(top.to_raw()), Ok(top));
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_budgets(#[case] seconds: f64) {
        assert!(matches!(
            TimeBudget::from_secs(seconds),
            Err(RunError::InvalidTimeBudget { .. })
        ));
    }

    #[rstest]
    fn zero_budget_is_accepted() {
        let budget = TimeBudget::from_secs(0.0).expect("zero budget");
        assert_eq!(budget.as_duration(), Duration::ZERO);
    }

    #[rstest]
    fn relative_hyperheuristic_paths_are_rejected() {
        let err = HyperheuristicData::new("hhdata").expect_err("relative path");
        assert_eq!(
            err,
            HyperheuristicDataError::RelativePath {
                path: Utf8PathBuf::from("hhdata")
            }
        );
    }
}
