//! Instance metrics reported by the solver.

use std::collections::BTreeMap;

use crate::backend::{BackendError, HeuristicBackend};
use crate::instance::Instance;

/// Descriptive statistics for an instance and the time spent computing them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsReport {
    /// Metric values keyed by metric name.
    pub metrics: BTreeMap<String, f64>,
    /// Seconds spent keyed by computation name.
    pub runtimes: BTreeMap<String, f64>,
}

/// Ask `backend` for the metrics of `instance`.
///
/// Names are paired with values by position. A name repeated within a column
/// keeps its last value.
///
/// # Errors
///
/// Returns the backend's [`BackendError`] unchanged.
///
/// # Examples
///
/// ```
/// use mqlib_core::test_support::ScriptedBackend;
/// use mqlib_core::{compute_metrics, Instance, ProblemFamily};
///
/// let backend = ScriptedBackend::default().with_metric("log_n", 3.2, 0.001);
/// let instance = Instance::from_file(ProblemFamily::MaxCut, "g.rf");
/// let report = compute_metrics(&backend, &instance)?;
/// assert_eq!(report.metrics.get("log_n"), Some(&3.2));
/// # Ok::<(), mqlib_core::BackendError>(())
/// ```
pub fn compute_metrics<B>(backend: &B, instance: &Instance) -> Result<MetricsReport, BackendError>
where
    B: HeuristicBackend + ?Sized,
{
    log::debug!("computing metrics for {} instance", instance.family());
    let columns = backend.instance_metrics(instance)?;
    Ok(MetricsReport {
        metrics: pair_columns("metric", columns.metric_names, columns.metric_values),
        runtimes: pair_columns("runtime", columns.runtime_names, columns.runtime_values),
    })
}

fn pair_columns(label: &str, names: Vec<String>, values: Vec<f64>) -> BTreeMap<String, f64> {
    if names.len() != values.len() {
        log::warn!(
            "solver returned {} {label} names but {} values; ignoring unpaired entries",
            names.len(),
            values.len()
        );
    }
    names.into_iter().zip(values).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProblemFamily;
    use crate::backend::{BackendErrorKind, MetricColumns};
    use crate::test_support::ScriptedBackend;
    use rstest::rstest;

    fn instance() -> Instance {
        Instance::from_file(ProblemFamily::MaxCut, "g.rf")
    }

    #[rstest]
    fn pairs_names_with_values_by_position() {
        let backend = ScriptedBackend::default().with_metric_columns(MetricColumns {
            metric_names: vec!["log_n".into(), "log_m".into()],
            metric_values: vec![2.0, 3.0],
            runtime_names: vec!["spectral".into()],
            runtime_values: vec![0.5],
        });
        let report = compute_metrics(&backend, &instance()).expect("metrics");
        assert_eq!(report.metrics.get("log_n"), Some(&2.0));
        assert_eq!(report.metrics.get("log_m"), Some(&3.0));
        assert_eq!(report.runtimes.get("spectral"), Some(&0.5));
        assert_eq!(report.runtimes.len(), 1);
    }

    #[rstest]
    fn unpaired_entries_are_dropped() {
        let backend = ScriptedBackend::default().with_metric_columns(MetricColumns {
            metric_names: vec!["a".into(), "b".into(), "c".into()],
            metric_values: vec![1.0],
            runtime_names: Vec::new(),
            runtime_values: vec![9.0],
        });
        let report = compute_metrics(&backend, &instance()).expect("metrics");
        assert_eq!(report.metrics.len(), 1);
        assert!(report.runtimes.is_empty());
    }

    #[rstest]
    fn repeated_names_keep_last_value() {
        let backend = ScriptedBackend::default().with_metric_columns(MetricColumns {
            metric_names: vec!["a".into(), "a".into()],
            metric_values: vec![1.0, 2.0],
            ..MetricColumns::default()
        });
        let report = compute_metrics(&backend, &instance()).expect("metrics");
        assert_eq!(report.metrics.get("a"), Some(&2.0));
    }

    #[rstest]
    fn backend_errors_propagate_unchanged() {
        let failure = BackendError::new(BackendErrorKind::MalformedInstance, "cannot read g.rf");
        let backend = ScriptedBackend::default().failing_with(failure.clone());
        let err = compute_metrics(&backend, &instance()).expect_err("backend failure");
        assert_eq!(err, failure);
    }
}
