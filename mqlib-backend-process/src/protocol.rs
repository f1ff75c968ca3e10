//! JSON messages exchanged with the solver process.
//!
//! Each call writes one request document to the child's stdin and reads one
//! reply document from its stdout. Replies carrying an `error` object are
//! solver failures; anything else must match the success shape of the
//! request's operation.

use mqlib_core::{
    BackendError, BackendErrorKind, CatalogColumns, Instance, InstanceSource, Invocation,
    MetricColumns, RawCatalog, RunOutcome,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request sent to the solver, tagged by `op`.
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum Request<'a> {
    Heuristics,
    Metrics {
        instance: WireInstance<'a>,
    },
    Run {
        heuristic: &'a str,
        instance: WireInstance<'a>,
        time_limit_secs: f64,
        seed: i64,
        hyperheuristic_data: &'a str,
    },
}

impl<'a> Request<'a> {
    pub(crate) fn metrics(instance: &'a Instance) -> Self {
        Self::Metrics {
            instance: WireInstance::from(instance),
        }
    }

    pub(crate) fn run(invocation: &Invocation<'a>) -> Self {
        Self::Run {
            heuristic: invocation.heuristic,
            instance: WireInstance::from(invocation.instance),
            time_limit_secs: invocation.time_budget.as_secs_f64(),
            seed: invocation.seed.to_raw(),
            hyperheuristic_data: invocation.hyperheuristic_data.as_str(),
        }
    }
}

/// Instance payload: a file reference or parallel 1-based edge columns.
#[derive(Debug, Serialize)]
pub(crate) struct WireInstance<'a> {
    problem: &'static str,
    #[serde(flatten)]
    data: WireData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireData<'a> {
    File {
        file: &'a str,
    },
    Sparse {
        nodes: usize,
        rows: Vec<usize>,
        cols: Vec<usize>,
        weights: Vec<f64>,
    },
}

impl<'a> From<&'a Instance> for WireInstance<'a> {
    fn from(instance: &'a Instance) -> Self {
        let data = match instance.source() {
            InstanceSource::File(path) => WireData::File {
                file: path.as_str(),
            },
            InstanceSource::SparseMatrix(matrix) => {
                let (rows, cols, weights) = matrix.columns();
                WireData::Sparse {
                    nodes: matrix.node_count(),
                    rows,
                    cols,
                    weights,
                }
            }
        };
        Self {
            problem: instance.family().code(),
            data,
        }
    }
}

/// A reply is either a solver failure or the operation's payload.
#[derive(Debug)]
pub(crate) enum Reply<T> {
    Failure(WireError),
    Success(T),
}

impl<T: DeserializeOwned> Reply<T> {
    /// Split a decoded document on its `error` key.
    ///
    /// Payload decoding errors keep the field-level message from serde.
    pub(crate) fn from_value(mut document: Value) -> Result<Self, serde_json::Error> {
        let error = document
            .as_object_mut()
            .and_then(|fields| fields.remove("error"));
        match error {
            Some(failure) => serde_json::from_value(failure).map(Self::Failure),
            None => serde_json::from_value(document).map(Self::Success),
        }
    }
}

impl<T> Reply<T> {
    pub(crate) fn into_result(self) -> Result<T, BackendError> {
        match self {
            Self::Failure(error) => Err(error.into()),
            Self::Success(payload) => Ok(payload),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    kind: String,
    message: String,
}

impl From<WireError> for BackendError {
    fn from(error: WireError) -> Self {
        let kind = match error.kind.as_str() {
            "unknown_heuristic" => BackendErrorKind::UnknownHeuristic,
            "malformed_instance" => BackendErrorKind::MalformedInstance,
            "resource_exhausted" => BackendErrorKind::ResourceExhausted,
            _ => BackendErrorKind::Internal,
        };
        Self::new(kind, error.message)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireCatalogColumns {
    names: Vec<String>,
    descriptions: Vec<String>,
}

impl From<WireCatalogColumns> for CatalogColumns {
    fn from(columns: WireCatalogColumns) -> Self {
        Self {
            names: columns.names,
            descriptions: columns.descriptions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogReply {
    max_cut: WireCatalogColumns,
    qubo: WireCatalogColumns,
}

impl From<CatalogReply> for RawCatalog {
    fn from(reply: CatalogReply) -> Self {
        Self {
            max_cut: reply.max_cut.into(),
            qubo: reply.qubo.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricsReply {
    metric_names: Vec<String>,
    metric_values: Vec<f64>,
    runtime_names: Vec<String>,
    runtime_values: Vec<f64>,
}

impl From<MetricsReply> for MetricColumns {
    fn from(reply: MetricsReply) -> Self {
        Self {
            metric_names: reply.metric_names,
            metric_values: reply.metric_values,
            runtime_names: reply.runtime_names,
            runtime_values: reply.runtime_values,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunReply {
    heuristic: String,
    objective: f64,
    solution: Vec<i32>,
    history_objectives: Vec<f64>,
    history_runtimes: Vec<f64>,
}

impl From<RunReply> for RunOutcome {
    fn from(reply: RunReply) -> Self {
        Self {
            heuristic: reply.heuristic,
            objective: reply.objective,
            solution: reply.solution,
            history_objectives: reply.history_objectives,
            history_runtimes: reply.history_runtimes,
        }
    }
}
