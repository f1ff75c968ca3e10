//! Instance sources named on the command line.
//!
//! `--instance` forwards a solver-readable file untouched. `--graph` reads a
//! JSON document of the form
//! `{"directed": false, "nodes": 4, "edges": [[0, 1, 1.0], ...]}` with
//! 0-based node indices and converts it through [`WeightedGraph`].

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use mqlib_core::{Instance, InstanceBuilder, Orientation, ProblemFamily, WeightedGraph};
use serde::Deserialize;

use crate::paths::require_file;
use crate::{ARG_GRAPH, ARG_INSTANCE, ARG_PROBLEM, CliError};

/// On-disk graph document accepted by `--graph`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GraphDocument {
    #[serde(default)]
    pub(crate) directed: bool,
    pub(crate) nodes: usize,
    #[serde(default)]
    pub(crate) edges: Vec<(usize, usize, f64)>,
}

impl GraphDocument {
    fn orientation(&self) -> Orientation {
        if self.directed {
            Orientation::Directed
        } else {
            Orientation::Undirected
        }
    }
}

/// Resolved problem family and source paths for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InstanceSpec {
    pub(crate) family: ProblemFamily,
    pub(crate) file: Option<Utf8PathBuf>,
    pub(crate) graph: Option<Utf8PathBuf>,
}

impl InstanceSpec {
    /// Combine the merged `--problem`, `--instance` and `--graph` settings.
    pub(crate) fn from_settings(
        problem: Option<&str>,
        problem_env: &'static str,
        file: Option<Utf8PathBuf>,
        graph: Option<Utf8PathBuf>,
    ) -> Result<Self, CliError> {
        let code = problem.ok_or(CliError::MissingArgument {
            field: ARG_PROBLEM,
            env: problem_env,
        })?;
        Ok(Self {
            family: code.parse()?,
            file,
            graph,
        })
    }

    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if let Some(file) = &self.file {
            require_file(file, ARG_INSTANCE)?;
        }
        if let Some(graph) = &self.graph {
            require_file(graph, ARG_GRAPH)?;
        }
        Ok(())
    }

    /// Build the instance, reading the graph document when one was named.
    ///
    /// Supplying neither or both sources is left to [`InstanceBuilder`] to
    /// reject.
    pub(crate) fn load(&self) -> Result<Instance, CliError> {
        let graph = self.graph.as_deref().map(load_graph).transpose()?;
        let mut builder = InstanceBuilder::new(self.family);
        if let Some(file) = &self.file {
            builder = builder.file(file.clone());
        }
        if let Some(graph) = &graph {
            builder = builder.graph(graph);
        }
        Ok(builder.build()?)
    }
}

/// Load and validate a JSON graph document.
pub(crate) fn load_graph(path: &Utf8Path) -> Result<WeightedGraph, CliError> {
    let file = mqlib_fs::open_utf8_file(path).map_err(|source| CliError::OpenGraph {
        path: path.to_path_buf(),
        source,
    })?;
    let document: GraphDocument =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseGraph {
            path: path.to_path_buf(),
            source,
        })?;
    WeightedGraph::from_edges(document.orientation(), document.nodes, document.edges).map_err(
        |source| CliError::InvalidGraph {
            path: path.to_path_buf(),
            source,
        },
    )
}
