//! Test helpers for composing CLI workspaces and stub backends.

use super::*;
use crate::backend::BackendSpec;
use camino::{Utf8Path, Utf8PathBuf};
use mqlib_core::HeuristicBackend;
use mqlib_core::test_support::SingleFlipBackend;
use std::fs;
use tempfile::TempDir;

pub(super) const CYCLE_GRAPH: &str = r#"{
  "directed": false,
  "nodes": 4,
  "edges": [[0, 1, 1.0], [1, 2, 1.0], [2, 3, 1.0], [3, 0, 1.0]]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write test file");
}

/// Temporary directory holding a placeholder solver and a cycle graph.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(&root.join("cycle.json"), CYCLE_GRAPH.as_bytes());
        Self { _dir: dir, root }
    }

    pub(super) fn with_solver() -> Self {
        let workspace = Self::new();
        write_utf8(&workspace.solver(), b"#!/bin/sh\n");
        workspace
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn solver(&self) -> Utf8PathBuf {
        self.root.join("mqlib-solver")
    }

    pub(super) fn graph(&self) -> Utf8PathBuf {
        self.root.join("cycle.json")
    }
}

/// Serves every command from an in-process single-flip search.
pub(super) struct SingleFlipBuilder;

impl BackendBuilder for SingleFlipBuilder {
    fn build(&self, _spec: &BackendSpec) -> Result<Box<dyn HeuristicBackend>, CliError> {
        Ok(Box::new(SingleFlipBackend::default()))
    }
}
