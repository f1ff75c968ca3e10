//! Process-backed [`HeuristicBackend`](mqlib_core::HeuristicBackend).
//!
//! [`ProcessBackend`] spawns a solver executable once per call and speaks a
//! small JSON protocol over its standard streams. Requests are tagged by
//! `op` (`heuristics`, `metrics` or `run`); graph-backed instances travel as
//! parallel 1-based `rows`/`cols`/`weights` columns and file-backed ones as
//! a `file` path the solver reads itself. A reply holding an `error` object
//! maps onto [`BackendError`](mqlib_core::BackendError) with the reported
//! kind and message.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod process;
mod protocol;

pub use process::ProcessBackend;
