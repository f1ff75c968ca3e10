//! Behaviour-driven step definitions driving the CLI scenarios.

use super::helpers::{SingleFlipBuilder, Workspace};
use super::*;
use mqlib_core::InstanceError;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

#[derive(Debug)]
struct CliWorld {
    workspace: RefCell<Workspace>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            workspace: RefCell::new(Workspace::with_solver()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn invoke(&self, tail: &[&str]) {
        let workspace = self.workspace.borrow();
        let mut argv: Vec<String> = vec!["mqlib".to_owned()];
        argv.extend(tail.iter().map(|arg| (*arg).to_owned()));
        argv.extend([format!("--{ARG_BACKEND}"), workspace.solver().into_string()]);
        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let mut buffer = self.stdout.borrow_mut();
        let outcome =
            parsed.and_then(|cli| dispatch(cli.command, &SingleFlipBuilder, &mut *buffer));
        self.result.replace(Some(outcome));
    }

    fn graph_arg(&self) -> String {
        self.workspace.borrow().graph().into_string()
    }

    fn expect_json(&self) -> Value {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        assert!(stdout.ends_with('\n'));
        serde_json::from_str(&stdout).expect("output should be JSON")
    }

    fn with_error(&self, check: impl FnOnce(&CliError)) {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error);
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::new()
}

#[given("a solver program and a four-node cycle graph exist on disk")]
fn solver_and_graph_exist(#[from(world)] world: &CliWorld) {
    let workspace = world.workspace.borrow();
    assert!(workspace.solver().is_file());
    assert!(workspace.graph().is_file());
}

#[given("a four-node cycle graph exists but the solver program does not")]
fn solver_missing(#[from(world)] world: &CliWorld) {
    world.workspace.replace(Workspace::new());
}

#[when("I run SINGLE_FLIP on the cycle graph as a Max-Cut instance")]
fn run_max_cut(#[from(world)] world: &CliWorld) {
    let graph = world.graph_arg();
    world.invoke(&[
        "run",
        "SINGLE_FLIP",
        "--time-limit",
        "1",
        "--seed",
        "-1",
        "--problem",
        "M",
        "--graph",
        &graph,
    ]);
}

#[when("I run SINGLE_FLIP on the cycle graph as a QUBO instance")]
fn run_qubo(#[from(world)] world: &CliWorld) {
    let graph = world.graph_arg();
    world.invoke(&[
        "run",
        "SINGLE_FLIP",
        "--time-limit",
        "1",
        "--problem",
        "Q",
        "--graph",
        &graph,
    ]);
}

#[when("I run SINGLE_FLIP on the cycle graph without a time limit")]
fn run_without_limit(#[from(world)] world: &CliWorld) {
    let graph = world.graph_arg();
    world.invoke(&["run", "SINGLE_FLIP", "--problem", "M", "--graph", &graph]);
}

#[when("I list the heuristics")]
fn list_heuristics(#[from(world)] world: &CliWorld) {
    world.invoke(&["heuristics"]);
}

#[when("I compute metrics for the cycle graph")]
fn compute_metrics(#[from(world)] world: &CliWorld) {
    let graph = world.graph_arg();
    world.invoke(&["metrics", "--problem", "M", "--graph", &graph]);
}

#[then("the command succeeds and prints a result with objective 4")]
fn prints_result(#[from(world)] world: &CliWorld) {
    let output = world.expect_json();
    assert_eq!(output["heuristic"], "SINGLE_FLIP");
    assert_eq!(output["objval"], 4.0);
    assert_eq!(output["solution"].as_array().map(Vec::len), Some(4));
    let history = output["bestsolhistory_objvals"]
        .as_array()
        .expect("history objectives");
    assert_eq!(history.last(), Some(&Value::from(4.0)));
    assert_eq!(
        output["bestsolhistory_runtimes"].as_array().map(Vec::len),
        Some(history.len())
    );
}

#[then("the command fails because QUBO instances cannot come from graphs")]
fn fails_for_qubo(#[from(world)] world: &CliWorld) {
    world.with_error(|error| match error {
        CliError::Instance(InstanceError::GraphInputForQubo) => {}
        other => panic!("expected GraphInputForQubo, found {other:?}"),
    });
}

#[then("the command fails because the time limit is missing")]
fn fails_without_limit(#[from(world)] world: &CliWorld) {
    world.with_error(|error| match error {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_TIME_LIMIT);
            assert_eq!(*env, ENV_RUN_TIME_LIMIT);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    });
}

#[then("the command succeeds and prints a catalogue listing SINGLE_FLIP")]
fn prints_catalogue(#[from(world)] world: &CliWorld) {
    let output = world.expect_json();
    assert!(output["MaxCut"]["SINGLE_FLIP"].is_string());
    assert_eq!(output["QUBO"], serde_json::json!({}));
}

#[then("the command succeeds and prints the node and edge counts")]
fn prints_metrics(#[from(world)] world: &CliWorld) {
    let output = world.expect_json();
    assert_eq!(output["metrics"]["n"], 4.0);
    assert_eq!(output["metrics"]["m"], 4.0);
    assert!(output["runtimes"]["summary"].is_number());
}

#[then("the command fails because the backend path does not exist")]
fn fails_without_backend(#[from(world)] world: &CliWorld) {
    world.with_error(|error| match error {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_BACKEND),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    });
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/cli_commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(run_graph_document, "Running a heuristic on a graph document");
register_cli_scenario!(qubo_graph_rejected, "Graph documents are rejected for QUBO");
register_cli_scenario!(time_limit_required, "The time limit is required");
register_cli_scenario!(list_catalogue, "Listing heuristics");
register_cli_scenario!(metrics_for_graph, "Computing metrics for a graph document");
register_cli_scenario!(
    missing_solver_reported,
    "Missing solver programs are reported before any call"
);
