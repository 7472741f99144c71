//! Unit tests for the JSON-lines serve loop.

use std::io::Cursor;
use std::time::Instant;

use rstest::rstest;
use serde_json::json;
use stopover_core::{RouteRequest, SolveError, SolveOutcome, Solver};

use super::helpers::{TRIANGLE_CATALOG, reply_lines, workspace, write_file};
use super::*;
use crate::engine::{DefaultSolverBuilder, EngineConfig, SolverBuilder};
use crate::serve::run_serve_with;

fn args_for(catalog: &camino::Utf8Path) -> ServeArgs {
    ServeArgs {
        catalog: Some(catalog.to_path_buf()),
        ..ServeArgs::default()
    }
}

struct PanicSolver;

impl Solver for PanicSolver {
    fn solve_until(
        &self,
        _request: &RouteRequest,
        _deadline: Option<Instant>,
    ) -> Result<SolveOutcome, SolveError> {
        panic!("stub solver always panics");
    }
}

struct PanicSolverBuilder;

impl SolverBuilder for PanicSolverBuilder {
    fn build(&self, _config: &EngineConfig) -> Result<Box<dyn Solver>, CliError> {
        Ok(Box::new(PanicSolver))
    }
}

#[rstest]
fn serve_answers_each_request_line_in_order() {
    let (_tmp, root) = workspace();
    let catalog = write_file(&root, "catalog.json", TRIANGLE_CATALOG);
    let input = concat!(
        r#"{"start":"A","candidates":["B","C"],"budget":3.0}"#,
        "\n",
        "\n",
        "{\n",
        r#"{"start":"A","candidates":["ZZZ"],"budget":3.0}"#,
        "\n",
    );

    let mut reader = Cursor::new(input.as_bytes());
    let mut stdout = Vec::new();
    let answered = run_serve_with(
        args_for(&catalog),
        &DefaultSolverBuilder,
        &mut reader,
        &mut stdout,
    )
    .expect("serve loop should finish");

    assert_eq!(answered, 3);
    let replies = reply_lines(&stdout);
    assert_eq!(replies.len(), 3);
    assert_eq!(
        replies[0],
        json!({ "route": ["A", "B", "C"], "total_value": 2.0, "total_duration": 3.0 })
    );
    let malformed = replies[1]
        .get("error")
        .and_then(serde_json::Value::as_str)
        .expect("error reply");
    assert!(malformed.starts_with("invalid input:"), "{malformed}");
    assert_eq!(replies[2], json!({ "error": "unknown node: ZZZ" }));
}

#[rstest]
fn serve_on_empty_input_answers_nothing() {
    let (_tmp, root) = workspace();
    let catalog = write_file(&root, "catalog.json", TRIANGLE_CATALOG);

    let mut reader = Cursor::new(&b""[..]);
    let mut stdout = Vec::new();
    let answered = run_serve_with(
        args_for(&catalog),
        &DefaultSolverBuilder,
        &mut reader,
        &mut stdout,
    )
    .expect("serve loop should finish");

    assert_eq!(answered, 0);
    assert!(stdout.is_empty());
}

#[rstest]
fn serve_turns_solver_panics_into_error_replies() {
    let (_tmp, root) = workspace();
    let catalog = write_file(&root, "catalog.json", TRIANGLE_CATALOG);
    let request = r#"{"start":"A","candidates":["B"],"budget":3.0}"#;
    let input = format!("{request}\n{request}\n");

    let mut reader = Cursor::new(input.as_bytes());
    let mut stdout = Vec::new();
    let answered = run_serve_with(
        args_for(&catalog),
        &PanicSolverBuilder,
        &mut reader,
        &mut stdout,
    )
    .expect("serve loop survives panics");

    assert_eq!(answered, 2);
    let expected = json!({ "error": "computation failed: the solver panicked" });
    assert_eq!(reply_lines(&stdout), [expected.clone(), expected]);
}

#[rstest]
fn serve_without_catalog_errors() {
    let mut reader = Cursor::new(&b""[..]);
    let mut stdout = Vec::new();
    let err = run_serve_with(
        ServeArgs::default(),
        &DefaultSolverBuilder,
        &mut reader,
        &mut stdout,
    )
    .expect_err("missing catalog");

    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_CATALOG);
            assert_eq!(env, ENV_SERVE_CATALOG);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn serve_rejects_a_missing_catalog_file() {
    let (_tmp, root) = workspace();
    let catalog = root.join("absent.json");

    let mut reader = Cursor::new(&b""[..]);
    let mut stdout = Vec::new();
    let err = run_serve_with(
        args_for(&catalog),
        &DefaultSolverBuilder,
        &mut reader,
        &mut stdout,
    )
    .expect_err("absent catalog");

    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_CATALOG);
            assert_eq!(path, catalog);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}
