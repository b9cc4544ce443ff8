//! End-to-end tests: parse arguments, run the command, inspect the files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use fwf_cli::cli::{Cli, Command, TapeCommand};
use fwf_cli::commands::run;
use fwf_cli::types::{Outcome, TapeChange};
use fwf_model::{StorageType, Tape};

fn run_args(args: &[&str]) -> anyhow::Result<Outcome> {
    let mut argv = vec!["fwf"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("valid arguments");
    run(&cli.command)
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

struct Workspace {
    dir: TempDir,
    tape: PathBuf,
    source: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let tape = dir.path().join("people.json");
        let source = dir.path().join("people.txt");
        fs::write(
            &source,
            "1001ALICE       52000.5\n1002BOB         48000.0\n1003CAROL       51000.2\n",
        )
        .expect("write source");
        Self { dir, tape, source }
    }

    fn add(&self, name: &str, start: &str, end: &str) {
        let tape = path_arg(&self.tape);
        run_args(&["tape", "add", "--tape", &tape, name, start, end]).expect("add field");
    }

    fn with_people_tape(self) -> Self {
        self.add("id", "0", "4");
        self.add("name", "4", "14");
        self.add("salary", "14", "23");
        self
    }
}

#[test]
fn parses_progress_with_and_without_value() {
    let cli = Cli::try_parse_from(["fwf", "convert", "--tape", "t.json", "in.txt", "--progress"])
        .expect("parse");
    match cli.command {
        Command::Convert(args) => assert_eq!(args.progress, Some(100_000)),
        _ => panic!("expected convert"),
    }

    let cli = Cli::try_parse_from(["fwf", "convert", "-t", "t.json", "--progress", "500", "in.txt"])
        .expect("parse");
    match cli.command {
        Command::Convert(args) => {
            assert_eq!(args.progress, Some(500));
            assert!(args.output.is_none());
        }
        _ => panic!("expected convert"),
    }
}

#[test]
fn parses_declared_type() {
    let cli = Cli::try_parse_from([
        "fwf", "tape", "add", "--tape", "t.json", "id", "0", "4", "--type", "CHAR(4)",
    ])
    .expect("parse");
    match cli.command {
        Command::Tape(TapeCommand::Add(args)) => {
            assert_eq!(args.declared_type, Some(StorageType::Char(4)));
        }
        _ => panic!("expected tape add"),
    }
}

#[test]
fn rejects_missing_tape_flag() {
    assert!(Cli::try_parse_from(["fwf", "convert", "in.txt"]).is_err());
}

#[test]
fn tape_add_creates_and_replaces() {
    let ws = Workspace::new();
    let tape = path_arg(&ws.tape);

    let outcome = run_args(&["tape", "add", "--tape", &tape, "id", "0", "4"]).expect("add");
    match outcome {
        Outcome::Tape(result) => assert_eq!(result.change, Some(TapeChange::Added("id".into()))),
        other => panic!("unexpected outcome: {other:?}"),
    }
    run_args(&["tape", "add", "--tape", &tape, "name", "4", "14"]).expect("add");
    let outcome = run_args(&[
        "tape", "add", "--tape", &tape, "id", "0", "5", "--type", "INT",
    ])
    .expect("replace");
    match outcome {
        Outcome::Tape(result) => {
            assert_eq!(result.change, Some(TapeChange::Replaced("id".into())));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let saved = Tape::load_file(&ws.tape).expect("load tape");
    let names: Vec<&str> = saved.names().collect();
    assert_eq!(names, vec!["id", "name"]);
    let id = saved.get("id").expect("id field");
    assert_eq!(id.end(), 5);
    assert_eq!(id.declared_type(), Some(&StorageType::Integer));
}

#[test]
fn tape_add_rejects_bad_range() {
    let ws = Workspace::new();
    let tape = path_arg(&ws.tape);

    let err = run_args(&["tape", "add", "--tape", &tape, "id", "4", "4"]).expect_err("bad range");

    assert!(format!("{err:#}").contains("invalid range"));
    assert!(!ws.tape.exists());
}

#[test]
fn tape_alter_and_remove() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);

    run_args(&["tape", "alter", "--tape", &tape, "name", "4", "12"]).expect("alter");
    let outcome = run_args(&["tape", "remove", "--tape", &tape, "missing"]).expect("remove");
    match outcome {
        Outcome::Tape(result) => {
            assert_eq!(result.change, Some(TapeChange::NotFound("missing".into())));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    run_args(&["tape", "remove", "--tape", &tape, "id"]).expect("remove");

    let saved = Tape::load_file(&ws.tape).expect("load tape");
    let names: Vec<&str> = saved.names().collect();
    assert_eq!(names, vec!["name", "salary"]);
    assert_eq!(saved.get("name").map(|f| f.width()), Some(8));

    let err = run_args(&["tape", "alter", "--tape", &tape, "ghost", "0", "1"]).expect_err("unknown");
    assert!(format!("{err:#}").contains("ghost"));
}

#[test]
fn convert_writes_csv_next_to_source() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let source = path_arg(&ws.source);

    let outcome = run_args(&["convert", "--tape", &tape, &source]).expect("convert");

    let expected = ws.dir.path().join("people.csv");
    match outcome {
        Outcome::Convert(result) => {
            assert_eq!(result.summary.lines, 3);
            assert_eq!(result.summary.sink_path, expected);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let csv = fs::read_to_string(&expected).expect("read csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,name,salary");
    assert_eq!(lines[1], "1001,ALICE     ,  52000.5");
    assert_eq!(lines.len(), 4);
}

#[test]
fn convert_refuses_to_overwrite_source() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let source = ws.dir.path().join("data.csv");
    fs::write(&source, "1001ALICE\n").expect("write source");

    let err = run_args(&["convert", "--tape", &tape, &path_arg(&source)]).expect_err("overwrite");

    assert!(err.to_string().contains("overwrite"));
    assert_eq!(fs::read_to_string(&source).expect("read"), "1001ALICE\n");
}

#[test]
fn convert_refuses_output_aliasing_source() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let before = fs::read_to_string(&ws.source).expect("read source");
    let alias = ws.dir.path().join(".").join("people.txt");

    let err = run_args(&["convert", "--tape", &tape, &path_arg(&ws.source), "-o", &path_arg(&alias)])
        .expect_err("output is the source");

    assert!(format!("{err:#}").contains("refusing to overwrite"));
    assert_eq!(fs::read_to_string(&ws.source).expect("read source"), before);
}

#[test]
fn convert_missing_source_fails() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let missing = path_arg(&ws.dir.path().join("missing.txt"));

    let err = run_args(&["convert", "--tape", &tape, &missing]).expect_err("missing source");

    assert!(format!("{err:#}").contains("source not available"));
}

#[test]
fn infer_with_write_saves_types() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let source = path_arg(&ws.source);

    let outcome = run_args(&["infer", "--tape", &tape, &source]).expect("infer");
    match outcome {
        Outcome::Infer(result) => {
            assert_eq!(result.inferred.len(), 3);
            assert!(result.saved_to.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(Tape::load_file(&ws.tape).expect("load").get("id").and_then(|f| f.declared_type()).is_none());

    run_args(&["infer", "--tape", &tape, &source, "--write"]).expect("infer and write");

    let saved = Tape::load_file(&ws.tape).expect("load tape");
    let types: Vec<Option<&StorageType>> = saved.fields().iter().map(|f| f.declared_type()).collect();
    assert_eq!(
        types,
        vec![
            Some(&StorageType::Integer),
            Some(&StorageType::Char(10)),
            Some(&StorageType::Float),
        ]
    );
}

#[test]
fn sql_writes_script_file() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let source = path_arg(&ws.source);
    let output = ws.dir.path().join("out").join("people.sql");

    let outcome = run_args(&[
        "sql", "--tape", &tape, &source, "--table", "staff", "-o", &path_arg(&output),
    ])
    .expect("sql");

    match outcome {
        Outcome::Sql(result) => {
            assert_eq!(result.table_name, "staff");
            assert_eq!(result.written_to.as_deref(), Some(output.as_path()));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let script = fs::read_to_string(&output).expect("read script");
    assert!(script.contains("CREATE TABLE staff ("));
    assert!(script.contains("    salary FLOAT"));
    assert!(script.contains("    salary = SUBSTR(@row, 15, 9)"));
}

#[test]
fn sql_without_inference_uses_char() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let missing = path_arg(&ws.dir.path().join("not-yet.txt"));

    let outcome = run_args(&["sql", "--tape", &tape, &missing, "--no-infer"]).expect("sql");

    match outcome {
        Outcome::Sql(result) => {
            assert_eq!(result.table_name, "not_yet");
            assert!(result.script.contains("    id CHAR(4)"));
            assert!(result.written_to.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn preview_limits_rows() {
    let ws = Workspace::new().with_people_tape();
    let tape = path_arg(&ws.tape);
    let source = path_arg(&ws.source);

    let outcome = run_args(&["preview", "--tape", &tape, &source, "--rows", "2"]).expect("preview");

    match outcome {
        Outcome::Preview(result) => {
            assert_eq!(result.rows.len(), 2);
            assert_eq!(result.rows[1].get(1), Some("BOB       "));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
