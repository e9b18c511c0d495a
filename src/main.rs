use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use paramset::set::SetSnapshot;
use paramset::{ParamSetError, ParameterSet, Schema, TaskSet, PRIORITY_BASE};

const CMD_SOURCE: &str = "cmd";
const CMD_PRIORITY: u32 = PRIORITY_BASE + 1;
const SUGGESTION_LIMIT: usize = 3;
const SUGGESTION_EPSILON: f64 = 0.05;

/// Parses arguments against a parameter schema and reports the selected task.
#[derive(Parser, Debug)]
#[command(name = "paramset")]
#[command(version)]
#[command(about = "Classify command-line arguments against a declarative parameter schema")]
struct Cli {
    /// Schema file (defaults to <config dir>/paramset/schema.toml)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Configuration file read at the base priority; may be repeated
    #[arg(long)]
    conf: Vec<PathBuf>,

    /// Print a JSON snapshot instead of text reports
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Prefix for every report line
    #[arg(long, default_value = "")]
    prefix: String,

    /// Arguments to analyse, after `--`
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Serialize)]
struct Outcome<'a> {
    task: Option<&'a str>,
    scores: Option<&'a [f64]>,
    ignored_values: usize,
    set: SetSnapshot,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether a unique task was selected without any recorded problem.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let schema = match &cli.schema {
        Some(path) => Schema::load(path)?,
        None => Schema::load_default()?,
    };
    let (mut set, mut tasks) = schema.build()?;

    for path in &cli.conf {
        let source = path.display().to_string();
        set.read_from_file(path, Some(&source), PRIORITY_BASE)
            .with_context(|| format!("Failed to ingest configuration file '{}'", source))?;
    }

    let argv: Vec<&str> = std::iter::once("paramset")
        .chain(cli.args.iter().map(String::as_str))
        .collect();
    set.parse_cmd(&argv, Some(CMD_SOURCE), CMD_PRIORITY)?;

    let clean = !(set.is_typo_failure()
        || set.is_unknown()
        || set.is_syntax_error()
        || set.is_constraint_violation()
        || !set.is_format_ok());

    let selected = select_task(&mut tasks, &set)?;
    let ignored_values = match selected {
        Some(index) => {
            let task = &tasks.definitions()[index];
            if !cli.json {
                eprint!("{}", task.ignored_to_string(&set, &cli.prefix));
            }
            tasks.clean_ignored(task, &mut set)
        }
        None => 0,
    };

    if cli.json {
        let outcome = Outcome {
            task: selected.map(|i| tasks.definitions()[i].name()),
            scores: tasks.scores(),
            ignored_values,
            set: set.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_reports(&set, &cli.prefix);
        match selected {
            Some(index) => println!("{}", tasks.definitions()[index].name()),
            None if !tasks.is_empty() => {
                eprint!(
                    "{}",
                    tasks.suggestions_to_string(&set, SUGGESTION_LIMIT, SUGGESTION_EPSILON)?
                );
            }
            None => {}
        }
    }

    Ok(clean && selected.is_some())
}

/// Analyzes the task set; `None` when zero or several tasks are consistent.
fn select_task(tasks: &mut TaskSet, set: &ParameterSet) -> anyhow::Result<Option<usize>> {
    if tasks.is_empty() {
        tracing::warn!("schema declares no tasks");
        return Ok(None);
    }
    tasks.analyze(set)?;

    match tasks.consistent_task() {
        Ok(task) => {
            let id = task.id();
            Ok(tasks.definitions().iter().position(|d| d.id() == id))
        }
        Err(ParamSetError::ZeroConsistentTasks) => Ok(None),
        Err(e @ ParamSetError::MultipleConsistentTasks { .. }) => {
            eprintln!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_reports(set: &ParameterSet, prefix: &str) {
    eprint!("{}", set.syntax_errors_to_string(prefix));
    eprint!("{}", set.typos_to_string(prefix));
    eprint!("{}", set.unknowns_to_string(prefix));
    eprint!("{}", set.invalid_to_string(prefix, None));
    eprint!("{}", set.constraint_errors_to_string(prefix));
}
