//! CLI front-end for the workflow interpreter (spec §6 "CLI surface").
//!
//! A thin runner: it owns no actor types of its own, so a transition whose
//! action names an actor that was never registered fails the step with the
//! usual "missing actor" diagnostic (spec §7) rather than crashing the
//! process. Embedding applications that need real payload types link
//! against the library directly and pre-register their actors on the
//! [`flowrt::ActorSystem`] before handing it to an [`flowrt::Interpreter`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use flowrt::system::WorkflowRunConfig;
use flowrt::workflow::overlay;
use flowrt::{ActorSystem, Interpreter, SystemConfig, Workflow};

#[derive(Parser)]
#[command(name = "flowrt")]
#[command(version, about = "In-process actor runtime and workflow interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a workflow and drive it to `end` or a maximum iteration count.
    Run(RunArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Workflow document to load (YAML or JSON).
    #[arg(short = 'w', long = "workflow")]
    workflow: PathBuf,

    /// Base directory `--workflow` and `--overlay-dir` are resolved
    /// against when given as relative paths (default: current directory).
    #[arg(short = 'd', long = "base-dir")]
    base_dir: Option<PathBuf>,

    /// Directory holding an overlay document to apply before running,
    /// overriding `--workflow` with the merged result.
    #[arg(short = 'o', long = "overlay-dir")]
    overlay_dir: Option<PathBuf>,

    /// Overlay document file name within `--overlay-dir` (default
    /// `overlay.yaml`).
    #[arg(long = "overlay-file", default_value = "overlay.yaml")]
    overlay_file: String,

    /// Maximum interpreter steps before the run is abandoned as
    /// non-terminating.
    #[arg(short = 'm', long = "max-iterations")]
    max_iterations: Option<usize>,

    /// Seed an interpreter variable as `key=value`; may be repeated.
    #[arg(short = 'P', value_parser = parse_key_value)]
    vars: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    flowrt::util::logging::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => match run(args).await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(err) => {
                tracing::error!(%err, "flowrt run failed");
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(args: RunArgs) -> anyhow::Result<bool> {
    let workflow = load_workflow(&args)?;

    let system = ActorSystem::new(workflow.name.clone(), SystemConfig::default())?;
    let run_config = WorkflowRunConfig {
        max_iterations: args.max_iterations,
        variables: args.vars.into_iter().collect::<HashMap<_, _>>(),
    };

    let interpreter = Interpreter::new(system, workflow, run_config.variables.clone());
    let outcome = interpreter.run_until_end(run_config.effective_max_iterations()).await;

    if outcome.success {
        println!("{}", outcome.result);
    } else {
        eprintln!("workflow did not complete: {}", outcome.result);
    }
    Ok(outcome.success)
}

fn load_workflow(args: &RunArgs) -> anyhow::Result<Workflow> {
    let resolve = |p: &PathBuf| -> PathBuf {
        match &args.base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.clone(),
        }
    };

    if let Some(dir) = &args.overlay_dir {
        let dir = resolve(dir);
        let overlay_path = dir.join(&args.overlay_file);
        return Ok(overlay::build_from_disk(&overlay_path, &dir)?);
    }

    let path = resolve(&args.workflow);
    let text = std::fs::read_to_string(&path)?;
    let workflow = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        Workflow::from_json(&text)?
    } else {
        Workflow::from_yaml(&text)?
    };
    Ok(workflow)
}
