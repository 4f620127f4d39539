use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use plan_graph::config::GraphSettings;
use plan_graph::graph::{IntermediateNode, build_intermediate_tree};
use plan_graph::label::LetterAspectMetrics;
use plan_graph::plan::load_change_records;
use plan_graph::render::render_graph_data_with;
use plan_graph::summary::ChangeSummary;

const LOG_FILE_PREFIX: &str = "plan_graph";
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug, Parser)]
#[command(
    name = "plan_graph",
    about = "Turn infrastructure plan changes into a styled node tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the styled graph tree as JSON.
    Render {
        /// JSON or YAML file holding change records.
        path: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Print an indented outline of the change tree.
    Tree {
        /// JSON or YAML file holding change records.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = GraphSettings::from_env().context("failed to load configuration")?;
    let _log_guard = init_tracing(settings.log_dir.as_deref())?;

    match cli.command {
        Commands::Render { path, pretty } => run_render(&settings, &path, pretty),
        Commands::Tree { path } => run_tree(&path),
    }
}

fn run_render(settings: &GraphSettings, path: &Path, pretty: bool) -> Result<()> {
    let records = load_change_records(path)?;
    let summary = ChangeSummary::from_records(&records)
        .with_context(|| format!("failed to classify changes in `{}`", path.display()))?;
    info!(path = %path.display(), %summary, "loaded change records");

    let tree = build_intermediate_tree(&records)
        .with_context(|| format!("failed to build change tree for `{}`", path.display()))?;
    let graph = render_graph_data_with(&tree, &settings.layout, &LetterAspectMetrics)
        .context("failed to render change tree")?;
    info!(
        node_count = graph.node_count(),
        resource_count = tree.resource_count(),
        "rendered graph data"
    );

    let output = if pretty {
        serde_json::to_string_pretty(&graph)
    } else {
        serde_json::to_string(&graph)
    }
    .context("failed to serialize graph data")?;
    println!("{output}");

    Ok(())
}

fn run_tree(path: &Path) -> Result<()> {
    let records = load_change_records(path)?;
    let tree = build_intermediate_tree(&records)
        .with_context(|| format!("failed to build change tree for `{}`", path.display()))?;

    let mut outline = String::new();
    write_outline(&tree, 0, &mut outline)?;
    print!("{outline}");

    Ok(())
}

fn write_outline(node: &IntermediateNode, depth: usize, out: &mut String) -> Result<()> {
    let indent = "  ".repeat(depth);
    match &node.resource {
        Some(resource) => writeln!(
            out,
            "{indent}{} [{}]",
            node.label,
            resource.action_alias()?
        )?,
        None => writeln!(out, "{indent}{}", node.label)?,
    }

    for child in node.children.values() {
        write_outline(child, depth + 1, out)?;
    }
    Ok(())
}

fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,plan_graph=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact();

    let (result, guard) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory `{}`", dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(dir)
                .with_context(|| format!("failed to open log file in `{}`", dir.display()))?;
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            let result = builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(file_writer))
                .try_init();
            (result, Some(guard))
        }
        None => (builder.with_writer(std::io::stderr).try_init(), None),
    };

    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;
    Ok(guard)
}
