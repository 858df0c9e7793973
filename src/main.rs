use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use depmap::formatters::{JsonFormatter, MermaidFormatter};
use depmap::store::{
    persist_structure, DirectoryStore, MemoryStore, STRUCTURE_DIAGRAM_SLOT, STRUCTURE_GRAPH_SLOT,
};
use depmap::{MapperConfig, ProjectMapper};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "depmap",
    version,
    about = "Map file and component dependencies of a JavaScript-family project"
)]
struct Cli {
    /// Project root to analyze
    #[arg(value_name = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Memory directory that receives the structure slots
    #[arg(short, long, value_name = "DIR", default_value = "memory")]
    output_dir: PathBuf,

    /// Which outputs to produce
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    format: OutputFormat,

    /// JSON config file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated directory names to skip
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Comma-separated extensions in resolution priority order
    #[arg(long, value_name = "EXTS", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Stop traversal after this many milliseconds
    #[arg(long, value_name = "MS")]
    time_budget_ms: Option<u64>,

    /// Print to stdout instead of writing to the memory directory
    #[arg(long)]
    stdout: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Mermaid,
    Json,
    Both,
}

impl OutputFormat {
    fn wants_mermaid(self) -> bool {
        matches!(self, OutputFormat::Mermaid | OutputFormat::Both)
    }

    fn wants_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<MapperConfig> {
    let mut config = match &cli.config {
        Some(path) => MapperConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MapperConfig::default(),
    };
    if !cli.ignore.is_empty() {
        config = config.with_ignored_dirs(cli.ignore.iter().cloned());
    }
    if !cli.extensions.is_empty() {
        config = config.with_extensions(cli.extensions.iter().cloned());
    }
    if let Some(ms) = cli.time_budget_ms {
        config = config.with_time_budget(Duration::from_millis(ms));
    }
    Ok(config.normalized()?)
}

fn run(cli: Cli) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(&cli)?;

    if !cli.stdout {
        println!("Mapping project structure for: {}", cli.root.display());
    }

    let analysis = ProjectMapper::new(config)
        .analyze(&cli.root)
        .with_context(|| format!("analyzing {}", cli.root.display()))?;
    let graph = &analysis.graph;

    if cli.stdout {
        if cli.format.wants_mermaid() {
            print!("{}", MermaidFormatter::new().format_graph(graph));
        }
        if cli.format.wants_json() {
            println!("{}", JsonFormatter::new().format_graph(graph)?);
        }
        return Ok(());
    }

    println!(
        "Found {} nodes and {} connections",
        graph.node_count(),
        graph.edge_count()
    );
    for issue in &analysis.issues {
        println!("Warning: {issue}");
    }

    let store = DirectoryStore::open(&cli.output_dir)?;
    match cli.format {
        OutputFormat::Both => persist_structure(&store, graph)?,
        OutputFormat::Mermaid => store.write(
            STRUCTURE_DIAGRAM_SLOT,
            &MermaidFormatter::new().format_graph(graph),
        )?,
        OutputFormat::Json => store.write(
            STRUCTURE_GRAPH_SLOT,
            &JsonFormatter::new().format_graph(graph)?,
        )?,
    }
    if cli.format.wants_mermaid() {
        println!(
            "Diagram saved to: {}",
            store.slot_path(STRUCTURE_DIAGRAM_SLOT)?.display()
        );
    }
    if cli.format.wants_json() {
        println!(
            "Connection map saved to: {}",
            store.slot_path(STRUCTURE_GRAPH_SLOT)?.display()
        );
    }

    let summary = graph.summary();
    println!(
        "Summary: {} files, {} components, {} imports",
        summary.files, summary.components, summary.imports
    );
    println!(
        "Total execution time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
