//! csgraph CLI: build a knowledge graph of a C# codebase.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use csgraph_core::config::AnalysisConfig;
use csgraph_core::output::emit;
use csgraph_core::pipeline;

#[derive(Parser)]
#[command(
    name = "csgraph",
    version,
    about = "csgraph - Map the structure of a C# codebase as a knowledge graph"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a C# source tree and write its knowledge graph as JSON
    Analyze {
        /// Root directory of the codebase
        path: PathBuf,

        /// Output JSON file path, or `-` for stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Also render the graph as Graphviz DOT to this path
        #[arg(long)]
        dot: Option<String>,

        /// Additional directory or file names to exclude
        #[arg(long)]
        exclude: Vec<String>,

        /// Extract files one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Skip files larger than this many bytes
        #[arg(long, default_value = "1000000")]
        max_file_size: u64,

        /// Debug logging and per-phase timing breakdown
        #[arg(short, long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(short, long, conflicts_with = "verbose")]
        quiet: bool,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            output,
            dot,
            exclude,
            sequential,
            max_file_size,
            verbose,
            quiet,
        } => {
            init_logging(verbose, quiet);

            let repo_path = path.canonicalize().unwrap_or(path);
            let repo_name = repo_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "codebase".to_string());

            let output_path = output.unwrap_or_else(|| format!("{repo_name}.csgraph.json"));

            let config = AnalysisConfig {
                repo_path: repo_path.to_string_lossy().to_string(),
                output_path: Some(output_path),
                dot_path: dot,
                exclude_patterns: exclude,
                max_file_size,
                parallel: !sequential,
            };

            // Stdout carries the document, so no summary is printed.
            if quiet || config.output_path.as_deref() == Some("-") {
                run_quiet(&config);
            } else {
                run_with_progress(&config, verbose);
            }
        }
    }
}

fn run_quiet(config: &AnalysisConfig) {
    match pipeline::run_pipeline(config, None) {
        Ok(result) => {
            if let Err(e) = emit(&result, config) {
                eprintln!("Error writing output: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run_with_progress(config: &AnalysisConfig, verbose: bool) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message("Initialising...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |_name, label| {
            pb.set_message(label.to_string());
        })
    };

    let start = Instant::now();
    let result = match pipeline::run_pipeline(config, Some(progress)) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("Analysis failed: {e}");
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    let stats = &result.metadata.stats;
    println!(
        "\n{}  csgraph: {}",
        style("✓").green().bold(),
        style(
            std::path::Path::new(&config.repo_path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        )
        .bold()
    );
    let rows = [
        ("Files:", stats.total_files),
        ("Namespaces:", stats.total_namespaces),
        ("Classes:", stats.total_classes),
        ("Interfaces:", stats.total_interfaces),
        ("Structs:", stats.total_structs),
        ("Enums:", stats.total_enums),
        ("Methods:", stats.total_methods),
        ("Usings:", stats.total_usings),
        ("Dependencies:", stats.total_dependencies),
    ];
    for (label, value) in rows {
        println!("  {label:<14} {value}");
    }
    println!(
        "  {:<14} {} nodes, {} links",
        "Graph:",
        result.graph.nodes.len(),
        result.graph.links.len()
    );

    let duration = start.elapsed();
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        duration.as_secs_f64() * 1000.0
    );

    if verbose {
        println!("\n  Phase Timings:");
        for (phase, secs) in &result.metadata.phase_timings {
            println!("    {:<14} {:.1}ms", phase, secs * 1000.0);
        }
    }

    if let Err(e) = emit(&result, config) {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }

    if let Some(output_path) = &config.output_path {
        println!(
            "\n  {} {}",
            style("Output written to:").green(),
            output_path
        );
    }
    if let Some(dot) = &config.dot_path {
        println!("  {} {}", style("DOT graph:").green(), dot);
    }
}
