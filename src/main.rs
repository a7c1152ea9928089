use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use icd9_dx::algorithm::icd9::{BatchSummary, classify_batch_with_summary};
use icd9_dx::config::{DEFAULT_CODES_COLUMN, DEFAULT_DATE_COLUMN, DEFAULT_ID_COLUMN};
use icd9_dx::utils::logging::{create_main_progress_bar, finish_progress_bar};
use icd9_dx::{
    ClassifierConfig, ReaderConfig, Table, Taxonomy, output_schema, read_table,
    validate_input_schema, write_table,
};

/// Flag ICD-9 diagnosis code lists by clinical category
#[derive(Debug, Parser)]
#[command(name = "icd9-dx", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify every row of a CSV or Parquet table
    Classify(ClassifyArgs),
    /// List the categories of a taxonomy
    Categories(CategoriesArgs),
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Input table (.csv or .parquet)
    #[arg(short, long)]
    input: PathBuf,

    /// Output table (.csv or .parquet)
    #[arg(short, long)]
    output: PathBuf,

    /// Taxonomy JSON file; the built-in reference taxonomy when omitted
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Identifier column
    #[arg(long, default_value = DEFAULT_ID_COLUMN)]
    id_column: String,

    /// Raw diagnosis-code column
    #[arg(long, default_value = DEFAULT_CODES_COLUMN)]
    codes_column: String,

    /// Date column
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    date_column: String,

    /// Classify rows on a single thread
    #[arg(long)]
    sequential: bool,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Rows per record batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Debug, Args)]
struct CategoriesArgs {
    /// Taxonomy JSON file; the built-in reference taxonomy when omitted
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Only list categories of this group
    #[arg(long)]
    group: Option<String>,
}

fn load_taxonomy(path: Option<&PathBuf>) -> Result<Taxonomy> {
    match path {
        Some(path) => Taxonomy::from_path(path)
            .with_context(|| format!("Failed to load taxonomy from {}", path.display())),
        None => Taxonomy::reference().context("Failed to parse the built-in taxonomy"),
    }
}

fn configure_threads(threads: Option<usize>) -> Result<()> {
    let threads = threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to configure the worker thread pool")?;
    info!("Using {threads} worker threads");
    Ok(())
}

fn run_classify(args: &ClassifyArgs) -> Result<()> {
    let start = Instant::now();

    let mut config = ClassifierConfig::new()
        .with_id_column(args.id_column.as_str())
        .with_codes_column(args.codes_column.as_str())
        .with_date_column(args.date_column.as_str());
    if args.sequential {
        config = config.sequential();
    } else {
        configure_threads(args.threads)?;
    }

    let mut reader_config = ReaderConfig::default();
    if let Some(batch_size) = args.batch_size {
        reader_config = reader_config.with_batch_size(batch_size);
    }

    let taxonomy = load_taxonomy(args.taxonomy.as_ref())?;
    info!(
        "Loaded taxonomy with {} categories, composite '{}'",
        taxonomy.len(),
        taxonomy.composite().name()
    );

    let input = read_table(&args.input, &reader_config)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    validate_input_schema(&input.schema, &config)
        .with_context(|| format!("Input {} is missing a required column", args.input.display()))?;

    let schema = output_schema(&input.schema, &taxonomy, &config)?;
    let progress = (!args.no_progress)
        .then(|| create_main_progress_bar(input.batches.len() as u64, Some("Classifying")));

    let mut summary = BatchSummary::default();
    let mut batches = Vec::with_capacity(input.batches.len());
    for batch in &input.batches {
        let (output, batch_summary) = classify_batch_with_summary(batch, &taxonomy, &config)?;
        summary.merge(&batch_summary);
        batches.push(output);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = &progress {
        finish_progress_bar(pb, Some("Classification complete"));
    }

    write_table(&args.output, &Table::new(schema, batches))
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log_summary(&summary, &taxonomy);
    info!(
        "Saved classified table to {} in {:?}",
        args.output.display(),
        start.elapsed()
    );
    Ok(())
}

fn log_summary(summary: &BatchSummary, taxonomy: &Taxonomy) {
    info!(
        "{} rows: {} with at least one category, {} without codes, {} flagged {}",
        summary.rows,
        summary.rows_with_match,
        summary.rows_without_codes,
        summary.composite_hits,
        taxonomy.composite().name()
    );
    for (name, hits) in summary.top_categories(taxonomy, 5) {
        info!("  {name}: {hits}");
    }
}

fn run_categories(args: &CategoriesArgs) -> Result<()> {
    let taxonomy = load_taxonomy(args.taxonomy.as_ref())?;

    println!(
        "{} = any of: {}",
        taxonomy.composite().name(),
        taxonomy
            .composite()
            .members()
            .iter()
            .map(|&idx| taxonomy.categories()[idx].name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    for (idx, category) in taxonomy.categories().iter().enumerate() {
        if let Some(group) = &args.group {
            if category.group() != Some(group.as_str()) {
                continue;
            }
        }
        let marker = if taxonomy.is_composite_member(idx) { "*" } else { " " };
        println!(
            "{marker} {:>3}  {:<16} {:>3} patterns  {}",
            idx + 1,
            category.group().unwrap_or("-"),
            category.patterns().len(),
            category.name()
        );
        if let Some(note) = category.note() {
            println!("        note: {note}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Classify(args) => run_classify(args),
        Command::Categories(args) => run_categories(args),
    }
}
