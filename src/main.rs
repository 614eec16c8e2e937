mod config;
mod pr;
mod report;
mod stats;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use stats::AllowList;

/// PR Review Stats: CLI tool that reads exported GitHub pull request search
/// results and reports, per reviewer, how many PRs they authored, reviewed and
/// commented on.
#[derive(Parser, Debug)]
#[command(name = "pr-review-stats", version, about)]
struct Cli {
    /// Directory of GraphQL search exports (*.json). Defaults to `data`.
    data_dir: Option<PathBuf>,

    /// Config file (defaults to .pr-stats.toml in the current directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output path for the CSV statistics report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output path for the raw PR data dump
    #[arg(long)]
    pr_data: Option<PathBuf>,

    /// Only report on this reviewer (repeatable). Overrides the config allow-list.
    #[arg(short, long = "reviewer", value_name = "LOGIN")]
    reviewers: Vec<String>,

    /// Don't print the statistics table to the terminal
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;

    let data_dir = cli.data_dir.unwrap_or(config.input.data_dir.clone());
    let analysis_path = cli.output.unwrap_or(config.output.analysis.clone());
    let pr_data_path = cli.pr_data.unwrap_or(config.output.pr_data.clone());
    let allow_list: AllowList = if cli.reviewers.is_empty() {
        config.allow_list()
    } else {
        cli.reviewers.into_iter().collect()
    };

    let _main_span = info_span!("pr_stats", data_dir = %data_dir.display()).entered();
    if !allow_list.is_empty() {
        debug!(reviewers = allow_list.len(), "restricting report to allow-list");
    }

    info!("loading PR records");
    let entries = pr::load_dir(&data_dir)?;

    info!("aggregating reviewer activity");
    let aggregator = stats::aggregate(entries.iter().map(|entry| &entry.record));
    let records_analyzed = aggregator.records();
    debug!(identities = aggregator.activity().len(), "collected reviewer activity");
    let activity = stats::filter::restrict(aggregator.into_activity(), &allow_list);
    let reviewers = stats::finalize(&activity);
    info!(records = records_analyzed, reviewers = reviewers.len(), "aggregation complete");

    info!("writing reports");
    let built_report = report::build(records_analyzed, reviewers);
    let dumped = stats::filter::restrict_entries(&entries, &allow_list);
    report::write_outputs(&built_report, &dumped, &analysis_path, &pr_data_path)?;

    println!("Total PRs analyzed: {}", built_report.records_analyzed);
    println!("Exported results to {}", analysis_path.display());
    println!("Exported PR data to {}", pr_data_path.display());

    if !cli.quiet {
        report::print_terminal_report(&built_report);
    }
    info!("done");

    Ok(())
}
