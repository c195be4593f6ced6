mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use cli::{Cli, ProgressReporter, init_logging};
use fwsift::RunSummary;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let options = cli.to_options().context("Invalid arguments")?;

    let progress = ProgressReporter::for_scan(0);
    let summary = fwsift::run_scan(&options, Some(progress.scan_callback()));
    progress.finish();

    let summary =
        summary.with_context(|| format!("Scan of {} failed", options.source_dir.display()))?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("Scan Finished").green().bold());
    println!();
    if let Some(range) = &summary.date_range {
        println!("Date range:     {}", range);
    }
    println!("Addresses:      {}", summary.addresses);
    println!(
        "Files scanned:  {} ({} ignored by name, {} outside range)",
        summary.files_scanned, summary.files_unmatched, summary.files_out_of_range
    );
    println!("Lines read:     {}", summary.lines_read);
    println!("Rows written:   {}", style(summary.rows_written).green());
    println!("Elapsed:        {:.1}s", summary.elapsed_secs);

    if summary.files_skipped() > 0 {
        println!("Files skipped:  {}", style(summary.files_skipped()).yellow());
        for failure in &summary.failures {
            println!(
                "  - {}: {} ({} rows kept)",
                failure.path.display(),
                failure.reason,
                failure.records_kept
            );
        }
    }

    println!("Output:         {}", summary.output.display());
    println!();
}
