use chrono::NaiveDate;
use clap::Parser;
use fwsift::config::{DEFAULT_OUTPUT_NAME, ScanOptions};
use fwsift::coordinator::{ProgressCallback, ScanProgress};
use fwsift::{DateRange, FieldLayout, ScanError};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fwsift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pull every firewall log line mentioning a set of IPs into one CSV", long_about = None)]
pub struct Cli {
    /// Directory with the daily `<name>.DD.MM.YY.gz` log files
    #[arg(short, long, env = "FWSIFT_LOGS")]
    pub logs: PathBuf,

    /// File with one IP address per line
    #[arg(short, long, env = "FWSIFT_IPS")]
    pub ips: PathBuf,

    /// Output CSV file, or an existing directory to write it into
    #[arg(short, long, env = "FWSIFT_OUTPUT", default_value = DEFAULT_OUTPUT_NAME)]
    pub output: PathBuf,

    /// First log date to scan (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date, requires = "end")]
    pub start: Option<NaiveDate>,

    /// Last log date to scan (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date, requires = "start")]
    pub end: Option<NaiveDate>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long, env = "FWSIFT_WORKERS", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Also extract `log_subtype`
    #[arg(long)]
    pub with_subtype: bool,

    /// Write a JSON run report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

impl Cli {
    pub fn to_options(&self) -> Result<ScanOptions, ScanError> {
        let mut options = ScanOptions::new(&self.logs, &self.ips, &self.output);

        if let (Some(start), Some(end)) = (self.start, self.end) {
            options = options.with_date_range(DateRange::new(start, end)?);
        }
        if let Some(workers) = self.workers {
            options = options.with_workers(workers as usize);
        }
        if self.with_subtype {
            options = options.with_layout(FieldLayout::WithSubtype);
        }
        if let Some(report) = &self.report {
            options = options.with_report(report);
        }

        Ok(options)
    }

    fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

/// `RUST_LOG` wins over the command-line flags. Logs go to stderr.
pub fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub struct ProgressReporter {
    bar: Arc<ProgressBar>,
}

impl ProgressReporter {
    pub fn for_scan(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);
        let style = ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message("Scanning logs...".to_string());
        Self { bar: Arc::new(bar) }
    }

    pub fn scan_callback(&self) -> ProgressCallback {
        let bar = Arc::clone(&self.bar);
        Box::new(move |progress: &ScanProgress| {
            bar.set_length(progress.files_total as u64);
            bar.set_position(progress.files_done as u64);
            bar.set_message(format!(
                "{} rows | {} files skipped",
                progress.records_found, progress.files_failed
            ));
        })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
