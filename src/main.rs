//! Source line counter.
//!
//! Walks the given paths, decides the language of every file from its name,
//! extension, interpreter line or content, and reports blank, comment and
//! code lines per language (or per file).

mod classify;
mod config;
mod error;
mod language;
mod lines;
mod processor;
mod report;
mod scanner;
mod stats;
mod walk;

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use std::time::Instant;

use clap::Parser;
use colored::*;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, ClocOptions, OutputType};
use crate::error::Result;
use crate::language::Registry;
use crate::processor::Processor;
use crate::report::{build_json_report, build_table_report, format_file_details};
use crate::walk::{collect_files, WalkOptions};

struct PerformanceMetrics {
    start_time: Instant,
}

impl PerformanceMetrics {
    fn new() -> Self {
        PerformanceMetrics {
            start_time: Instant::now(),
        }
    }

    fn print_final_stats(
        &self,
        writer: &mut dyn Write,
        files: u64,
        lines: u64,
        error_count: usize,
    ) -> io::Result<()> {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        writeln!(writer, "\n{}", "Performance Summary:".blue().bold())?;
        writeln!(
            writer,
            "Total time: {} seconds",
            format!("{:.2}", elapsed).bright_yellow()
        )?;
        writeln!(
            writer,
            "Files processed: {} ({})",
            files.to_string().bright_yellow(),
            format!("{:.1} files/sec", safe_rate(files, elapsed)).bright_yellow()
        )?;
        writeln!(
            writer,
            "Lines processed: {} ({})",
            lines.to_string().bright_yellow(),
            format!("{:.1} lines/sec", safe_rate(lines, elapsed)).bright_yellow()
        )?;
        if error_count > 0 {
            writeln!(
                writer,
                "\n{}: {} entries could not be read",
                "Warning".red().bold(),
                error_count.to_string().bright_yellow()
            )?;
        }
        Ok(())
    }
}

fn safe_rate(value: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= f64::EPSILON {
        0.0
    } else {
        value as f64 / elapsed_secs
    }
}

/// Diagnostics go to stderr. `RUST_LOG` overrides the level picked here.
fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "locscan=debug" } else { "warn" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn main() {
    if let Err(err) = run_with_args(std::env::args_os()) {
        eprintln!("{} {}", "Error:".red().bold(), err);
        process::exit(1);
    }
}

fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::parse_from(args);
    let options = ClocOptions::from_args(&args);
    init_logging(options.debug);

    let registry = Registry::builtin();
    let processor = Processor::new(registry, options)?;
    let cancel = processor.cancel_handle();
    if let Err(err) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
        warn!(error = %err, "cannot install Ctrl+C handler");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&args, registry, &processor, &mut out)
}

fn run(
    args: &Args,
    registry: &Registry,
    processor: &Processor<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    if args.show_lang {
        write!(out, "{}", registry.describe())?;
        return Ok(());
    }

    let json = args.output_type == OutputType::Json;
    if !json {
        writeln!(
            out,
            "{} {}",
            env!("CARGO_PKG_NAME").bright_cyan().bold(),
            format!("v{}", env!("CARGO_PKG_VERSION")).bright_yellow()
        )?;
    }

    let metrics = PerformanceMetrics::new();
    let walk_options = WalkOptions::from_args(args)?;
    let roots: Vec<PathBuf> = args.paths.iter().map(PathBuf::from).collect();
    let walked = collect_files(&roots, &walk_options)?;
    let result = processor.analyze(&walked.files)?;

    if json {
        writeln!(out, "{}", build_json_report(&result, args.by_file)?)?;
        return Ok(());
    }

    if args.verbose {
        for file in &result.files {
            writeln!(out, "{}", format_file_details(file))?;
        }
    }
    write!(out, "{}", build_table_report(&result, args.by_file))?;
    metrics.print_final_stats(
        out,
        result.files.len() as u64,
        result.total.total,
        walked.errors,
    )?;
    Ok(())
}
