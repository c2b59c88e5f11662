//! Tampere CLI binary.
//!
//! Builds the cleaned firm-year panel from spreadsheet extracts.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tampere::data::rates::interest_rates;
use tampere::data::schema::col as cols;
use tampere::output::{ExportFormat, RunReport};
use tampere::panel::FilterConfig;
use tampere::pipeline::{self, PipelineConfig};

#[derive(Parser)]
#[command(name = "tampere")]
#[command(about = "Tampere: firm-year panel builder for company financials", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the cleaned panel from statement extracts
    Build {
        /// Statement extracts sharing the results-sheet layout
        #[arg(required = true)]
        extracts: Vec<PathBuf>,

        /// GDP workbook (country-code column plus wide year columns)
        #[arg(long)]
        gdp: PathBuf,

        /// Output file, overwritten unconditionally
        #[arg(long, default_value = "panel.xlsx")]
        output: PathBuf,

        /// Worksheet holding the statement data
        #[arg(long, default_value = "Results")]
        sheet: String,

        /// Output format; inferred from the output extension by default
        #[arg(long, value_parser = parse_format)]
        format: Option<ExportFormat>,

        /// Drop rows with a later statement year
        #[arg(long, default_value = "2019")]
        max_year: i32,

        /// Drop companies with this many observations or fewer
        #[arg(long, default_value = "10")]
        min_observations: u32,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print the inline interest-rate reference table
    Rates,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            extracts,
            gdp,
            output,
            sheet,
            format,
            max_year,
            min_observations,
            report,
        } => {
            let mut config = PipelineConfig::new(extracts, gdp, output);
            config.sheet = sheet;
            config.format = format;
            config.filter = FilterConfig {
                year_cutoff: max_year,
                min_observations,
                ..FilterConfig::default()
            };
            build_panel(&config, report.as_deref())?;
        }
        Commands::Rates => print_rates()?,
    }

    Ok(())
}

fn build_panel(
    config: &PipelineConfig,
    report: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", "TAMPERE PANEL BUILD");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("  Extracts: {}", config.extracts.len());
    for path in &config.extracts {
        println!("    - {}", path.display());
    }
    println!("  GDP table: {}", config.gdp.display());
    println!("  Output: {}\n", config.output.display());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Loading, reshaping and deriving...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = pipeline::run(config)?;

    spinner.finish_and_clear();

    println!("  Reshaped rows: {}", outcome.rows_reshaped);
    println!(
        "  Written rows: {} across {} companies\n",
        outcome.rows_written, outcome.companies_written
    );
    println!("  Target distribution (before the final gates):");
    for line in outcome.summary.to_string().lines() {
        println!("    {line}");
    }

    if let Some(path) = report {
        let report = RunReport::new(
            config.extracts.clone(),
            outcome.rows_reshaped,
            outcome.rows_written,
            outcome.companies_written,
            outcome.summary.clone(),
            config.output.clone(),
        );
        report.write(path)?;
        println!("\n  Run report: {}", path.display());
    }

    println!("\n✅ Panel written to {}", config.output.display());
    Ok(())
}

fn print_rates() -> Result<(), Box<dyn std::error::Error>> {
    let rates = interest_rates()?;
    let years = rates.column(cols::YEAR)?.i32()?;
    let rate_3m = rates.column(cols::RATE_3M)?.f64()?;
    let rate_12m = rates.column(cols::RATE_12M)?.f64()?;

    println!("{:>6} {:>10} {:>10}", "year", "3m", "12m");
    for i in 0..rates.height() {
        println!(
            "{:>6} {:>10.3} {:>10.3}",
            years.get(i).unwrap_or_default(),
            rate_3m.get(i).unwrap_or_default(),
            rate_12m.get(i).unwrap_or_default(),
        );
    }
    Ok(())
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    match raw.to_ascii_lowercase().as_str() {
        "xlsx" => Ok(ExportFormat::Xlsx),
        "csv" => Ok(ExportFormat::Csv),
        other => Err(format!("unknown format '{other}' (expected xlsx or csv)")),
    }
}
