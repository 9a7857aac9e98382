use clap::{Parser, Subcommand};
use ndfl_report::cli;
use ndfl_report::error::ReportResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ndfl-report")]
#[command(about = "Correct payroll NDFL reports: recompute totals, flag deviations, emit styled .xlsx")]
#[command(long_about = "ndfl-report - payroll tax report corrector

Takes an uploaded payroll report (.xlsx), recomputes the expected NDFL total
per employee row (13% up to 5,000,000, 15% above), flags rows whose reported
total disagrees, and writes a reformatted workbook with a two-row styled
header and a color-coded deviation column.

COMMANDS:
  correct  - Run the full pipeline and write the corrected report
  inspect  - Print flagged rows to the terminal, no file written
  layout   - Dump the default report layout as YAML

EXAMPLES:
  ndfl-report correct upload.xlsx                 # writes media/report.xlsx
  ndfl-report correct upload.xlsx -o /srv/media --unique
  ndfl-report inspect upload.xlsx
  ndfl-report layout -o layout.yaml               # then: correct -l layout.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct a payroll report and write the styled .xlsx
    Correct {
        /// Path to the source report (.xlsx)
        input: PathBuf,

        /// Directory the corrected report is written to
        #[arg(short, long, default_value = "media")]
        output_dir: PathBuf,

        /// Layout overrides (YAML, see `ndfl-report layout`)
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Write a unique per-invocation file instead of the fixed report slot
        #[arg(long)]
        unique: bool,
    },

    /// Print flagged rows without writing a file
    Inspect {
        /// Path to the source report (.xlsx)
        input: PathBuf,

        /// Layout overrides (YAML)
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },

    /// Print the default report layout as YAML
    Layout {
        /// Write the layout to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ReportResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ndfl_report=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Correct {
            input,
            output_dir,
            layout,
            unique,
        } => cli::correct(input, output_dir, layout, unique),

        Commands::Inspect { input, layout } => cli::inspect(input, layout),

        Commands::Layout { output } => cli::layout(output),
    }
}
