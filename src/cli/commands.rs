use crate::error::{ReportError, ReportResult};
use crate::layout::ReportLayout;
use crate::service::ReportService;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Rejection message for inputs without the .xlsx extension.
pub const EXTENSION_MESSAGE: &str = "Only .xlsx files are accepted";

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    format!("{:.2}", n)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// The extension check belongs to the boundary, not the core: the pipeline
/// itself only validates structural shape on load.
fn check_extension(path: &Path) -> ReportResult<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("xlsx") => Ok(()),
        _ => Err(ReportError::InputFormat(EXTENSION_MESSAGE.to_string())),
    }
}

fn load_layout(layout: Option<PathBuf>) -> ReportResult<ReportLayout> {
    match layout {
        Some(path) => ReportLayout::from_yaml_file(path),
        None => Ok(ReportLayout::default()),
    }
}

/// Execute the correct command: run the full pipeline and print the path.
pub fn correct(
    input: PathBuf,
    output_dir: PathBuf,
    layout: Option<PathBuf>,
    unique: bool,
) -> ReportResult<()> {
    check_extension(&input)?;

    println!("{}", "Correcting payroll report".bold().green());
    println!("   File: {}", input.display());
    println!();

    let service = ReportService::new(output_dir)
        .with_layout(load_layout(layout)?)
        .with_unique_paths(unique);
    let path = service.create_report(&input)?;

    println!(
        "{} {}",
        "✅ Report written to".bold().green(),
        path.display()
    );
    Ok(())
}

/// Execute the inspect command: print flagged rows without writing a file.
pub fn inspect(input: PathBuf, layout: Option<PathBuf>) -> ReportResult<()> {
    check_extension(&input)?;

    println!("{}", "Inspecting payroll report".bold().green());
    println!("   File: {}", input.display());
    println!();

    let service = ReportService::new(".").with_layout(load_layout(layout)?);
    let table = service.build_table(&input)?;

    let mut flagged = 0usize;
    for row in table.rows() {
        let branch = row.text(ReportService::BRANCH).unwrap_or("-");
        let employee = row.text(ReportService::EMPLOYEE).unwrap_or("-");
        let deviation = row.number(ReportService::DEVIATION);

        let rendered = match deviation {
            Some(value) if value == 0.0 => format_number(value).green().to_string(),
            Some(value) => {
                flagged += 1;
                format_number(value).red().bold().to_string()
            }
            None => "-".dimmed().to_string(),
        };
        println!("   {:<30} {:<25} {}", branch, employee, rendered);
    }

    println!();
    if flagged == 0 {
        println!("{}", "✅ No deviations found".bold().green());
    } else {
        println!(
            "{}",
            format!("⚠️  {flagged} of {} rows deviate", table.row_count())
                .bold()
                .yellow()
        );
    }
    Ok(())
}

/// Execute the layout command: dump the default layout as YAML.
pub fn layout(output: Option<PathBuf>) -> ReportResult<()> {
    let yaml = ReportLayout::default().to_yaml()?;
    match output {
        Some(path) => {
            std::fs::write(&path, yaml)?;
            println!("{} {}", "Layout written to".green(), path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}
