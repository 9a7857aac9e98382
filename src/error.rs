use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout parsing error: {0}")]
    Layout(#[from] serde_yaml::Error),

    #[error("Input format error: {0}")]
    InputFormat(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Formatting error: {0}")]
    Format(String),
}
