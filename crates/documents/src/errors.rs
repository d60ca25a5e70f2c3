use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("spreadsheet export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("print template failed: {0}")]
    Template(#[from] askama::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
