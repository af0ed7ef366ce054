pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Unrecognized input ({diagram_type}): {count} line(s) skipped, first at line {}: {}",
        first.line,
        first.text
    )]
    Unrecognized {
        diagram_type: String,
        count: usize,
        first: crate::Diagnostic,
    },

    #[error("Diagram parse error ({diagram_type}): {message}")]
    DiagramParse {
        diagram_type: String,
        message: String,
    },
}
