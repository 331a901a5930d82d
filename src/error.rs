//! Structured error types for tablespan.
//!
//! Interactive edits with stale indices are silent no-ops and never reach
//! this type. Errors are reserved for contract violations and for input
//! that cannot be read at all.

/// All errors that can occur while editing, reading or writing a layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Cell binding payload could not be encoded or decoded.
    #[error("Cell binding payload: {0}")]
    Binding(#[from] serde_json::Error),

    /// A span rectangle does not fit the span matrix.
    #[error("Span {width}x{height} at ({row}, {col}) exceeds the {rows}x{cols} span matrix")]
    SpanOutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
        rows: usize,
        cols: usize,
    },

    /// The layout lock was poisoned by a panicking writer.
    #[error("Layout lock poisoned")]
    Poisoned,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

impl From<String> for LayoutError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for LayoutError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_span_out_of_bounds_message() {
        let err = LayoutError::SpanOutOfBounds {
            row: 1,
            col: 2,
            width: 3,
            height: 4,
            rows: 2,
            cols: 2,
        };
        assert_eq!(
            err.to_string(),
            "Span 3x4 at (1, 2) exceeds the 2x2 span matrix"
        );
    }

    #[test]
    fn test_from_str() {
        let err: LayoutError = "boom".into();
        assert!(matches!(err, LayoutError::Other(ref s) if s == "boom"));
    }
}
