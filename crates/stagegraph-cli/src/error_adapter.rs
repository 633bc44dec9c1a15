//! Error adapter for converting StageGraphError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! JSON parse errors carry the input text, so they are rendered with a snippet
//! pointing at the offending line and column. Every other error is rendered as
//! a plain report with a code and, where one applies, a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};
use serde_json::error::Category;

use stagegraph::{StageGraphError, ValidationError};

/// Adapter for a JSON parse error with its source text.
pub struct JsonDiagnosticAdapter<'a> {
    err: &'a serde_json::Error,
    src: &'a str,
}

impl<'a> JsonDiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Byte span of the position serde_json reported.
    fn span(&self) -> SourceSpan {
        let offset = line_column_to_offset(self.src, self.err.line(), self.err.column());
        let len = usize::from(offset < self.src.len());
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for JsonDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDiagnosticAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for JsonDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid graph description")
    }
}

impl std::error::Error for JsonDiagnosticAdapter<'_> {}

impl MietteDiagnostic for JsonDiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err.classify() {
            Category::Io => "stagegraph::json::io",
            Category::Syntax => "stagegraph::json::syntax",
            Category::Data => "stagegraph::json::data",
            Category::Eof => "stagegraph::json::eof",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err.classify() {
            Category::Data => {
                "expected `{ \"nodes\": [{ \"id\", \"data\" }], \"edges\": [{ \"id\", \"source\", \"target\" }] }`"
            }
            Category::Eof => "the document ends before every object and array is closed",
            Category::Io | Category::Syntax => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let message = strip_position(&self.err.to_string());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(message), self.span()),
        )))
    }
}

/// Adapter for [`StageGraphError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a StageGraphError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            StageGraphError::Io(_) => "stagegraph::io",
            StageGraphError::Parse { .. } => "stagegraph::json",
            StageGraphError::Validation(_) => "stagegraph::validation",
            StageGraphError::Config(_) => "stagegraph::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let StageGraphError::Validation(err) = &self.0 else {
            return None;
        };
        let help = match err {
            ValidationError::EmptyStageId { .. } => "every stage needs a non-empty `id`",
            ValidationError::DuplicateStage { .. } => "stage ids must be unique",
            ValidationError::MultipleInitialStages { .. } => {
                "mark at most one stage with `isInitial: true`"
            }
            ValidationError::DuplicateTransition { .. } => "transition ids must be unique",
            ValidationError::UnknownStage { .. } => {
                "`source` and `target` must name the `id` of a stage in `nodes`"
            }
            ValidationError::SelfLoop { .. } => "a transition must connect two different stages",
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A JSON error with source location information.
    Diagnostic(JsonDiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert serde_json's 1-based line and column into a byte offset.
///
/// Column 0 (reported for errors before the first character of a line) maps
/// to the start of the line. Positions past the end clamp to `src.len()`.
fn line_column_to_offset(src: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, text) in src.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = column.saturating_sub(1).min(text.len());
            return offset + within;
        }
        offset += text.len();
    }
    src.len()
}

/// Drop the trailing " at line X column Y" serde_json appends to messages.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

/// Convert a [`StageGraphError`] into a list of reportable errors.
pub fn to_reportables(err: &StageGraphError) -> Vec<Reportable<'_>> {
    match err {
        StageGraphError::Parse { err: json_err, src } => {
            vec![Reportable::Diagnostic(JsonDiagnosticAdapter::new(json_err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error(src: &str) -> StageGraphError {
        let err = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        StageGraphError::new_parse_error(err, src)
    }

    #[test]
    fn test_parse_error_is_diagnostic() {
        let src = "{\n  \"nodes\": [,]\n}";
        let err = parse_error(src);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "Invalid graph description");
                assert_eq!(
                    d.code().map(|c| c.to_string()).as_deref(),
                    Some("stagegraph::json::syntax")
                );

                let label = d.labels().unwrap().next().unwrap();
                // Points into the second line, where the stray comma sits.
                assert!(label.offset() > src.find('\n').unwrap());
                assert!(label.offset() < src.rfind('\n').unwrap());
                assert!(!label.label().unwrap().contains("at line"));
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_validation_error_has_help() {
        let err = StageGraphError::Validation(ValidationError::UnknownStage {
            transition: "e1".to_string(),
            stage: "ghost".to_string(),
        });

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.code().map(|c| c.to_string()).as_deref(),
                    Some("stagegraph::validation")
                );
                assert!(e.help().is_some());
                assert!(e.to_string().contains("ghost"));
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = StageGraphError::Config("bad".to_string());
        let reportables = to_reportables(&err);

        assert!(reportables[0].help().is_none());
        assert!(reportables[0].labels().is_none());
    }

    #[test]
    fn test_line_column_to_offset() {
        let src = "ab\ncd\nef";
        assert_eq!(line_column_to_offset(src, 1, 1), 0);
        assert_eq!(line_column_to_offset(src, 2, 2), 4);
        assert_eq!(line_column_to_offset(src, 3, 0), 6);
        assert_eq!(line_column_to_offset(src, 9, 1), src.len());
    }

    #[test]
    fn test_strip_position() {
        assert_eq!(
            strip_position("expected value at line 2 column 13"),
            "expected value"
        );
        assert_eq!(strip_position("EOF"), "EOF");
    }
}
