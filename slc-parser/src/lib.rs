//! Hand-written recursive-descent parser, turning a token stream into a
//! [`slc_ast::Program`].
//!
//! There is no panic-mode error recovery: the first syntax error aborts the
//! parse with a single [`ParseError`], matching the fail-fast posture of the
//! rest of the pipeline (logging and accumulation live in the analyzer, not
//! here).

use thiserror::Error;

mod parser;
pub use parser::Parser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] slc_lexer::LexError),
    #[error("parse error at {line}:{column}: {message}")]
    Syntax { message: String, line: usize, column: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. } => *line,
            ParseError::Lex(_) => 0,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::Syntax { column, .. } => *column,
            ParseError::Lex(_) => 0,
        }
    }

    /// Render as a [`slc_diagnostics::Diagnostic`] for uniform CLI reporting.
    pub fn to_diagnostic(&self, file: &str) -> slc_diagnostics::Diagnostic {
        use slc_diagnostics::{error_codes, Diagnostic, Span};
        let span = Span::new(file.to_string(), self.line(), self.column(), 1);
        match self {
            ParseError::Lex(e) => {
                Diagnostic::error(error_codes::LEX_ERROR, e.to_string(), span)
            }
            ParseError::Syntax { message, .. } => {
                Diagnostic::error(error_codes::UNEXPECTED_TOKEN, message.clone(), span)
            }
        }
    }
}
