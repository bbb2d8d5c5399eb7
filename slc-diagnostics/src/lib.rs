//! Diagnostic reporting for the SL compiler.
//!
//! Every lex, parse, and semantic finding the pipeline produces is a
//! [`Diagnostic`]: a severity, a stable code, a message, a [`Span`], and
//! optional notes/help/suggestion. A [`DiagnosticEngine`] accumulates them
//! during a compilation and renders a rustc-style report against the
//! original source text.

use colored::Colorize;
use std::fmt;
use std::path::Path;

/// Source code location.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Span {
    pub fn new(file: String, line: usize, column: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            length,
        }
    }

    pub fn from_file_and_span(file: &str, source: &str, span: std::ops::Range<usize>) -> Self {
        let before = &source[..span.start];
        let line = before.chars().filter(|&c| c == '\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.len() + 1, |pos| before.len() - pos);
        let length = span.end.saturating_sub(span.start).max(1);

        Self {
            file: file.to_string(),
            line,
            column,
            length,
        }
    }

    pub fn unknown() -> Self {
        Self {
            file: "<unknown>".to_string(),
            line: 0,
            column: 0,
            length: 0,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self {
            file: path.display().to_string(),
            line: 0,
            column: 0,
            length: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Diagnostic severity. Kept general-purpose even though the analyzer (the
/// only semantic-check producer) only ever constructs `Error`-level
/// diagnostics — see `error_codes` and SPEC_FULL §7/§10.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Error,
    Warning,
    Info,
    Note,
    Help,
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorLevel::Error => write!(f, "{}", "error".red().bold()),
            ErrorLevel::Warning => write!(f, "{}", "warning".yellow().bold()),
            ErrorLevel::Info => write!(f, "{}", "info".blue().bold()),
            ErrorLevel::Note => write!(f, "{}", "note".cyan().bold()),
            ErrorLevel::Help => write!(f, "{}", "help".green().bold()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: ErrorLevel,
    pub code: String,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
    pub suggestion: Option<Suggestion>,
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub message: String,
    pub replacement: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(level: ErrorLevel, code: &str, message: String, span: Span) -> Self {
        Self {
            level,
            code: code.to_string(),
            message,
            span,
            notes: Vec::new(),
            help: None,
            suggestion: None,
        }
    }

    pub fn error(code: &str, message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Error, code, message, span)
    }

    pub fn warning(code: &str, message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Warning, code, message, span)
    }

    pub fn info(code: &str, message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Info, code, message, span)
    }

    pub fn note(message: String, span: Span) -> Self {
        Self::new(ErrorLevel::Note, "", message, span)
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_suggestion(mut self, message: String, replacement: String, span: Span) -> Self {
        self.suggestion = Some(Suggestion {
            message,
            replacement,
            span,
        });
        self
    }

    /// Rustc-style multi-line rendering against the original source.
    pub fn format(&self, source_code: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level,
            self.code,
            self.message.bold()
        ));

        output.push_str(&format!(
            " {} {}:{}:{}\n",
            "-->".cyan().bold(),
            self.span.file,
            self.span.line,
            self.span.column
        ));

        if let Some(snippet) = self.source_snippet(source_code) {
            output.push_str(&snippet);
        }

        for note in &self.notes {
            output.push_str(&format!(" {} {}\n", "=".cyan().bold(), note.cyan()));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!(" {} {}\n", "help:".green().bold(), help));
        }

        if let Some(suggestion) = &self.suggestion {
            output.push_str(&format!(
                " {} {}\n",
                "help:".green().bold(),
                suggestion.message
            ));
            if let Some(suggested) = self.suggestion_snippet(source_code) {
                output.push_str(&suggested);
            }
        }

        output
    }

    fn format_simple(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level,
            self.code,
            self.message.bold()
        ));

        output.push_str(&format!(
            " {} {}:{}:{}\n",
            "-->".cyan().bold(),
            self.span.file,
            self.span.line,
            self.span.column
        ));

        for note in &self.notes {
            output.push_str(&format!(" {} {}\n", "=".cyan().bold(), note.cyan()));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!(" {} {}\n", "help:".green().bold(), help));
        }

        output
    }

    fn source_snippet(&self, source_code: &str) -> Option<String> {
        let lines: Vec<&str> = source_code.lines().collect();

        if self.span.line == 0 || self.span.line > lines.len() {
            return None;
        }

        let line_idx = self.span.line - 1;
        let line = lines.get(line_idx)?;

        let mut snippet = String::new();
        let line_num_width = self.span.line.to_string().len().max(2);

        snippet.push_str(&format!(" {}\n", " ".repeat(line_num_width + 1).cyan()));
        snippet.push_str(&format!(
            " {} {} {}\n",
            format!("{:>width$}", self.span.line, width = line_num_width)
                .cyan()
                .bold(),
            "|".cyan().bold(),
            line
        ));

        let padding = " ".repeat(line_num_width + 3 + self.span.column.saturating_sub(1));
        let underline = "^".repeat(self.span.length.max(1));
        snippet.push_str(&format!(
            " {} {}{}\n",
            " ".repeat(line_num_width + 1).cyan(),
            padding,
            underline.red().bold()
        ));

        Some(snippet)
    }

    fn suggestion_snippet(&self, source_code: &str) -> Option<String> {
        let suggestion = self.suggestion.as_ref()?;
        let lines: Vec<&str> = source_code.lines().collect();

        if suggestion.span.line == 0 || suggestion.span.line > lines.len() {
            return None;
        }

        let line_idx = suggestion.span.line - 1;
        let line = lines.get(line_idx)?;

        let mut snippet = String::new();
        let line_num_width = suggestion.span.line.to_string().len().max(2);

        let col = suggestion.span.column.saturating_sub(1);
        let before = line.get(..col)?;
        let after = line.get(col + suggestion.span.length..).unwrap_or("");
        let modified_line = format!("{}{}{}", before, &suggestion.replacement, after);

        snippet.push_str(&format!(
            " {} {}\n",
            format!("{:>width$}", suggestion.span.line, width = line_num_width)
                .cyan()
                .bold(),
            "| ".cyan().bold()
        ));
        snippet.push_str(&format!(
            " {} {}\n",
            " ".repeat(line_num_width + 1).cyan(),
            modified_line
        ));

        let padding = " ".repeat(line_num_width + 3 + col);
        let indicator = "+".repeat(suggestion.replacement.len());
        snippet.push_str(&format!(
            " {} {}{}\n",
            " ".repeat(line_num_width + 1).cyan(),
            padding,
            indicator.green().bold()
        ));

        Some(snippet)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

/// Accumulates diagnostics for one compilation and renders/exports them.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    info_count: usize,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            ErrorLevel::Error => self.error_count += 1,
            ErrorLevel::Warning => self.warning_count += 1,
            ErrorLevel::Info => self.info_count += 1,
            _ => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn emit_error(&mut self, code: &str, message: String, span: Span) {
        self.emit(Diagnostic::error(code, message, span));
    }

    /// True when codegen must not run (SPEC_FULL §7: any non-empty semantic
    /// error list aborts the pipeline before codegen).
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn print_all(&self, source_code: &str) {
        for diag in &self.diagnostics {
            eprintln!("{}", diag.format(source_code));
        }
    }

    pub fn print_summary(&self) {
        if self.error_count > 0 {
            eprintln!(
                "\n{}: {} error{} emitted",
                "error".red().bold(),
                self.error_count,
                if self.error_count == 1 { "" } else { "s" }
            );
        }
        if self.warning_count > 0 {
            eprintln!(
                "{}: {} warning{} emitted",
                "warning".yellow().bold(),
                self.warning_count,
                if self.warning_count == 1 { "" } else { "s" }
            );
        }
        if self.info_count > 0 {
            eprintln!(
                "{}: {} info message{} emitted",
                "info".blue().bold(),
                self.info_count,
                if self.info_count == 1 { "" } else { "s" }
            );
        }
    }

    /// Hand-rolled JSON export (no `serde` dependency; see DESIGN.md).
    pub fn to_json(&self) -> String {
        let mut json = String::from("{\"diagnostics\":[");

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                json.push(',');
            }

            let level_str = match diag.level {
                ErrorLevel::Error => "error",
                ErrorLevel::Warning => "warning",
                ErrorLevel::Info => "info",
                ErrorLevel::Note => "note",
                ErrorLevel::Help => "help",
            };

            json.push_str(&format!(
                "{{\"level\":\"{}\",\"code\":\"{}\",\"message\":\"{}\",\"file\":\"{}\",\"line\":{},\"column\":{},\"length\":{}",
                level_str,
                diag.code,
                diag.message.replace('"', "\\\""),
                diag.span.file,
                diag.span.line,
                diag.span.column,
                diag.span.length
            ));

            if !diag.notes.is_empty() {
                json.push_str(",\"notes\":[");
                for (j, note) in diag.notes.iter().enumerate() {
                    if j > 0 {
                        json.push(',');
                    }
                    json.push_str(&format!("\"{}\"", note.replace('"', "\\\"")));
                }
                json.push(']');
            }

            if let Some(help) = &diag.help {
                json.push_str(&format!(",\"help\":\"{}\"", help.replace('"', "\\\"")));
            }

            json.push('}');
        }

        json.push_str("]}");
        json
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
        self.info_count = 0;
    }
}

/// Convenience constructors, one per semantic-error category in SPEC_FULL §4.3.
impl DiagnosticEngine {
    pub fn type_mismatch(&mut self, expected: &str, found: &str, span: Span) {
        self.emit(
            Diagnostic::error(
                error_codes::TYPE_MISMATCH,
                "mismatched types".to_string(),
                span,
            )
            .with_note(format!("expected `{}`, found `{}`", expected, found)),
        );
    }

    pub fn undefined_name(&mut self, kind: &str, name: &str, span: Span, suggestions: Vec<String>) {
        let mut diag = Diagnostic::error(
            error_codes::UNDEFINED_NAME,
            format!("cannot find {} `{}` in this scope", kind, name),
            span,
        );
        if !suggestions.is_empty() {
            diag = diag.with_help(format!("did you mean `{}`?", suggestions.join("`, `")));
        }
        self.emit(diag);
    }

    pub fn no_such_member(&mut self, class: &str, kind: &str, name: &str, span: Span, suggestions: Vec<String>) {
        let mut diag = Diagnostic::error(
            error_codes::NO_SUCH_MEMBER,
            format!("no {} `{}` found on class `{}`", kind, name, class),
            span,
        );
        if !suggestions.is_empty() {
            diag = diag.with_help(format!("did you mean `{}`?", suggestions.join("`, `")));
        }
        self.emit(diag);
    }

    pub fn argument_count_mismatch(
        &mut self,
        fn_name: &str,
        expected: usize,
        found: usize,
        span: Span,
    ) {
        self.emit(
            Diagnostic::error(
                error_codes::ARGUMENT_COUNT,
                format!(
                    "this function takes {} argument{} but {} {} supplied",
                    expected,
                    if expected == 1 { "" } else { "s" },
                    found,
                    if found == 1 { "was" } else { "were" }
                ),
                span,
            )
            .with_note(format!("function `{}` defined here", fn_name)),
        );
    }

    pub fn non_exhaustive_return(&mut self, fn_name: &str, span: Span) {
        self.emit(Diagnostic::error(
            error_codes::NON_EXHAUSTIVE_RETURN,
            format!(
                "function `{}` has non-void return type but no return statement on all paths",
                fn_name
            ),
            span,
        ));
    }

    pub fn unreachable_code(&mut self, span: Span) {
        self.emit(Diagnostic::error(
            error_codes::UNREACHABLE_CODE,
            "unreachable statement".to_string(),
            span,
        ));
    }

    pub fn duplicate_declaration(&mut self, kind: &str, name: &str, span: Span) {
        self.emit(Diagnostic::error(
            error_codes::DUPLICATE_DECLARATION,
            format!("duplicate {} `{}`", kind, name),
            span,
        ));
    }

    pub fn generic_arity_mismatch(&mut self, base: &str, expected: usize, found: usize, span: Span) {
        self.emit(Diagnostic::error(
            error_codes::GENERIC_ARITY,
            format!(
                "`{}` expects {} generic argument{} but {} {} supplied",
                base,
                expected,
                if expected == 1 { "" } else { "s" },
                found,
                if found == 1 { "was" } else { "were" }
            ),
            span,
        ));
    }

    pub fn cyclic_inheritance(&mut self, class: &str, span: Span) {
        self.emit(Diagnostic::error(
            error_codes::CYCLIC_INHERITANCE,
            format!("cyclic inheritance involving class `{}`", class),
            span,
        ));
    }

    pub fn division_by_literal_zero(&mut self, span: Span) {
        self.emit(Diagnostic::error(
            error_codes::DIVISION_BY_ZERO,
            "division or modulo by literal zero".to_string(),
            span,
        ));
    }

    pub fn private_access(&mut self, kind: &str, name: &str, owner: &str, span: Span) {
        self.emit(Diagnostic::error(
            error_codes::PRIVATE_ACCESS,
            format!("{} `{}` is private to class `{}`", kind, name, owner),
            span,
        ));
    }
}

/// Stable diagnostic codes, grouped by numeric range per category
/// (SPEC_FULL §10.1).
pub mod error_codes {
    // Lex/parse errors (E0001-E0099)
    pub const LEX_ERROR: &str = "E0001";
    pub const UNEXPECTED_TOKEN: &str = "E0002";
    pub const UNEXPECTED_EOF: &str = "E0003";
    pub const INVALID_LITERAL: &str = "E0004";

    // Type errors (E0100-E0299)
    pub const TYPE_MISMATCH: &str = "E0101";
    pub const GENERIC_ARITY: &str = "E0102";
    pub const DIVISION_BY_ZERO: &str = "E0103";

    // Name resolution (E0300-E0399)
    pub const UNDEFINED_NAME: &str = "E0301";
    pub const NO_SUCH_MEMBER: &str = "E0302";
    pub const DUPLICATE_DECLARATION: &str = "E0303";
    pub const PRIVATE_ACCESS: &str = "E0304";
    pub const CYCLIC_INHERITANCE: &str = "E0305";
    pub const ARGUMENT_COUNT: &str = "E0306";

    // Control-flow errors (E0400-E0499)
    pub const NON_EXHAUSTIVE_RETURN: &str = "E0401";
    pub const UNREACHABLE_CODE: &str = "E0402";
    pub const BREAK_OUTSIDE_LOOP: &str = "E0403";
    pub const CONTINUE_OUTSIDE_LOOP: &str = "E0404";
    pub const SELF_OUTSIDE_METHOD: &str = "E0405";
    pub const NOT_ITERABLE: &str = "E0406";
    pub const STATIC_METHOD_MISUSE: &str = "E0407";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_location_and_note() {
        let source = "int main() {\n    int x = add(1, \"two\");\n    return 0;\n}";
        let span = Span::new("test.sl".to_string(), 2, 17, 5);
        let diag = Diagnostic::error(
            error_codes::TYPE_MISMATCH,
            "mismatched types".to_string(),
            span,
        )
        .with_note("expected `int`, found `string`".to_string());

        let formatted = diag.format(source);
        assert!(formatted.contains("error[E0101]"));
        assert!(formatted.contains("mismatched types"));
        assert!(formatted.contains("test.sl:2:17"));
    }

    #[test]
    fn engine_counts_errors_only() {
        let mut engine = DiagnosticEngine::new();
        assert!(!engine.has_errors());
        engine.type_mismatch("int", "string", Span::unknown());
        assert!(engine.has_errors());
        assert_eq!(engine.error_count(), 1);
    }

    #[test]
    fn to_json_escapes_quotes() {
        let mut engine = DiagnosticEngine::new();
        engine.emit_error("E0999", "bad \"quoted\" name".to_string(), Span::unknown());
        let json = engine.to_json();
        assert!(json.contains("bad \\\"quoted\\\" name"));
    }
}

/// "Did you mean?" fuzzy matching over in-scope names.
pub mod fuzzy {
    use strsim::jaro_winkler;

    pub fn find_similar_names(
        target: &str,
        candidates: &[String],
        threshold: f64,
        max_suggestions: usize,
    ) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = candidates
            .iter()
            .map(|candidate| (candidate.clone(), jaro_winkler(target, candidate)))
            .filter(|(_, score)| *score > threshold)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(max_suggestions)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn find_similar_members(target: &str, candidates: &[String]) -> Vec<String> {
        find_similar_names(target, candidates, 0.7, 3)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn suggests_close_misspelling() {
            let candidates = vec!["length".to_string(), "push".to_string(), "pop".to_string()];
            let suggestions = find_similar_members("lenght", &candidates);
            assert_eq!(suggestions.first(), Some(&"length".to_string()));
        }
    }
}
