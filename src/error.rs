// smps2bin - An SMPS2ASM music script assembler for Mega Drive sound drivers
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Error and warning types for the smps2bin assembler.
//!
//! Every diagnostic carries the [`Span`] of the source token it was raised
//! for, so the CLI can point at the offending label, mnemonic or argument.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// A source span representing a range in the source code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Error codes for the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Syntax errors (E001-E099)
    UnexpectedToken,
    ExpectedComma,

    // Symbol errors (E100-E199)
    DuplicateSymbol,
    UndefinedSymbol,

    // Encoding errors (E200-E299)
    UnknownInstruction,
    MissingOperand,
    ByteOverflow,
    UnsupportedInDriver,
    UnsupportedChannel,
    TrackBeforeSongStart,
    InvalidTempo,
    EncodingLengthMismatch,

    // Song header errors (E300-E399)
    MissingSongHeader,
    HeaderNotEvaluable,
    UnsupportedFormatVersion,
    InvalidDriver,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "E001",
            ErrorCode::ExpectedComma => "E002",

            ErrorCode::DuplicateSymbol => "E100",
            ErrorCode::UndefinedSymbol => "E101",

            ErrorCode::UnknownInstruction => "E200",
            ErrorCode::MissingOperand => "E201",
            ErrorCode::ByteOverflow => "E202",
            ErrorCode::UnsupportedInDriver => "E203",
            ErrorCode::UnsupportedChannel => "E204",
            ErrorCode::TrackBeforeSongStart => "E205",
            ErrorCode::InvalidTempo => "E206",
            ErrorCode::EncodingLengthMismatch => "E207",

            ErrorCode::MissingSongHeader => "E300",
            ErrorCode::HeaderNotEvaluable => "E301",
            ErrorCode::UnsupportedFormatVersion => "E302",
            ErrorCode::InvalidDriver => "E303",
        }
    }
}

/// An assembler error with source location.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

/// Result type for assembler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Warning codes. Warnings never stop an assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// Sonic 3 tempo modifier of 0 has no exact equivalent in older drivers.
    ApproximateTempo,
    /// TL bits of a voice disagree with its algorithm.
    TlMaskMismatch,
    /// Instruction was translated to an older equivalent or dropped.
    Degraded,
    /// Note fill length depends on the tempo divider in the target driver.
    NoteFillTiming,
    /// `smpsPlaySound` only plays sound effects in Flamewing's driver.
    PlaySoundSfxOnly,
}

impl WarningCode {
    /// Get the code string for this warning.
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::ApproximateTempo => "W001",
            WarningCode::TlMaskMismatch => "W002",
            WarningCode::Degraded => "W003",
            WarningCode::NoteFillTiming => "W004",
            WarningCode::PlaySoundSfxOnly => "W005",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A non-fatal diagnostic produced while encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileWarning {
    /// The warning code.
    pub code: WarningCode,
    /// The warning message.
    pub message: String,
    /// The source span the warning refers to.
    pub span: Span,
}

impl CompileWarning {
    /// Create a new warning.
    pub fn new(code: WarningCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Source location with line and column information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl SourceLocation {
    /// Calculate line and column from a byte offset in source code.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];

        let line = before.chars().filter(|&c| c == '\n').count() + 1;
        let last_newline = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[last_newline..].chars().count() + 1;

        Self { line, column }
    }
}

/// Rendering options for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colours.
    pub color: bool,
}

#[allow(clippy::too_many_arguments)]
fn render(
    kind: ReportKind<'_>,
    code: &str,
    message: &str,
    span: Span,
    hint: Option<&str>,
    source: &str,
    filename: &str,
    options: RenderOptions,
) -> String {
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    let color = if matches!(kind, ReportKind::Error) {
        Color::Red
    } else {
        Color::Yellow
    };

    let mut builder = Report::<(&str, Range<usize>)>::build(kind, filename, start)
        .with_config(Config::default().with_color(options.color))
        .with_code(code)
        .with_message(message)
        .with_label(
            Label::new((filename, start..end))
                .with_message(message)
                .with_color(color),
        );
    if let Some(hint) = hint {
        builder = builder.with_help(hint);
    }

    let mut buffer = Vec::new();
    if builder
        .finish()
        .write((filename, Source::from(source)), &mut buffer)
        .is_err()
    {
        // Fall back to a one-line rendering if the report cannot be drawn.
        let loc = SourceLocation::from_offset(source, start);
        return format!(
            "{}[{}]: {}\n  --> {}:{}:{}\n",
            if matches!(kind, ReportKind::Error) { "error" } else { "warning" },
            code,
            message,
            filename,
            loc.line,
            loc.column
        );
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Format an error with source context.
pub fn format_error(
    error: &CompileError,
    source: &str,
    filename: Option<&str>,
    options: RenderOptions,
) -> String {
    render(
        ReportKind::Error,
        error.code_str(),
        &error.message,
        error.span,
        error.hint.as_deref(),
        source,
        filename.unwrap_or("<input>"),
        options,
    )
}

/// Format a warning with source context.
pub fn format_warning(
    warning: &CompileWarning,
    source: &str,
    filename: Option<&str>,
    options: RenderOptions,
) -> String {
    render(
        ReportKind::Warning,
        warning.code.code(),
        &warning.message,
        warning.span,
        None,
        source,
        filename.unwrap_or("<input>"),
        options,
    )
}

/// A collection of compile errors.
#[derive(Debug, Default)]
pub struct Errors {
    errors: Vec<CompileError>,
}

impl Errors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first recorded error, if any.
    pub fn first(&self) -> Option<&CompileError> {
        self.errors.first()
    }

    /// Get an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.errors.iter()
    }

    /// Convert into a vector of errors.
    pub fn into_vec(self) -> Vec<CompileError> {
        self.errors
    }
}

impl From<CompileError> for Errors {
    fn from(error: CompileError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for Errors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [only] => write!(f, "{}", only),
            [first, rest @ ..] => write!(f, "{} (and {} more)", first, rest.len()),
        }
    }
}

impl std::error::Error for Errors {}

impl IntoIterator for Errors {
    type Item = CompileError;
    type IntoIter = std::vec::IntoIter<CompileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
