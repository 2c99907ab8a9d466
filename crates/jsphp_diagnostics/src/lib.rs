//! jsphp_diagnostics: Compile errors and error reporting infrastructure.
//!
//! Every failure of the tokenizer or the parser is fatal for the current
//! compilation unit. A [`CompileError`] carries the taxonomy kind, a stable
//! numeric code, the rendered message and the resolved source location.
//! Message templates live in [`messages`], one constant per distinct
//! failure, each bound to its code and kind.

use jsphp_core::text::SourceLocation;
use std::fmt;

/// Result alias used by every compilation stage.
pub type Result<T> = std::result::Result<T, CompileError>;

/// The error taxonomy. Every [`CompileError`] belongs to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A user constant or variable starts with a prefix reserved for
    /// synthesized names.
    ReservedPrefixViolation,
    /// No tokenizer rule matched at the current position.
    UnrecognizedToken,
    /// The parser expected a specific token and got another.
    UnexpectedToken,
    /// A `(`, `[` or `{` group was never closed.
    UnterminatedGroup,
    /// An expression was required but none followed.
    MissingValue,
    /// A `?` was not followed by a complete `value : value` pair.
    MalformedTernary,
    /// The left-hand side of an assignment is not assignable.
    NonAssignableTarget,
    /// A keyword block is missing its header or colon.
    MalformedKeywordBlock,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ReservedPrefixViolation => "reserved prefix violation",
            ErrorKind::UnrecognizedToken => "unrecognized token",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::UnterminatedGroup => "unterminated group",
            ErrorKind::MissingValue => "missing value",
            ErrorKind::MalformedTernary => "malformed ternary",
            ErrorKind::NonAssignableTarget => "non-assignable target",
            ErrorKind::MalformedKeywordBlock => "malformed keyword block",
        };
        f.write_str(name)
    }
}

/// A message template with a code and kind.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The error code.
    pub code: u32,
    /// The taxonomy kind.
    pub kind: ErrorKind,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized compile error with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{location}: error E{code}: {message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub code: u32,
    pub message: String,
    pub location: SourceLocation,
}

impl CompileError {
    pub fn new(message: &DiagnosticMessage, args: &[&str], location: SourceLocation) -> Self {
        Self {
            kind: message.kind,
            code: message.code,
            message: format_message(message.message, args),
            location,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("jsphp::E{}", self.code)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let span = self.location.span;
        let label = miette::LabeledSpan::new_with_span(
            Some(self.message.clone()),
            miette::SourceSpan::new((span.start as usize).into(), span.length as usize),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Errors accumulated across the files of a multi-file program.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    errors: Vec<CompileError>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<CompileError> {
        self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Sort errors by file and position.
    pub fn sort(&mut self) {
        self.errors.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.span.start.cmp(&b.location.span.start))
        });
    }
}

// ============================================================================
// Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                kind: ErrorKind::$kind,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Tokenizer
    // ========================================================================
    pub const CONSTANTS_CANNOT_START_WITH_0: DiagnosticMessage = diag!(1, ReservedPrefixViolation, "Constants cannot start with {0}, this prefix is reserved for synthesized names.");
    pub const VARIABLES_CANNOT_START_WITH_0: DiagnosticMessage = diag!(1, ReservedPrefixViolation, "Variables cannot start with {0}, this prefix is reserved for synthesized names.");
    pub const UNRECOGNIZED_TOKEN_0: DiagnosticMessage = diag!(23, UnrecognizedToken, "Unrecognized token '{0}'.");

    // ========================================================================
    // Groups
    // ========================================================================
    pub const MISSING_CLOSE_PAREN: DiagnosticMessage = diag!(5, UnterminatedGroup, "Missing ) to match the ( opened here.");
    pub const MISSING_CLOSE_BRACKET: DiagnosticMessage = diag!(6, UnterminatedGroup, "Missing ] to match the [ opened here.");
    pub const MISSING_CLOSE_BRACE: DiagnosticMessage = diag!(7, UnterminatedGroup, "Missing } to match the { opened here.");

    // ========================================================================
    // Expressions
    // ========================================================================
    pub const UNEXPECTED_0: DiagnosticMessage = diag!(8, UnexpectedToken, "Unexpected {0}.");
    pub const UNEXPECTED_0_EXPECTED_1: DiagnosticMessage = diag!(8, UnexpectedToken, "Unexpected {0}, {1} expected.");
    pub const UNEXPECTED_END_OF_INPUT_EXPECTED_0: DiagnosticMessage = diag!(8, UnexpectedToken, "Unexpected end of input, {0} expected.");
    pub const NOT_ASSIGNABLE_0: DiagnosticMessage = diag!(9, NonAssignableTarget, "{0} is not assignable.");
    pub const MISSING_VALUE_AFTER_KEY_0: DiagnosticMessage = diag!(12, MissingValue, "Missing value after key {0}.");
    pub const VALUE_EXPECTED_AFTER_0: DiagnosticMessage = diag!(20, MissingValue, "Value expected after {0}.");

    // ========================================================================
    // Ternaries
    // ========================================================================
    pub const TERNARY_NOT_CLOSED_AFTER_QUESTION: DiagnosticMessage = diag!(14, MalformedTernary, "Ternary expression not properly closed after '?'.");
    pub const TERNARY_COLON_EXPECTED_BUT_0_GIVEN: DiagnosticMessage = diag!(15, MalformedTernary, "':' expected but {0} given.");
    pub const TERNARY_NOT_CLOSED_AFTER_COLON: DiagnosticMessage = diag!(16, MalformedTernary, "Ternary expression not properly closed after ':'.");

    // ========================================================================
    // Keyword blocks
    // ========================================================================
    pub const BLOCK_0_NEEDS_PARENTHESES: DiagnosticMessage = diag!(17, MalformedKeywordBlock, "'{0}' block needs parentheses.");
    pub const BLOCK_0_CANNOT_HAVE_PARENTHESES: DiagnosticMessage = diag!(18, MalformedKeywordBlock, "'{0}' block cannot have parentheses.");
    pub const CASE_MUST_BE_FOLLOWED_BY_VALUE_AND_COLON: DiagnosticMessage = diag!(21, MalformedKeywordBlock, "'case' must be followed by a value and a colon.");
    pub const DEFAULT_MUST_BE_FOLLOWED_BY_COLON: DiagnosticMessage = diag!(22, MalformedKeywordBlock, "'default' must be followed by a colon.");
}
