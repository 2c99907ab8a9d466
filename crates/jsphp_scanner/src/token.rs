//! Tokens produced by the scanner.

use jsphp_ast::syntax_kind::{is_assignment_operator, TokenKind, PREFIX_ONLY_OPERATORS};
use jsphp_core::text::TextSpan;

/// A classified lexical unit. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The matched source text.
    pub text: String,
    /// The semantic value, when it differs in role from the raw text:
    /// translated constants (`INF`, `M_PI`), keyword and operator names.
    pub value: Option<String>,
    pub span: TextSpan,
    /// A newline separated this token from the previous meaningful one.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: TextSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            value: None,
            span,
            newline_before: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The semantic value, falling back to the raw text.
    #[inline]
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.text)
    }

    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.kind.is_neutral()
    }

    #[inline]
    pub fn is_value(&self) -> bool {
        self.kind.is_value()
    }

    /// Whether this is the punctuation character `c`.
    #[inline]
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punctuation && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }

    #[inline]
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.value() == op
    }

    #[inline]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value() == keyword
    }

    /// Whether this is one of the assignment operators (`=`, `+=`, ...).
    pub fn is_assignation(&self) -> bool {
        self.kind == TokenKind::Operator && is_assignment_operator(self.value())
    }

    /// Operators that cannot follow a value.
    pub fn expects_no_left_member(&self) -> bool {
        self.kind == TokenKind::Operator && PREFIX_ONLY_OPERATORS.contains(&self.value())
    }

    /// `kind text`, as used in "Unexpected ..." messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Punctuation | TokenKind::Operator | TokenKind::Lambda => {
                format!("'{}'", self.text)
            }
            TokenKind::Newline => "newline".to_string(),
            kind => format!("{} {}", kind, self.text),
        }
    }
}
