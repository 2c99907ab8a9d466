//! Token kinds and the operator/keyword tables used by the scanner and parser.

use std::fmt;

/// The closed set of token kinds produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Newline,
    /// Literal identifier: `true`, `null`, `INF`, `M_PI`, `E_ALL`...
    Constant,
    /// The `function` keyword.
    Function,
    /// Control keyword: `if`, `return`, `let`, `case`...
    Keyword,
    /// The `=>` lambda marker.
    Lambda,
    Number,
    String,
    Operator,
    Variable,
    /// One of `( ) { } [ ] , ; : .`
    Punctuation,
}

impl TokenKind {
    /// Neutral tokens never reach the parser.
    #[inline]
    pub fn is_neutral(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Newline)
    }

    /// Kinds that can stand alone as a terminal value.
    #[inline]
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::Constant | TokenKind::Number | TokenKind::String | TokenKind::Variable
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Newline => "newline",
            TokenKind::Constant => "constant",
            TokenKind::Function => "function",
            TokenKind::Keyword => "keyword",
            TokenKind::Lambda => "lambda",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
            TokenKind::Variable => "variable",
            TokenKind::Punctuation => "punctuation",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Control keywords recognized by the tokenizer. `function` has its own kind.
pub const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "do", "else", "enum", "export", "extends", "finally", "for", "if", "implements",
    "import", "interface", "let", "new", "package", "private", "protected", "public", "return",
    "static", "super", "switch", "throw", "try", "var", "while", "with", "yield",
];

/// Operators, longest first so that a linear scan finds the longest match.
pub const OPERATORS: &[&str] = &[
    "instanceof", "typeof", "delete", "void", ">>>=", "===", "!==", "**=", "<<=", ">>=", ">>>",
    "...", "++", "--", "&&", "||", "??", "==", "!=", "<=", ">=", "<<", ">>", "**", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "^=", "=", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^",
    "!", "~", "?",
];

/// Operators that assign to their left operand.
pub const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=",
];

/// Operators accepted in prefix position.
pub const PREFIX_OPERATORS: &[&str] = &["~", "!", "--", "++", "-", "+", "delete", "typeof", "void"];

/// Operators that can never take a left operand.
pub const PREFIX_ONLY_OPERATORS: &[&str] = &["~", "!", "delete", "typeof", "void", "..."];

/// Punctuation characters, each its own token.
pub const PUNCTUATION: &[char] = &['(', ')', '{', '}', '[', ']', ',', ';', ':', '.'];

#[inline]
pub fn is_assignment_operator(op: &str) -> bool {
    ASSIGNMENT_OPERATORS.contains(&op)
}

#[inline]
pub fn is_prefix_operator(op: &str) -> bool {
    PREFIX_OPERATORS.contains(&op)
}
