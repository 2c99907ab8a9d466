//! The ordered pattern rules of the tokenizer.
//!
//! Rules are tried in declaration order and the first one that matches at
//! the current position wins, so keyword-like rules precede the generic
//! variable rule. Every pattern is anchored at the start of the input.

use jsphp_ast::syntax_kind::{TokenKind, KEYWORDS, OPERATORS};
use lazy_static::lazy_static;
use regex::Regex;

/// One tokenizer rule.
pub(crate) struct Rule {
    pub kind: TokenKind,
    pub pattern: Regex,
    /// The match must not run into an identifier character.
    pub whole_word: bool,
}

lazy_static! {
    pub(crate) static ref RULES: Vec<Rule> = vec![
        rule(TokenKind::Newline, r"\n", false),
        rule(TokenKind::Comment, r"//[^\n]*|/\*(?s:.*?)(?:\*/|\z)", false),
        rule(
            TokenKind::Constant,
            r"(?:null|undefined|NaN|Infinity|true|false|Math\.[A-Z][A-Z0-9_]*|_*[A-Z][A-Z0-9_]*)",
            true,
        ),
        rule(TokenKind::Function, "function", true),
        rule(TokenKind::Keyword, &word_alternation(KEYWORDS), true),
        rule(TokenKind::Lambda, "=>", false),
        rule(
            TokenKind::Number,
            r"(?:0[bB][01]+|0[oO][0-7]+|0[xX][0-9a-fA-F]+|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)",
            true,
        ),
        rule(TokenKind::String, r#"(?s:"(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*')"#, false),
        rule(TokenKind::Operator, &word_alternation(OPERATORS), true),
        rule(TokenKind::Variable, r"[\p{XID_Start}$_][\p{XID_Continue}$]*", false),
        rule(TokenKind::Punctuation, r"[(){}\[\],;:.]", false),
    ];
}

fn rule(kind: TokenKind, pattern: &str, whole_word: bool) -> Rule {
    let anchored = format!("^(?:{})", pattern);
    Rule {
        kind,
        pattern: Regex::new(&anchored).unwrap(),
        whole_word,
    }
}

/// Escape and join words longest first, so leftmost-first matching picks
/// `async` over `as`.
fn word_alternation(words: &[&str]) -> String {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    sorted
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

/// Identifier characters, for whole-word checks.
#[inline]
pub(crate) fn is_identifier_char(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphanumeric()
}

/// Whitespace skipped between tokens. Newlines are tokens.
#[inline]
pub(crate) fn is_skipped_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}')
}
