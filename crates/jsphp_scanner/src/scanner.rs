//! The tokenizer.
//!
//! Converts source text into tokens by trying the ordered rules of
//! [`crate::rules`] at the current position. Constants are translated to
//! their host spelling and both constant and variable names are checked
//! against the reserved prefixes.

use crate::rules::{is_identifier_char, is_skipped_whitespace, RULES};
use crate::token::Token;
use jsphp_ast::syntax_kind::TokenKind;
use jsphp_core::text::{LineMap, SourceLocation, TextPos, TextSpan};
use jsphp_diagnostics::{messages, CompileError, DiagnosticMessage, Result};
use jsphp_options::ReservedPrefixes;

/// The scanner converts source text into tokens, neutral ones included.
pub struct Scanner {
    file_name: String,
    /// The source text, line endings normalized to `\n`.
    text: String,
    line_map: LineMap,
    /// Current byte position in the text.
    pos: usize,
    prefixes: ReservedPrefixes,
    /// Set once an error has been returned; the sequence is fused after it.
    failed: bool,
}

impl Scanner {
    pub fn new(file_name: &str, source: &str, prefixes: ReservedPrefixes) -> Self {
        let text = source.replace("\r\n", "\n").replace('\r', "\n");
        let line_map = LineMap::new(&text);
        Self {
            file_name: file_name.to_string(),
            text,
            line_map,
            pos: 0,
            prefixes,
            failed: false,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The normalized source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolve a span to a file/line/column location.
    pub fn locate(&self, span: TextSpan) -> SourceLocation {
        self.line_map.locate(&self.text, &self.file_name, span)
    }

    /// An empty span at the end of the input.
    pub fn end_span(&self) -> TextSpan {
        TextSpan::empty(self.text.len() as TextPos)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        let skipped = rest
            .char_indices()
            .find(|&(_, c)| !is_skipped_whitespace(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += skipped;
    }

    /// Scan the next token, neutral tokens included. `Ok(None)` at the end.
    pub fn scan_token(&mut self) -> Result<Option<Token>> {
        if self.failed {
            return Ok(None);
        }
        self.skip_whitespace();
        if self.pos >= self.text.len() {
            return Ok(None);
        }

        let rest = &self.text[self.pos..];
        let matched = RULES.iter().find_map(|rule| {
            let m = rule.pattern.find(rest)?;
            if m.is_empty() {
                return None;
            }
            if rule.whole_word
                && m.as_str().ends_with(is_identifier_char)
                && rest[m.end()..].starts_with(is_identifier_char)
            {
                return None;
            }
            Some((rule.kind, m.end()))
        });

        let Some((kind, len)) = matched else {
            let found: String = rest.chars().next().into_iter().collect();
            let span = TextSpan::new(self.pos as TextPos, found.len() as TextPos);
            return Err(self.fail(&messages::UNRECOGNIZED_TOKEN_0, &[&found], span));
        };

        let start = self.pos;
        let raw = self.text[start..start + len].to_string();
        let span = TextSpan::new(start as TextPos, len as TextPos);
        let token = match kind {
            TokenKind::Constant => self.scan_constant(raw, span)?,
            TokenKind::Variable => self.scan_variable(raw, span)?,
            kind => Token::new(kind, raw.clone(), span).with_value(raw),
        };
        self.pos += len;
        Ok(Some(token))
    }

    fn scan_constant(&mut self, raw: String, span: TextSpan) -> Result<Token> {
        if has_reserved_prefix(&raw, &self.prefixes.constant) {
            let prefix = self.prefixes.constant.clone();
            return Err(self.fail(&messages::CONSTANTS_CANNOT_START_WITH_0, &[&prefix], span));
        }
        let value = match raw.as_str() {
            "Infinity" => "INF".to_string(),
            "NaN" => "NAN".to_string(),
            "undefined" => "null".to_string(),
            other => match other.strip_prefix("Math.") {
                Some(name) => format!("M_{}", name),
                None => other.to_string(),
            },
        };
        Ok(Token::new(TokenKind::Constant, raw, span).with_value(value))
    }

    fn scan_variable(&mut self, raw: String, span: TextSpan) -> Result<Token> {
        if has_reserved_prefix(&raw, &self.prefixes.variable) {
            let prefix = self.prefixes.variable.clone();
            return Err(self.fail(&messages::VARIABLES_CANNOT_START_WITH_0, &[&prefix], span));
        }
        // Names the constant rule declined (mixed case) still may not
        // collide with synthesized constants.
        if has_reserved_prefix(&raw, &self.prefixes.constant) {
            let prefix = self.prefixes.constant.clone();
            return Err(self.fail(&messages::CONSTANTS_CANNOT_START_WITH_0, &[&prefix], span));
        }
        Ok(Token::new(TokenKind::Variable, raw.clone(), span).with_value(raw))
    }

    fn fail(&mut self, message: &DiagnosticMessage, args: &[&str], span: TextSpan) -> CompileError {
        self.failed = true;
        CompileError::new(message, args, self.locate(span))
    }
}

/// Exact prefix test. An empty prefix reserves nothing.
fn has_reserved_prefix(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}

impl Iterator for Scanner {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan_token().transpose()
    }
}
