//! A lookahead buffer over the scanner.
//!
//! Neutral tokens (comments, newlines) are dropped here, so the parser only
//! ever sees meaningful tokens and can peek any distance ahead.

use crate::scanner::Scanner;
use crate::token::Token;
use jsphp_ast::syntax_kind::TokenKind;
use jsphp_core::text::{SourceLocation, TextSpan};
use jsphp_diagnostics::Result;
use std::collections::VecDeque;

pub struct TokenStream {
    scanner: Scanner,
    buffer: VecDeque<Token>,
    /// The scanner reported its end; nothing more will be buffered.
    exhausted: bool,
    /// Span of the last consumed token.
    last_span: TextSpan,
    /// A newline was skipped since the last buffered token.
    pending_newline: bool,
}

impl TokenStream {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            buffer: VecDeque::new(),
            exhausted: false,
            last_span: TextSpan::default(),
            pending_newline: false,
        }
    }

    /// Buffer meaningful tokens until `count` are available or input ends.
    fn fill(&mut self, count: usize) -> Result<()> {
        while !self.exhausted && self.buffer.len() < count {
            match self.scanner.scan_token()? {
                Some(token) if token.is_neutral() => {
                    if token.kind == TokenKind::Newline || token.text.contains('\n') {
                        self.pending_newline = true;
                    }
                }
                Some(mut token) => {
                    token.newline_before = std::mem::take(&mut self.pending_newline);
                    log::trace!("token {} at {:?}", token.describe(), token.span);
                    self.buffer.push_back(token);
                }
                None => self.exhausted = true,
            }
        }
        Ok(())
    }

    /// The meaningful token `k` positions ahead (0 = next). Does not consume.
    pub fn peek(&mut self, k: usize) -> Result<Option<&Token>> {
        self.fill(k + 1)?;
        Ok(self.buffer.get(k))
    }

    /// Remove and return the next meaningful token.
    pub fn consume(&mut self) -> Result<Option<Token>> {
        self.fill(1)?;
        let token = self.buffer.pop_front();
        if let Some(token) = &token {
            self.last_span = token.span;
        }
        Ok(token)
    }

    /// Consume the next token, discarding it.
    pub fn skip(&mut self) -> Result<()> {
        self.consume().map(|_| ())
    }

    /// Whether no meaningful token remains.
    pub fn at_end(&mut self) -> Result<bool> {
        Ok(self.peek(0)?.is_none())
    }

    /// Span of the most recently consumed token.
    pub fn last_span(&self) -> TextSpan {
        self.last_span
    }

    pub fn end_span(&self) -> TextSpan {
        self.scanner.end_span()
    }

    pub fn locate(&self, span: TextSpan) -> SourceLocation {
        self.scanner.locate(span)
    }

    pub fn file_name(&self) -> &str {
        self.scanner.file_name()
    }

    pub fn source_text(&self) -> &str {
        self.scanner.text()
    }
}
