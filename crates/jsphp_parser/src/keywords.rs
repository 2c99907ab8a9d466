//! Keyword dispatch.
//!
//! Each control keyword maps to the handler that parses what follows it,
//! inside the scope of the block the keyword opens. Keywords missing from
//! the table are generic: an optional parenthesized header, then a body.

use crate::parser::Parser;
use jsphp_ast::node::Block;
use jsphp_diagnostics::Result;

/// Whether a keyword takes a parenthesized header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderPolicy {
    Required,
    Optional,
    Forbidden,
}

pub(crate) type KeywordHandler = fn(&mut Parser, &mut Block) -> Result<()>;

static KEYWORD_TABLE: &[(&str, KeywordHandler)] = &[
    ("return", trailing_value),
    ("break", trailing_value),
    ("continue", trailing_value),
    ("throw", trailing_value),
    ("case", case_label),
    ("default", default_label),
    ("if", header_required),
    ("while", header_required),
    ("for", header_required),
    ("switch", header_required),
    ("catch", header_optional),
    ("else", header_forbidden),
    ("try", header_forbidden),
    ("finally", header_forbidden),
    ("do", do_while),
];

/// The handler for `keyword`, falling back to the generic one.
pub(crate) fn handler_for(keyword: &str) -> KeywordHandler {
    KEYWORD_TABLE
        .iter()
        .find(|(name, _)| *name == keyword)
        .map_or(header_optional as KeywordHandler, |&(_, handler)| handler)
}

fn trailing_value(parser: &mut Parser, block: &mut Block) -> Result<()> {
    parser.parse_trailing_value(block)
}

fn case_label(parser: &mut Parser, block: &mut Block) -> Result<()> {
    parser.parse_case_label(block)
}

fn default_label(parser: &mut Parser, block: &mut Block) -> Result<()> {
    parser.parse_default_label(block)
}

fn header_required(parser: &mut Parser, block: &mut Block) -> Result<()> {
    parser.parse_header(block, HeaderPolicy::Required)?;
    parser.parse_body(block)
}

fn header_optional(parser: &mut Parser, block: &mut Block) -> Result<()> {
    parser.parse_header(block, HeaderPolicy::Optional)?;
    parser.parse_body(block)
}

fn header_forbidden(parser: &mut Parser, block: &mut Block) -> Result<()> {
    parser.parse_header(block, HeaderPolicy::Forbidden)?;
    parser.parse_body(block)
}

fn do_while(parser: &mut Parser, block: &mut Block) -> Result<()> {
    header_forbidden(parser, block)?;
    parser.parse_do_condition(block)
}
