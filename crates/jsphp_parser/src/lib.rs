//! jsphp_parser: Recursive descent parser for the JavaScript-flavored source.
//!
//! Consumes the scanner's token stream and builds the AST rooted at an
//! implicit `main` block, resolving block-local declarations through a
//! parser-owned scope stack.

mod keywords;
mod parser;

pub use parser::{parse, ParsedUnit, Parser};
