//! jsphp_scanner: Tokenizer for the JavaScript-flavored source language.
//!
//! The [`Scanner`] turns source text into a lazy sequence of [`Token`]s by
//! trying an ordered list of pattern rules at the current position. The
//! [`TokenStream`] wraps it with an unbounded lookahead buffer that hides
//! comments and newlines from the parser.

mod lookahead;
mod rules;
mod scanner;
mod token;

pub use lookahead::TokenStream;
pub use scanner::Scanner;
pub use token::Token;
