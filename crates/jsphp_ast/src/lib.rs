//! jsphp_ast: Token kinds, AST node definitions and scopes.
//!
//! This crate defines the data model shared by the scanner, the parser and
//! the printer:
//! - [`TokenKind`] and the keyword/operator tables
//! - the [`Node`] tree produced by the parser
//! - the [`ScopeTable`] recording block-local declarations
//! - a [`visitor`] for read-only traversal

pub mod node;
pub mod scope;
pub mod syntax_kind;
pub mod visitor;

pub use node::*;
pub use scope::{Scope, ScopeId, ScopeTable};
pub use syntax_kind::TokenKind;
