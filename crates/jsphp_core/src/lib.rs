//! jsphp_core: Core utilities for the jsphp compiler.
//!
//! Provides the source position types shared by the scanner, the parser
//! and the diagnostics: byte spans, line maps and resolved locations.

pub mod text;

// Re-export commonly used types
pub use text::{LineMap, SourceLocation, TextPos, TextSpan};
