//! jsphp_printer: AST to PHP text.
//!
//! Converts a parsed main block into PHP source. Access chains, calls on
//! chains and `typeof` are desugared into calls to runtime helpers; the
//! printer records which helpers the output references so the emitter can
//! prepend their definitions.

mod captures;
mod chain;
mod printer;

pub use printer::{Helper, Printer, PrinterOptions};
