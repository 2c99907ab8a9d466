//! jsphp_compiler: Compiler orchestration.
//!
//! The one-shot entry points [`compile`] and [`parse`] handle a single
//! text. [`Program`] compiles a set of files, one parser per file, in
//! parallel.

use jsphp_diagnostics::{DiagnosticCollection, Result};
use jsphp_emitter::{EmitResult, Emitter};
use jsphp_options::CompilerOptions;
use rayon::prelude::*;

pub use jsphp_parser::ParsedUnit;

/// Parse `text` into its main block and scope table.
pub fn parse(text: &str, file_name: &str, options: &CompilerOptions) -> Result<ParsedUnit> {
    jsphp_parser::parse(file_name, text, options)
}

/// Compile `text` to PHP source.
pub fn compile(text: &str, file_name: &str, options: &CompilerOptions) -> Result<String> {
    let unit = parse(text, file_name, options)?;
    let result = Emitter::new(options).emit(file_name, &unit.root);
    log::debug!("compiled {} ({} bytes)", file_name, result.php_content.len());
    Ok(result.php_content)
}

/// A set of source files compiled with the same options.
pub struct Program {
    /// Compiler options.
    pub options: CompilerOptions,
    /// The root file names.
    pub root_files: Vec<String>,
    /// Source texts keyed by file name, in insertion order.
    source_files: Vec<(String, String)>,
}

impl Program {
    /// Create a new program from root files and options.
    pub fn new(root_files: Vec<String>, options: CompilerOptions) -> Self {
        Self {
            options,
            root_files,
            source_files: Vec::new(),
        }
    }

    /// Add a source file to the program.
    pub fn add_source(&mut self, file_name: String, source_text: String) {
        self.source_files.push((file_name, source_text));
    }

    /// Load all root files from disk.
    pub fn load_root_files(&mut self) -> std::io::Result<()> {
        for file in &self.root_files {
            let content = std::fs::read_to_string(file)?;
            self.source_files.push((file.clone(), content));
        }
        Ok(())
    }

    pub fn source_files(&self) -> &[(String, String)] {
        &self.source_files
    }

    /// Parse every file. Returns all diagnostics.
    pub fn check(&self) -> DiagnosticCollection {
        let errors: Vec<_> = self
            .source_files
            .par_iter()
            .filter_map(|(file_name, text)| parse(text, file_name, &self.options).err())
            .collect();

        let mut diagnostics = DiagnosticCollection::new();
        for error in errors {
            diagnostics.add(error);
        }
        diagnostics.sort();
        diagnostics
    }

    /// Compile every file, one result per file in insertion order.
    pub fn emit(&self) -> Vec<Result<EmitResult>> {
        let emitter = Emitter::new(&self.options);
        self.source_files
            .par_iter()
            .map(|(file_name, text)| {
                let unit = parse(text, file_name, &self.options)?;
                log::debug!("emitting {}", file_name);
                Ok(emitter.emit(file_name, &unit.root))
            })
            .collect()
    }

    /// The emitter used by [`Program::emit`], for writing its results.
    pub fn emitter(&self) -> Emitter {
        Emitter::new(&self.options)
    }
}
