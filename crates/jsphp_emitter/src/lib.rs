//! jsphp_emitter: PHP output files.
//!
//! Coordinates output generation for one compilation unit:
//! 1. Print the main block to PHP text
//! 2. Prepend the definitions of the runtime helpers the text uses
//! 3. Compute the output path and write the file

pub mod prelude;

use jsphp_ast::node::Block;
use jsphp_options::CompilerOptions;
use jsphp_printer::{Helper, Printer, PrinterOptions};
use std::path::{Path, PathBuf};

/// The emitter produces output files from a parsed main block.
pub struct Emitter {
    /// Prepend the helper definitions.
    pub emit_helpers: bool,
    /// Start the output with `<?php`.
    pub php_open_tag: bool,
    /// Output directory override.
    pub out_dir: Option<PathBuf>,
    printer_options: PrinterOptions,
}

/// The result of emitting a source file.
pub struct EmitResult {
    /// The complete PHP text, prelude included.
    pub php_content: String,
    /// The helpers referenced by the printed code.
    pub helpers: Vec<Helper>,
    /// Output file paths.
    pub output_files: Vec<OutputFile>,
}

/// A file produced by the emitter.
#[derive(Debug, Clone)]
pub struct OutputFile {
    /// The output file path.
    pub path: PathBuf,
    /// The content of the file.
    pub text: String,
}

impl Emitter {
    pub fn new(options: &CompilerOptions) -> Self {
        Self {
            emit_helpers: options.emit_helpers,
            php_open_tag: options.php_open_tag,
            out_dir: options.out_dir.as_ref().map(PathBuf::from),
            printer_options: PrinterOptions::from(options),
        }
    }

    /// Emit the main block of `file_name` to PHP.
    pub fn emit(&self, file_name: &str, root: &Block) -> EmitResult {
        let mut printer = Printer::new(self.printer_options.clone());
        let body = printer.print_main(root);
        let helpers = printer.used_helpers();

        let mut php_content = String::with_capacity(body.len() + 64);
        if self.php_open_tag {
            php_content.push_str("<?php\n\n");
        }
        if self.emit_helpers && !helpers.is_empty() {
            php_content.push_str(&prelude::prelude(&helpers, &self.printer_options.helper_prefix));
            php_content.push('\n');
        }
        php_content.push_str(&body);

        let path = self.get_output_path(Path::new(file_name), ".php");
        let output_files = vec![OutputFile {
            path,
            text: php_content.clone(),
        }];

        EmitResult {
            php_content,
            helpers,
            output_files,
        }
    }

    /// Write output files to disk.
    pub fn write_output_files(&self, result: &EmitResult) -> std::io::Result<()> {
        for file in &result.output_files {
            if let Some(parent) = file.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&file.path, &file.text)?;
            log::info!("wrote {}", file.path.display());
        }
        Ok(())
    }

    fn get_output_path(&self, source: &Path, ext: &str) -> PathBuf {
        let stem = source.file_stem().unwrap_or_default();
        let base_dir = match &self.out_dir {
            Some(out_dir) => out_dir.clone(),
            None => source.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
        };
        base_dir.join(format!("{}{}", stem.to_string_lossy(), ext))
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(&CompilerOptions::default())
    }
}
