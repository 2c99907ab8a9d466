//! jsphpc: The jsphp compiler CLI.
//!
//! Usage:
//!   jsphpc [options] [file...]
//!
//! Compiles each input file to a `.php` file next to it, or under
//! `--outDir`.

mod logger;

use clap::Parser as ClapParser;
use jsphp_compiler::Program;
use jsphp_diagnostics::CompileError;
use jsphp_options::{parse_config_file, CompilerOptions, ConfigFile};
use miette::{NamedSource, Report};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[derive(ClapParser, Debug)]
#[command(name = "jsphpc", about = "jsphp - compile JavaScript-flavored scripts to PHP", version)]
struct Cli {
    /// Script files to compile.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Path to jsphp.json.
    #[arg(short = 'p', long = "project")]
    project: Option<String>,

    /// Redirect output files to the directory.
    #[arg(long = "outDir")]
    out_dir: Option<String>,

    /// Do not prepend the runtime helper definitions.
    #[arg(long = "noHelpers")]
    no_helpers: bool,

    /// Start each output with a `<?php` tag.
    #[arg(long = "phpTag")]
    php_tag: bool,

    /// Reserved prefix for constants.
    #[arg(long = "constPrefix")]
    const_prefix: Option<String>,

    /// Reserved prefix for variables and helpers.
    #[arg(long = "varPrefix")]
    var_prefix: Option<String>,

    /// Print the parsed tree instead of compiling.
    #[arg(long)]
    ast: bool,

    /// Write the output to stdout instead of files.
    #[arg(long)]
    stdout: bool,

    /// More log output (repeatable).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors.
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);
    let exit_code = run_compile(&cli);
    process::exit(exit_code);
}

fn run_compile(cli: &Cli) -> i32 {
    let start = Instant::now();

    let (files, config) = match resolve_input_files(cli) {
        Ok(resolved) => resolved,
        Err(message) => {
            print_error(&message);
            return 1;
        }
    };

    if files.is_empty() {
        print_error("No input files found.");
        return 1;
    }

    let options = build_options(cli, config);
    let mut program = Program::new(files, options);
    if let Err(e) = program.load_root_files() {
        print_error(&format!("Failed to load source files: {}", e));
        return 1;
    }

    if cli.ast {
        return print_trees(&program);
    }

    let results = program.emit();
    let mut error_count = 0;
    for ((file_name, text), result) in program.source_files().iter().zip(&results) {
        if let Err(error) = result {
            report_error(file_name, text, error);
            error_count += 1;
        }
    }
    if error_count > 0 {
        eprintln!("\nFound {} error{}.", error_count, if error_count == 1 { "" } else { "s" });
        return 2;
    }

    let emitter = program.emitter();
    for result in results.into_iter().flatten() {
        if cli.stdout {
            print!("{}", result.php_content);
        } else if let Err(e) = emitter.write_output_files(&result) {
            print_error(&format!("Failed to write output: {}", e));
            return 1;
        }
    }

    log::info!("Compilation completed in {:.2}s.", start.elapsed().as_secs_f64());
    0
}

fn print_trees(program: &Program) -> i32 {
    let mut failed = false;
    for (file_name, text) in program.source_files() {
        match jsphp_compiler::parse(text, file_name, &program.options) {
            Ok(unit) => println!("{}:\n{:#?}", file_name, unit.root),
            Err(error) => {
                report_error(file_name, text, &error);
                failed = true;
            }
        }
    }
    if failed {
        2
    } else {
        0
    }
}

/// CLI flags override the config file.
fn build_options(cli: &Cli, config: Option<ConfigFile>) -> CompilerOptions {
    let mut options = config.and_then(|c| c.compiler_options).unwrap_or_default();
    if let Some(prefix) = &cli.const_prefix {
        options.const_prefix = prefix.clone();
    }
    if let Some(prefix) = &cli.var_prefix {
        options.var_prefix = prefix.clone();
    }
    if cli.out_dir.is_some() {
        options.out_dir = cli.out_dir.clone();
    }
    if cli.no_helpers {
        options.emit_helpers = false;
    }
    if cli.php_tag {
        options.php_open_tag = true;
    }
    options
}

fn resolve_input_files(cli: &Cli) -> Result<(Vec<String>, Option<ConfigFile>), String> {
    if let Some(project) = &cli.project {
        let (files, config) = load_files_from_config(project)
            .map_err(|e| format!("Failed to read project '{}': {}", project, e))?;
        // Files named on the command line win over the config's list.
        if cli.files.is_empty() {
            return Ok((files, Some(config)));
        }
        return Ok((cli.files.clone(), Some(config)));
    }
    if !cli.files.is_empty() {
        return Ok((cli.files.clone(), None));
    }
    if Path::new("jsphp.json").exists() {
        let (files, config) =
            load_files_from_config("jsphp.json").map_err(|e| format!("Failed to read jsphp.json: {}", e))?;
        return Ok((files, Some(config)));
    }
    Ok((vec![], None))
}

/// The config's `files`, relative to the config file's directory.
fn load_files_from_config(path: &str) -> Result<(Vec<String>, ConfigFile), jsphp_options::ConfigError> {
    let config = parse_config_file(path)?;
    let root_dir = Path::new(path).parent().map(Path::to_path_buf).unwrap_or_default();
    let files = config
        .files
        .iter()
        .flatten()
        .map(|f| PathBuf::from(&root_dir).join(f).to_string_lossy().to_string())
        .collect();
    Ok((files, config))
}

fn report_error(file_name: &str, text: &str, error: &CompileError) {
    let report = Report::new(error.clone()).with_source_code(NamedSource::new(file_name, text.to_string()));
    if std::io::stderr().is_terminal() {
        eprintln!("{:?}", report);
    } else {
        eprintln!("{}", error);
    }
}

fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("\x1b[1m\x1b[31merror\x1b[0m: {}", msg);
    } else {
        eprintln!("error: {}", msg);
    }
}
