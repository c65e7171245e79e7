//! stacklatex CLI - Rewrite LaTeX for the STACK question type in Moodle

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use stacklatex::{
    diagnostics::{check_latex_with_catalog, format_diagnostics},
    transform_with_catalog, Catalog, CatalogError, TransformResult,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

/// `info` heading for the math environment listing
#[cfg(feature = "cli")]
const MATH_ENVIRONMENTS_HEADING: &str = r"Math environments (wrapped in \(...\) outside math):";

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "stacklatex")]
#[command(version)]
#[command(
    about = "Rewrite LaTeX into the dialect accepted by STACK questions in Moodle",
    long_about = None
)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Extend the built-in catalog with a JSON, YAML or TOML file
    #[arg(long)]
    catalog: Option<String>,

    /// Print the operation log to stderr
    #[arg(short, long)]
    log: bool,

    /// Quiet mode: suppress log and info output to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Use colored output
    #[arg(long, default_value_t = true)]
    color: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Check LaTeX for problems without writing output
    Check {
        /// Input file to check
        input: Option<String>,

        /// Extend the built-in catalog with a JSON, YAML or TOML file
        #[arg(long)]
        catalog: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Transform every .tex file of a directory
    Batch {
        /// Input directory or single file
        input: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        /// Extend the built-in catalog with a JSON, YAML or TOML file
        #[arg(long)]
        catalog: Option<String>,

        /// File extension for output files
        #[arg(short, long, default_value = "txt")]
        extension: String,
    },

    /// Show version and catalog contents
    Info {
        /// Extend the built-in catalog with a JSON, YAML or TOML file
        #[arg(long)]
        catalog: Option<String>,
    },
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Handle subcommands first
    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd);
    }

    let catalog = load_catalog_or_exit(cli.catalog.as_deref());
    let input = read_input(cli.input_file.as_deref())?;

    let result = transform_with_catalog(&input, &catalog);
    if !result.success {
        eprintln!("{}", paint("Error", "\x1b[31m", cli.color));
        eprintln!("  {}", result.error_message);
        std::process::exit(1);
    }

    if !cli.quiet {
        print_report(&result, cli.log, cli.color);
    }

    match cli.output {
        Some(path) => {
            let mut file = fs::File::create(&path)?;
            write!(file, "{}", result.transformed_text)?;
            if !cli.quiet {
                eprintln!("✓ Output written to: {}", path);
            }
        }
        None => {
            println!("{}", result.transformed_text);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands) -> io::Result<()> {
    match cmd {
        Commands::Check {
            input,
            catalog,
            no_color,
        } => {
            let catalog = load_catalog_or_exit(catalog.as_deref());
            let input = read_input(input.as_deref())?;
            let result = check_latex_with_catalog(&input, &catalog);
            println!("{}", format_diagnostics(&result, !no_color));

            // Exit with error code if there are errors
            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Batch {
            input,
            output_dir,
            catalog,
            extension,
        } => {
            let catalog = load_catalog_or_exit(catalog.as_deref());
            fs::create_dir_all(&output_dir)?;

            let input_path = Path::new(&input);
            let files: Vec<PathBuf> = if input_path.is_dir() {
                let mut files: Vec<PathBuf> = fs::read_dir(input_path)?
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("tex"))
                    .collect();
                files.sort();
                files
            } else {
                vec![input_path.to_path_buf()]
            };

            let mut success_count = 0;
            let mut error_count = 0;

            for file_path in files {
                let stem = file_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let output_path = Path::new(&output_dir).join(format!("{}.{}", stem, extension));

                let content = match fs::read_to_string(&file_path) {
                    Ok(content) => content,
                    Err(e) => {
                        eprintln!("✗ {} - read error: {}", file_path.display(), e);
                        error_count += 1;
                        continue;
                    }
                };

                let result = transform_with_catalog(&content, &catalog);
                if !result.success {
                    eprintln!("✗ {} - {}", file_path.display(), result.error_message);
                    error_count += 1;
                    continue;
                }

                match fs::write(&output_path, &result.transformed_text) {
                    Ok(_) => {
                        if result.info_message.is_empty() {
                            eprintln!("✓ {}", output_path.display());
                        } else {
                            eprintln!("✓ {} (HTML)", output_path.display());
                        }
                        success_count += 1;
                    }
                    Err(e) => {
                        eprintln!("✗ {} - write error: {}", output_path.display(), e);
                        error_count += 1;
                    }
                }
            }

            eprintln!(
                "\nBatch transform complete: {} succeeded, {} failed",
                success_count, error_count
            );

            if error_count > 0 {
                std::process::exit(1);
            }
        }

        Commands::Info { catalog } => {
            let catalog = load_catalog_or_exit(catalog.as_deref());

            println!("stacklatex - LaTeX for STACK questions in Moodle");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Custom commands (definitions added to a preamble):");
            for (name, command) in catalog.custom_commands() {
                if command.dependencies.is_empty() {
                    println!("  \\{}", name);
                } else {
                    println!("  \\{} (uses {})", name, command.dependencies.join(", "));
                }
            }
            println!();
            println!("Replaced commands:");
            for name in sorted(catalog.replacements().map(|(name, _)| name)) {
                println!("  \\{}", name);
            }
            println!();
            println!("Environments:");
            for name in sorted(catalog.environments().map(|(name, _)| name)) {
                println!("  {}", name);
            }
            println!();
            println!("{}", MATH_ENVIRONMENTS_HEADING);
            for name in sorted(catalog.math_environments()) {
                println!("  {}", name);
            }
            println!();
        }
    }

    Ok(())
}

/// Read a file, or stdin when no path is given
#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// The built-in catalog, extended by `path` if given. The format follows
/// the file extension.
#[cfg(feature = "cli")]
fn load_catalog(path: Option<&str>) -> Result<Catalog, CatalogError> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };
    let format = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let content = fs::read_to_string(path)?;
    Catalog::builtin_extended(&content, &format)
}

#[cfg(feature = "cli")]
fn load_catalog_or_exit(path: Option<&str>) -> Catalog {
    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            std::process::exit(2);
        }
    }
}

#[cfg(feature = "cli")]
fn sorted<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut names: Vec<&str> = names.collect();
    names.sort_unstable();
    names
}

#[cfg(feature = "cli")]
fn paint(text: &str, code: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Print the info message and, if requested, the operation log to stderr
#[cfg(feature = "cli")]
fn print_report(result: &TransformResult, show_log: bool, use_color: bool) {
    if !result.info_message.is_empty() {
        eprintln!("{}", paint(&result.info_message, "\x1b[33m", use_color));
    }
    if show_log && !result.operation_log.is_empty() {
        eprintln!("{}", paint("Operations:", "\x1b[36m", use_color));
        for line in result.operation_log.lines() {
            eprintln!("  {}", line);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install stacklatex --features cli");
    eprintln!("  stacklatex [OPTIONS] [INPUT_FILE]");
}
