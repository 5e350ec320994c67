//! ilang compiler driver
//!
//! Command-line entry point. Runs the frontend, reports diagnostics and
//! writes x86-64 assembly. The process exits with status 1 on any failure.

mod config;

use clap::{Parser, Subcommand};
use config::{CompilerConfig, DiagnosticFormat};
use ilc_codegen::generate_assembly;
use ilc_common::{CompilerError, Diagnostics};
use ilc_frontend::{Frontend, Program};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ilc")]
#[command(about = "ilang compiler")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an ilang source file to x86-64 assembly
    Compile {
        /// Input ilang source file
        input: PathBuf,

        /// Output assembly file (defaults to the input with a .s extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Leave comments out of the generated assembly
        #[arg(long)]
        no_comments: bool,

        /// Name of the exported entry point
        #[arg(long)]
        entry: Option<String>,

        /// Diagnostic output format
        #[arg(long, value_enum)]
        diagnostics: Option<DiagnosticFormat>,
    },

    /// Run the semantic checks without generating code
    Check {
        /// Input ilang source file
        input: PathBuf,

        /// Diagnostic output format
        #[arg(long, value_enum)]
        diagnostics: Option<DiagnosticFormat>,
    },

    /// Print the token stream
    Tokens {
        /// Input ilang source file
        input: PathBuf,
    },

    /// Print the AST as JSON
    Ast {
        /// Input ilang source file
        input: PathBuf,

        /// Run the semantic passes first so bindings and types are filled in
        #[arg(long)]
        resolved: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            config,
            no_comments,
            entry,
            diagnostics,
        } => {
            let result = load_config(config.as_deref()).and_then(|mut config| {
                config.apply_overrides(entry, no_comments, diagnostics);
                compile_file(&input, output.as_deref(), &config)
            });
            if let Err(e) = result {
                eprintln!("Error compiling {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
        Commands::Check { input, diagnostics } => {
            if let Err(e) = check_file(&input, diagnostics.unwrap_or_default()) {
                eprintln!("Error checking {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
        Commands::Tokens { input } => {
            if let Err(e) = print_tokens(&input) {
                eprintln!("Error tokenizing {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
        Commands::Ast { input, resolved } => {
            if let Err(e) = print_ast(&input, resolved) {
                eprintln!("Error dumping AST of {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CompilerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            Ok(CompilerConfig::load(path)?)
        }
        None => Ok(CompilerConfig::default()),
    }
}

fn compile_file(
    input_path: &Path,
    output_path: Option<&Path>,
    config: &CompilerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut program = parse_file(input_path)?;
    analyze(&mut program, config.diagnostic_format)?;

    let asm = generate_assembly(&mut program, &config.generator_options()).map_err(CompilerError::from)?;

    let output_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_path.with_extension("s"));
    fs::write(&output_path, asm)?;
    log::info!("assembly written to {}", output_path.display());

    Ok(())
}

fn check_file(input_path: &Path, format: DiagnosticFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut program = parse_file(input_path)?;
    analyze(&mut program, format)?;
    println!("{}: {}", input_path.display(), Diagnostics::new().summary());
    Ok(())
}

fn print_tokens(input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(input_path)?;
    for token in Frontend::tokenize_source(&source, &input_path.display().to_string())? {
        println!("{}", token);
    }
    Ok(())
}

fn print_ast(input_path: &Path, resolved: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut program = parse_file(input_path)?;
    let diagnostics = if resolved {
        Frontend::analyze(&mut program)
    } else {
        Diagnostics::new()
    };

    println!("{}", serde_json::to_string_pretty(&program)?);

    if !diagnostics.is_empty() {
        diagnostics.print_diagnostics();
        return Err(diagnostics.summary().into());
    }
    Ok(())
}

fn parse_file(input_path: &Path) -> Result<Program, CompilerError> {
    let source = fs::read_to_string(input_path)?;
    log::info!("compiling {}", input_path.display());
    Frontend::parse_source(&source, &input_path.display().to_string())
}

/// Run the semantic passes and report their diagnostics. Code generation only
/// ever sees a program with an empty report.
fn analyze(program: &mut Program, format: DiagnosticFormat) -> Result<(), Box<dyn std::error::Error>> {
    let diagnostics = Frontend::analyze(program);
    if diagnostics.is_empty() {
        return Ok(());
    }

    match format {
        DiagnosticFormat::Text => diagnostics.print_diagnostics(),
        DiagnosticFormat::Json => println!("{}", serde_json::to_string_pretty(&diagnostics)?),
    }
    Err(diagnostics.summary().into())
}
