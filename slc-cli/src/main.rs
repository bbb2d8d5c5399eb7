use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "slc")]
#[command(version = "0.1.0")]
#[command(about = "Transpiles SL source to a single C translation unit", long_about = None)]
struct Cli {
    /// Input .sl file (ignored when a subcommand is given)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output .c file (defaults to the input's stem with a .c extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Emit #line directives pointing back at the SL source
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lex+parse+analyze only; print diagnostics and exit nonzero on error
    Check {
        /// Input .sl file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { input }) => check(&input),
        None => {
            let input = cli
                .input
                .ok_or_else(|| anyhow::anyhow!("an input file is required (try `slc --help`)"))?;
            compile(&input, cli.output, cli.debug)
        }
    }
}

fn read_source(input: &Path) -> Result<String> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    if source.trim().is_empty() {
        log::warn!("{}: input file is empty", input.display());
    }
    Ok(source)
}

fn compile(input: &Path, output: Option<PathBuf>, debug: bool) -> Result<()> {
    log::info!("reading {}", input.display());
    let source = read_source(input)?;

    let source_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("input.sl")
        .to_string();

    let program = slc_parser::Parser::parse_program(&source).map_err(|e| {
        let diag = e.to_diagnostic(&source_name);
        eprintln!("{}", diag.format(&source));
        anyhow::anyhow!("parse error: {e}")
    })?;
    log::info!("parsed {} successfully", source_name);

    let analyzed = slc_analyzer::analyze(program)
        .with_context(|| "internal analyzer error".to_string())?;
    log::info!(
        "analysis complete: {} error(s)",
        analyzed.diagnostics.error_count()
    );

    if analyzed.diagnostics.has_diagnostics() {
        analyzed.diagnostics.print_all(&source);
        analyzed.diagnostics.print_summary();
    }
    if analyzed.diagnostics.has_errors() {
        bail!("aborting due to semantic errors");
    }

    let c_source = slc_codegen::generate(analyzed, debug, source_name)
        .with_context(|| "internal codegen error".to_string())?;
    log::info!("codegen complete: {} bytes", c_source.len());

    let output_path = output.unwrap_or_else(|| input.with_extension("c"));
    std::fs::write(&output_path, c_source)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    log::info!("wrote {}", output_path.display());

    println!("compiled {} -> {}", input.display(), output_path.display());
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    log::info!("checking {}", input.display());
    let source = read_source(input)?;
    let source_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("input.sl")
        .to_string();

    let program = match slc_parser::Parser::parse_program(&source) {
        Ok(p) => p,
        Err(e) => {
            let diag = e.to_diagnostic(&source_name);
            eprintln!("{}", diag.format(&source));
            std::process::exit(1);
        }
    };

    let analyzed = slc_analyzer::analyze(program)
        .with_context(|| "internal analyzer error".to_string())?;

    if analyzed.diagnostics.has_diagnostics() {
        analyzed.diagnostics.print_all(&source);
        analyzed.diagnostics.print_summary();
    }

    if analyzed.diagnostics.has_errors() {
        std::process::exit(1);
    }

    println!("{}: OK", input.display());
    Ok(())
}
