mod logging;
mod settings;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use jsonsample_core::Error as DeclarationError;
use jsonsample_generate::{SynthesisEngine, SynthesisError, SynthesisOptions, SynthesisResult};
use logging::{LoggingError, init_logging};
use settings::{Settings, SettingsError, encode_settings, load_settings};
use thiserror::Error;

const SAMPLE: &str = include_str!("../assets/sample.go");

#[derive(Debug, Error)]
enum CliError {
    #[error("syntax error: {0}")]
    Syntax(DeclarationError),
    #[error("error parsing fields: {0}")]
    Fields(DeclarationError),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("failed to read {source_name}: {error}")]
    Input {
        source_name: String,
        error: std::io::Error,
    },
    #[error("failed to write report {path}: {error}")]
    Report { path: PathBuf, error: String },
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
}

impl From<SynthesisError> for CliError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Declaration(err @ DeclarationError::Syntax { .. }) => {
                CliError::Syntax(err)
            }
            SynthesisError::Declaration(err) => CliError::Fields(err),
            SynthesisError::Resolution(message) => CliError::Internal(message),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "jsonsample", version, about = "Sample JSON documents from Go struct declarations")]
struct Cli {
    /// Settings file (defaults to ./jsonsample.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize a sample document for every struct declaration in FILE.
    Generate(GenerateArgs),
    /// Print the built-in sample declarations and their document.
    Sample(SynthesisArgs),
    /// Print the effective settings as TOML.
    Config(SynthesisArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Declaration source; stdin when omitted or `-`.
    file: Option<PathBuf>,
    #[command(flatten)]
    synthesis: SynthesisArgs,
}

#[derive(Args, Debug, Default)]
struct SynthesisArgs {
    /// Seed for the value generators.
    #[arg(long)]
    seed: Option<u64>,
    /// Indent with N spaces instead of tabs.
    #[arg(long, value_name = "N")]
    indent_spaces: Option<usize>,
    /// Write the run report as JSON to PATH.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

impl SynthesisArgs {
    /// Flags win over the settings file.
    fn apply(&self, settings: &mut Settings) {
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.indent_spaces.is_some() {
            settings.indent_spaces = self.indent_spaces;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(event = "run_failed", error = %err);
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut settings = load_settings(cli.config.as_deref())?;
    init_logging(&settings.log)?;

    match cli.command {
        Command::Generate(args) => {
            args.synthesis.apply(&mut settings);
            run_generate(args.file.as_deref(), &args.synthesis, &settings)
        }
        Command::Sample(args) => {
            args.apply(&mut settings);
            run_sample(&args, &settings)
        }
        Command::Config(args) => {
            args.apply(&mut settings);
            print!("{}", encode_settings(&settings)?);
            Ok(())
        }
    }
}

fn run_generate(
    file: Option<&Path>,
    args: &SynthesisArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let (source_name, source) = read_source(file)?;
    tracing::info!(event = "input_read", source = %source_name, bytes = source.len());

    let result = synthesize(&source, settings)?;
    println!("{}", result.document());
    finish(&result, args.report.as_deref())
}

fn run_sample(args: &SynthesisArgs, settings: &Settings) -> Result<(), CliError> {
    let result = synthesize(SAMPLE, settings)?;
    println!("{}", SAMPLE.trim_end());
    println!();
    println!("{}", result.document());
    finish(&result, args.report.as_deref())
}

fn synthesize(source: &str, settings: &Settings) -> Result<SynthesisResult, CliError> {
    let engine = SynthesisEngine::new(SynthesisOptions {
        seed: settings.seed,
        indent: settings.indent_unit(),
    });
    tracing::info!(event = "synthesis_started", seed = ?settings.seed, bytes = source.len());
    Ok(engine.run(source)?)
}

fn finish(result: &SynthesisResult, report: Option<&Path>) -> Result<(), CliError> {
    for issue in &result.report.issues {
        tracing::warn!(
            event = "field_omitted",
            run_id = %result.report.run_id,
            code = %issue.code,
            declaration = %issue.declaration,
            field = %issue.field,
            position = %issue.position,
            message = %issue.message
        );
    }
    if let Some(path) = report {
        write_report(path, result)?;
        tracing::info!(event = "report_written", path = %path.display());
    }
    tracing::info!(
        event = "run_finished",
        run_id = %result.report.run_id,
        seed = result.report.seed,
        declarations = result.declarations.len(),
        issues = result.report.issues.len(),
        duration_ms = result.report.duration_ms
    );
    Ok(())
}

fn read_source(file: Option<&Path>) -> Result<(String, String), CliError> {
    match file {
        Some(path) if path != Path::new("-") => {
            let source_name = path.display().to_string();
            let source = std::fs::read_to_string(path).map_err(|error| CliError::Input {
                source_name: source_name.clone(),
                error,
            })?;
            Ok((source_name, source))
        }
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|error| CliError::Input {
                    source_name: "stdin".to_string(),
                    error,
                })?;
            Ok(("stdin".to_string(), source))
        }
    }
}

fn write_report(path: &Path, result: &SynthesisResult) -> Result<(), CliError> {
    let report_error = |error: String| CliError::Report {
        path: path.to_path_buf(),
        error,
    };
    let encoded =
        serde_json::to_vec_pretty(&result.report).map_err(|err| report_error(err.to_string()))?;
    std::fs::write(path, encoded).map_err(|err| report_error(err.to_string()))
}
