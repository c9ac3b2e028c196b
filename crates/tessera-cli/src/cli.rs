//! Argument parsing, logging setup, and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tessera_telemetry::{
    CommandContextGuard, DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError,
    init_logging,
};
use tessera_tokens::ThemeMode;

use crate::commands::{handle_compile, handle_preview, handle_validate};
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

const DEFAULT_OUT_DIR: &str = "dist/tokens";

/// Parses CLI arguments, runs the requested command, and prints its output.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = install_logging(&cli) {
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }
    let _context = CommandContextGuard::new(command_label(&cli.command));

    match dispatch(cli).await {
        Ok(text) => {
            print!("{text}");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn install_logging(cli: &Cli) -> CliResult<()> {
    let format = LogFormat::from_setting(cli.log_format.as_deref())
        .map_err(|err| CliError::validation(telemetry_message(&err)))?;
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format,
        version: env!("CARGO_PKG_VERSION"),
    })
    .map_err(CliError::failure)
}

fn telemetry_message(err: &TelemetryError) -> String {
    match err {
        TelemetryError::UnknownLogFormat { value } => {
            format!("{err} '{value}' (expected json or pretty)")
        }
        TelemetryError::SubscriberInstall { .. } => err.to_string(),
    }
}

async fn dispatch(cli: Cli) -> CliResult<String> {
    match cli.command {
        Command::Compile(args) => handle_compile(&args, cli.output),
        Command::Validate(args) => handle_validate(&args, cli.output),
        Command::Preview(args) => handle_preview(&args, cli.output).await,
    }
}

#[derive(Parser)]
#[command(
    name = "tessera",
    version,
    about = "Compile design tokens and preview runtime brand themes"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "TESSERA_LOG_FORMAT")]
    log_format: Option<String>,
    #[arg(long, global = true, env = "TESSERA_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Compile token sources into CSS, preset, schema, and lock artifacts.
    Compile(CompileArgs),
    /// Validate a brand payload against a schema.
    Validate(ValidateArgs),
    /// Run the theme manager and print the properties it applies.
    Preview(PreviewArgs),
}

#[derive(Args)]
pub(crate) struct CompileArgs {
    /// Base token source (JSON); the built-in design language when omitted.
    #[arg(long)]
    pub(crate) base: Option<PathBuf>,
    /// Brand token source (JSON); the built-in palette when omitted.
    #[arg(long)]
    pub(crate) brand: Option<PathBuf>,
    /// Directory receiving the artifacts.
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub(crate) out: PathBuf,
    /// Verify the artifacts in `--out` are current without writing.
    #[arg(long)]
    pub(crate) check: bool,
}

#[derive(Args)]
pub(crate) struct ValidateArgs {
    /// Compiled `schema.json`; the built-in schema when omitted.
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
    /// Brand payload to validate.
    #[arg(long)]
    pub(crate) payload: PathBuf,
    /// Mode whose resolved values are printed.
    #[arg(long, default_value = "light", value_parser = parse_mode)]
    pub(crate) mode: ThemeMode,
}

#[derive(Args)]
pub(crate) struct PreviewArgs {
    /// Brand to load; base styling only when omitted.
    #[arg(long)]
    pub(crate) brand: Option<String>,
    /// Base URL serving `<scope>/themes/<brand>.json`.
    #[arg(long, env = "TESSERA_THEME_BASE_URL")]
    pub(crate) base_url: Option<String>,
    /// Directory of bundled brand assets, used instead of `--base-url`.
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
    /// Payload scope between the base and `themes/`.
    #[arg(long, env = "TESSERA_THEME_SCOPE")]
    pub(crate) scope: Option<String>,
    /// Mode used when no stored preference applies.
    #[arg(long, env = "TESSERA_THEME_DEFAULT_MODE")]
    pub(crate) mode: Option<String>,
    /// `Cookie` header to read the stored mode preference from.
    #[arg(long)]
    pub(crate) cookie: Option<String>,
    /// Fetch timeout in seconds.
    #[arg(long, env = "TESSERA_THEME_FETCH_TIMEOUT_SECS")]
    pub(crate) timeout: Option<String>,
    /// Compiled `schema.json`; the built-in schema when omitted.
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Compile(_) => "compile",
        Command::Validate(_) => "validate",
        Command::Preview(_) => "preview",
    }
}

fn parse_mode(input: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse(input)
        .ok_or_else(|| format!("invalid mode '{input}' (expected light or dark)"))
}
