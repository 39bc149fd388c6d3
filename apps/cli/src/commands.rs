//! CLI definition, input/output plumbing, and tracing setup.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Report, Result};
use tracing::{debug, info, warn};
use worldcontext_core::build_world_context_from_json;
use worldcontext_shared::{ContextLimits, WorldContextError, load_config, load_config_from};

/// Input argument that selects standard input.
const STDIN_MARKER: &str = "-";

/// Printed when no input argument is given or arguments don't parse.
const USAGE: &str = "Usage: worldcontext <denizens_json>";

/// Process exit status for every failure class.
pub(crate) const FAILURE_STATUS: u8 = 1;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// worldcontext — turn a denizen catalogue into markdown world context.
#[derive(Parser)]
#[command(
    name = "worldcontext",
    version,
    about = "Summarise a JSON array of denizens as markdown world context.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// JSON array of denizens: a file path, or `-` to read standard input.
    pub input: Option<String>,

    /// Write the markdown to this file instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to ~/.worldcontext/worldcontext.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout is
/// reserved for the markdown.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "worldcontext=warn",
        1 => "worldcontext=info",
        2 => "worldcontext=debug",
        _ => "worldcontext=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Read the denizens, build the context, and emit it.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let input = cli.input.ok_or(WorldContextError::Usage)?;

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let limits = ContextLimits::from(&config);

    let json = read_input(&input)?;
    debug!(source = %input, bytes = json.len(), "input read");

    let context = build_world_context_from_json(&json, &limits)?;

    match &cli.output {
        Some(path) => {
            write_output(path, &context)?;
            info!(path = %path.display(), "world context written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{context}")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Read the raw JSON text from a file path, or from stdin for `-`.
pub(crate) fn read_input(source: &str) -> worldcontext_shared::Result<String> {
    read_from(source, std::io::stdin())
}

/// Read from `stdin` when `source` is `-`, otherwise from the file at `source`.
fn read_from(source: &str, mut stdin: impl Read) -> worldcontext_shared::Result<String> {
    if source == STDIN_MARKER {
        let mut buf = String::new();
        stdin
            .read_to_string(&mut buf)
            .map_err(|e| WorldContextError::io("<stdin>", e))?;
        return Ok(buf);
    }

    std::fs::read_to_string(source).map_err(|e| WorldContextError::io(source, e))
}

/// Write the markdown (plus trailing newline) atomically: temp file, then rename.
pub(crate) fn write_output(path: &Path, content: &str) -> worldcontext_shared::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "worldcontext.md".to_string());
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, format!("{content}\n")).map_err(|e| WorldContextError::io(&temp, e))?;
    if let Err(e) = std::fs::rename(&temp, path) {
        if let Err(cleanup) = std::fs::remove_file(&temp) {
            warn!(path = %temp.display(), error = %cleanup, "could not remove temp output");
        }
        return Err(WorldContextError::io(path, e));
    }

    Ok(())
}

/// One-line diagnostic for an argument error, or `None` when clap is
/// displaying help or version text.
pub(crate) fn usage_error(err: &clap::Error) -> Option<String> {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => Some(USAGE.to_string()),
    }
}

/// Install the color-eyre panic and report hooks. A failure is reported and
/// turned into the failure exit status.
pub(crate) fn install_report_hook() -> std::result::Result<(), u8> {
    color_eyre::install().map_err(|e| {
        eprintln!("{}", diagnostic(&e));
        FAILURE_STATUS
    })
}

/// Report the outcome of [`run`] and return the process exit status.
pub(crate) fn finish(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(report) => {
            eprintln!("{}", diagnostic(&report));
            FAILURE_STATUS
        }
    }
}

/// One-line diagnostic for a failed run.
pub(crate) fn diagnostic(report: &Report) -> String {
    match report.downcast_ref::<WorldContextError>() {
        Some(WorldContextError::Usage) => USAGE.to_string(),
        Some(err) => format!("Error: {err}"),
        None => format!("Error: {report}"),
    }
}
