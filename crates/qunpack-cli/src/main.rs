use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use glob::glob;
use qunpack_core::{Format, Options, UnpackError, Value};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("QUNPACK_BUILD_COMMIT"),
    ", built ",
    env!("QUNPACK_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  qunpack 'a4 V v2' header.bin\n  qunpack '{2 id:n, name:Z+}' records.bin --pretty\n  qunpack 'C[3 C2]C' --hex '01 02 03 04 05 06 07 08'\n  cat packet.bin | qunpack 'n N' - --offset 14";

#[derive(Parser, Debug)]
#[command(name = "qunpack")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode binary data with an unpack-style format string and print it as JSON.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Format string (e.g. "n2 {id:C, name:Z+}")
    format: String,

    /// Input file, a glob matching one file, or '-' for stdin
    #[arg(required_unless_present = "hex", conflicts_with = "hex")]
    input: Option<PathBuf>,

    /// Input bytes as hex digits instead of a file (whitespace is ignored)
    #[arg(long)]
    hex: Option<String>,

    /// Byte offset to start decoding at (non-positive values start at 0)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Write JSON to this path instead of stdout
    #[arg(short = 'o', long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON to stdout (default)
    #[arg(long)]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// JSON options file (fields: max_depth, max_values); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of nested groups in the format [default: 64]
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum number of values the format may produce [default: 16777216]
    #[arg(long)]
    max_values: Option<usize>,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<UnpackError> for CliError {
    fn from(err: UnpackError) -> Self {
        let hint = match &err {
            UnpackError::UnterminatedGroup { .. } => "close every '[' with ']' and every '{' with '}'",
            UnpackError::ZeroGroupRepeat { .. } => "groups repeat at least once; drop the 0",
            UnpackError::UnterminatedFieldName { .. } => {
                "record fields are written name:CODE; escape a literal ':' as '\\:'"
            }
            UnpackError::NestingTooDeep { .. } => "raise --max-depth or flatten the format",
            UnpackError::TooManyValues { .. } => "lower the repeat counts or raise --max-values",
            UnpackError::NotImplemented { .. } => "only decoding is supported",
        };
        CliError::new(format!("invalid format: {err}"), Some(hint.to_string()))
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = load_options(&cli)?;
    let format = Format::compile_with(&cli.format, &options)?;

    // clap requires one of INPUT and --hex
    let bytes = match (&cli.hex, &cli.input) {
        (Some(hex), _) => parse_hex(hex)?,
        (None, input) => read_input(
            input.as_deref().unwrap_or(Path::new("-")),
            cli.output.as_deref(),
        )?,
    };
    tracing::debug!(bytes = bytes.len(), offset = cli.offset, "input loaded");

    let values = format.unpack(&bytes, cli.offset);
    let json = serialize_values(&values, cli.pretty && !cli.compact)?;

    let output = match cli.output {
        Some(path) if !cli.stdout => path,
        _ => {
            println!("{}", json);
            return Ok(());
        }
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, json)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !cli.quiet {
        eprintln!(
            "OK: {} values from {} bytes -> {}",
            values.len(),
            bytes.len(),
            output.display()
        );
    }
    Ok(())
}

fn load_options(cli: &Cli) -> Result<Options, CliError> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&text).map_err(|err| {
                CliError::new(
                    format!("invalid config {}: {}", path.display(), err),
                    Some("expected a JSON object like {\"max_depth\": 64}".to_string()),
                )
            })?
        }
        None => Options::default(),
    };
    if let Some(max_depth) = cli.max_depth {
        options.max_depth = max_depth;
    }
    if let Some(max_values) = cli.max_values {
        options.max_values = max_values;
    }
    tracing::debug!(?options, "options resolved");
    Ok(options)
}

fn serialize_values(values: &[Value], pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(values)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(values)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn read_input(input: &Path, output: Option<&Path>) -> Result<Vec<u8>, CliError> {
    if input.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        return Ok(bytes);
    }

    let resolved = resolve_input_path(input)?;
    if !resolved.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", resolved.display()),
            Some("check the path, or use '-' to read stdin".to_string()),
        ));
    }
    let meta = fs::metadata(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", resolved.display()),
            Some("pass a regular file".to_string()),
        ));
    }

    if let Some(output) = output {
        let input_abs = fs::canonicalize(&resolved)
            .with_context(|| format!("Failed to resolve input path: {}", resolved.display()))?;
        if fs::canonicalize(output).ok().as_ref() == Some(&input_abs) {
            return Err(CliError::new(
                format!("output path must differ from input: {}", output.display()),
                Some("choose a different output path".to_string()),
            ));
        }
    }

    fs::read(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))
        .map_err(Into::into)
}

fn parse_hex(text: &str) -> Result<Vec<u8>, CliError> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|err| match err {
        hex::FromHexError::OddLength => CliError::new(
            format!("odd number of hex digits ({})", digits.len()),
            Some("each byte needs two hex digits, e.g. 0a".to_string()),
        ),
        other => CliError::new(
            format!("invalid hex input: {other}"),
            Some("use digits 0-9 and a-f".to_string()),
        ),
    })
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single input file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
