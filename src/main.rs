//! Purpose: `unstructured` CLI entry point: load one document, run one operation on it.
//! Role: Binary crate root; parses args, sets up logging, delegates to `command_dispatch`.
//! Invariants: Command results are JSON (or YAML on request) on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr; logs also go to stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::error::Error as StdError;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod color_json;
mod command_dispatch;
mod input;

use color_json::colorize_json;
use input::InputFormat;
use unstructured::api::{Data, Error, ErrorKind, to_exit_code};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                let hint = clap_error_hint(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint(hint),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let source = input::InputOptions {
        file: cli.file,
        format: cli.format,
    };

    command_dispatch::dispatch_command(cli.command, &source, color_mode)
        .map_err(add_parse_hint)
        .map_err(add_pointer_hint)
        .map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "unstructured",
    version,
    about = "Navigate and edit schema-less JSON/YAML documents",
    long_about = None,
    before_help = r#"Documents are read from --file (or stdin) and addressed with RFC 6901 JSON pointers.

Mental model:
  - `get` / `type` / `keys` read a location
  - `has` checks that a location exists
  - `set` replaces one field or list element and prints the document
"#,
    after_help = r#"EXAMPLES
  $ unstructured -f config.yaml get /server/port
  $ echo '{"a":[1,2]}' | unstructured has /a/1
  $ unstructured -f doc.json set /name '"david"'
  $ unstructured -f doc.yaml set /replicas 3 --output yaml

NOTES
  - The empty pointer "" addresses the whole document
  - Escape "/" in keys as ~1 and "~" as ~0
  - Set RUST_LOG=debug to see input and format decisions on stderr"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        short = 'f',
        long = "file",
        global = true,
        help = "Input document (default: stdin; use - for stdin explicitly)",
        value_hint = ValueHint::FilePath
    )]
    file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Input format: auto|json|yaml (auto uses the file extension, else tries JSON then YAML)"
    )]
    format: InputFormat,
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Print the value at a JSON pointer")]
    Get {
        #[arg(default_value = "", help = "JSON pointer (default: the whole document)")]
        pointer: String,
    },
    #[command(about = "Print whether a JSON pointer addresses an existing location")]
    Has {
        #[arg(help = "JSON pointer")]
        pointer: String,
    },
    #[command(about = "Print the type tag (object|string|number|list|null|bool) at a JSON pointer")]
    Type {
        #[arg(default_value = "", help = "JSON pointer (default: the whole document)")]
        pointer: String,
    },
    #[command(about = "Print the sorted keys of the object at a JSON pointer")]
    Keys {
        #[arg(default_value = "", help = "JSON pointer (default: the whole document)")]
        pointer: String,
    },
    #[command(
        about = "Replace one field or list element and print the updated document",
        after_help = r#"EXAMPLES
  $ unstructured -f doc.json set /name '"david"'
  $ unstructured -f doc.json set /list/1 '{"nested": true}'
  $ unstructured -f doc.yaml set /new-key '[1, 2]' --output yaml

NOTES
  - VALUE is JSON: quote strings ('"text"')
  - Objects gain the key if it is missing; list indexes must already exist"#
    )]
    Set {
        #[arg(help = "JSON pointer of the field or element to replace")]
        pointer: String,
        #[arg(help = "New value as JSON")]
        value: String,
        #[arg(long, default_value = "json", value_enum, help = "Output format: json|yaml")]
        output: OutputFormat,
    },
    #[command(about = "Print shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(about = "Print version info")]
    Version,
}

fn add_parse_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Parse || err.hint().is_some() {
        return err;
    }
    let hint = unstructured::api::hint_for_error(&err, "input document");
    err.with_hint(hint)
}

fn add_pointer_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::PointerSyntax => {
            err.with_hint("Pointers start with \"/\" (e.g. /items/0/name); use \"\" for the root.")
        }
        ErrorKind::NotFound => {
            err.with_hint("Inspect the parent with `unstructured keys <parent-pointer>`.")
        }
        _ => err,
    }
}

fn emit_data(value: &Data, color_mode: ColorMode) {
    let is_tty = io::stdout().is_terminal();
    let use_color = color_mode.use_color(is_tty);
    let pretty = is_tty || use_color;
    let json = if pretty {
        if use_color {
            colorize_json(value.as_raw())
        } else {
            serde_json::to_string_pretty(value)
                .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
        }
    } else {
        serde_json::to_string(value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

fn emit_json(value: Value, color_mode: ColorMode) {
    emit_data(&Data::from_raw(value), color_mode);
}

fn emit_yaml(value: &Data) -> Result<(), Error> {
    let text = serde_yaml::to_string(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("yaml encode failed")
            .with_source(err)
    })?;
    print!("{text}");
    Ok(())
}

fn emit_version_output(color_mode: ColorMode) {
    if io::stdout().is_terminal() {
        println!("unstructured {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(
            json!({
                "name": "unstructured",
                "version": env!("CARGO_PKG_VERSION"),
            }),
            color_mode,
        );
    }
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Parse => "parse error".to_string(),
        ErrorKind::PointerSyntax => "invalid pointer".to_string(),
        ErrorKind::NotFound => "no such path".to_string(),
        ErrorKind::WrongShape => "wrong shape".to_string(),
        ErrorKind::OutOfBounds => "index out of bounds".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(pointer) = err.pointer() {
        inner.insert("pointer".to_string(), json!(pointer));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(pointer) = err.pointer() {
        lines.push(format!(
            "{} {pointer:?}",
            colorize_label("pointer:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `unstructured --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "unstructured") else {
        return "Try `unstructured --help`.".to_string();
    };

    let mut parts = Vec::new();
    for token in tokens.iter().skip(pos + 1) {
        if token.starts_with('-') || token.starts_with('<') || token.starts_with('[') {
            break;
        }
        parts.push(*token);
    }

    if parts.is_empty() {
        return "Try `unstructured --help`.".to_string();
    }

    format!("Try `unstructured {} --help`.", parts.join(" "))
}
