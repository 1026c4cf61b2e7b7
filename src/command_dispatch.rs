//! Purpose: Hold top-level CLI command dispatch for `unstructured`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Every document command loads input once and performs a single operation.
//! Invariants: `set` changes exactly one field or element; the root cannot be replaced.

use super::*;

use tracing::debug;
use unstructured::api::{JsonPointer, parse_json};

pub(super) fn dispatch_command(
    command: Command,
    source: &input::InputOptions,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::aot::generate(shell, &mut cmd, "unstructured", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output(color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Get { pointer } => {
            let doc = input::load_document(source)?;
            debug!(%pointer, "get");
            let value = doc.get_by_pointer(&pointer)?;
            emit_data(&value, color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Has { pointer } => {
            let doc = input::load_document(source)?;
            debug!(%pointer, "has");
            let present = doc.has_pointer(&pointer)?;
            emit_json(Value::Bool(present), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Type { pointer } => {
            let doc = input::load_document(source)?;
            debug!(%pointer, "type");
            let value = doc.get_by_pointer(&pointer)?;
            emit_json(json!(value.kind().tag()), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Keys { pointer } => {
            let doc = input::load_document(source)?;
            debug!(%pointer, "keys");
            let value = doc.get_by_pointer(&pointer)?;
            if !value.is_object() {
                return Err(Error::new(ErrorKind::WrongShape)
                    .with_message(format!("keys needs an object, found a {}", value.kind()))
                    .with_pointer(pointer));
            }
            emit_json(json!(value.as_object().keys()), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Set {
            pointer,
            value,
            output,
        } => {
            let doc = input::load_document(source)?;
            let new_value = parse_json(&value).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("VALUE is not valid JSON")
                    .with_hint("Provide a single JSON value; quote strings (e.g. '\"text\"').")
                    .with_source(err)
            })?;
            debug!(%pointer, kind = %new_value.kind(), "set");
            set_at_pointer(&doc, &pointer, new_value)?;
            match output {
                OutputFormat::Json => emit_data(&doc, color_mode),
                OutputFormat::Yaml => emit_yaml(&doc)?,
            }
            Ok(RunOutcome::ok())
        }
    }
}

fn set_at_pointer(doc: &Data, pointer: &str, value: Data) -> Result<(), Error> {
    let parsed = JsonPointer::parse(pointer)?;
    let Some((parent_pointer, token)) = parsed.split_last() else {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("set cannot replace the whole document")
            .with_hint("Point at a field or element, e.g. /name or /items/0."));
    };
    let parent = doc.resolve(&parent_pointer)?;
    if parent.is_list() {
        let index = JsonPointer::list_index(token).ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("`{token}` is not a list index"))
                .with_hint("List indexes are 0 or a decimal without leading zeros or sign.")
                .with_pointer(pointer)
        })?;
        return parent
            .set_elem(index, value)
            .map_err(|err| err.with_pointer(pointer));
    }
    parent
        .set_field(token, value)
        .map_err(|err| err.with_pointer(pointer))
}
