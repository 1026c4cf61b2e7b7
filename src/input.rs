//! Purpose: Resolve where the CLI reads its document from and which parser to use.
//! Exports: `InputFormat`, `InputOptions`, `load_document`.
//! Role: Keep input selection and format detection in one place for every command.
//! Invariants: Absent file and `-` both mean stdin.
//! Invariants: `auto` picks YAML only for `.yaml`/`.yml` files; stdin tries JSON, then YAML.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;
use unstructured::api::{Data, Error, ErrorKind, parse_json, parse_yaml};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum InputFormat {
    Auto,
    Json,
    Yaml,
}

#[derive(Clone, Debug)]
pub(crate) struct InputOptions {
    pub(crate) file: Option<PathBuf>,
    pub(crate) format: InputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Decoder {
    Json,
    Yaml,
    JsonThenYaml,
}

pub(crate) fn load_document(options: &InputOptions) -> Result<Data, Error> {
    let path = options
        .file
        .as_deref()
        .filter(|path| path.as_os_str() != "-");
    let text = match path {
        Some(path) => {
            debug!(path = %path.display(), "reading document from file");
            std::fs::read_to_string(path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to read {}", path.display()))
                    .with_hint("Check the path and file permissions.")
                    .with_source(err)
            })?
        }
        None => {
            debug!("reading document from stdin");
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            text
        }
    };
    let decoder = choose_decoder(options.format, path);
    debug!(?decoder, bytes = text.len(), "decoding document");
    decode(&text, decoder)
}

fn choose_decoder(format: InputFormat, path: Option<&Path>) -> Decoder {
    match format {
        InputFormat::Json => Decoder::Json,
        InputFormat::Yaml => Decoder::Yaml,
        InputFormat::Auto => {
            let Some(path) = path else {
                return Decoder::JsonThenYaml;
            };
            match path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                    Decoder::Yaml
                }
                _ => Decoder::Json,
            }
        }
    }
}

fn decode(text: &str, decoder: Decoder) -> Result<Data, Error> {
    match decoder {
        Decoder::Json => parse_json(text),
        Decoder::Yaml => parse_yaml(text),
        Decoder::JsonThenYaml => match parse_json(text) {
            Ok(data) => Ok(data),
            Err(json_err) => {
                debug!(error = %json_err, "input is not JSON; trying YAML");
                match parse_yaml(text) {
                    Ok(data) => Ok(data),
                    Err(yaml_err) if looks_like_json(text) => {
                        debug!(error = %yaml_err, "YAML fallback failed too");
                        Err(json_err)
                    }
                    Err(yaml_err) => Err(yaml_err),
                }
            }
        },
    }
}

fn looks_like_json(text: &str) -> bool {
    matches!(text.trim_start().chars().next(), Some('{') | Some('['))
}
