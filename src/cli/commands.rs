//! CLI command implementations

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value as JsonValue};

use crate::client::ClientConfig;
use crate::codec::{TaggedBytes, Value, ValueCodec};
use crate::range::successor_bound;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parse arguments, run the command and print its JSON result.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    execute(&cli, &mut io::stdout())
}

/// Run a parsed command line, writing exactly one JSON object to `out`.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;
    config.apply_logging();

    match run_command(&cli.command, &config.codec()) {
        Ok(data) => write_response(out, data),
        Err(e) => {
            write_error(out, e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn load_config(path: Option<&Path>) -> CliResult<ClientConfig> {
    match path {
        Some(path) => Ok(ClientConfig::load(path)?),
        None => Ok(ClientConfig::default()),
    }
}

/// Execute one command against a codec.
pub fn run_command(command: &Command, codec: &ValueCodec) -> CliResult<JsonValue> {
    match command {
        Command::Encode { value, prefix_len } => encode(codec, value, *prefix_len),
        Command::Decode { hex } => decode(codec, hex),
        Command::Bound { hex } => bound(hex),
    }
}

fn encode(codec: &ValueCodec, input: &str, prefix_len: Option<usize>) -> CliResult<JsonValue> {
    let json: JsonValue = serde_json::from_str(input)?;
    let value = Value::try_from(&json)?;

    let tagged = match (&value, prefix_len) {
        (_, None) => codec.encode(&value)?,
        (Value::Tuple(elements), Some(n)) => codec.encode_tuple(elements, Some(n))?,
        (other, Some(_)) => {
            return Err(CliError::input_error(format!(
                "--prefix-len needs a tuple, got {}",
                other.type_name()
            )))
        }
    };

    Ok(json!({
        "tag": tagged.tag(),
        "hex": hex::encode(tagged.to_bytes()),
    }))
}

fn decode(codec: &ValueCodec, input: &str) -> CliResult<JsonValue> {
    let bytes = parse_hex(input)?;
    let tagged = TaggedBytes::parse(&bytes)?;
    let value = codec.decode(&tagged)?;
    Ok(json!({
        "tag": tagged.tag(),
        "value": value.to_json(),
    }))
}

fn bound(input: &str) -> CliResult<JsonValue> {
    let prefix = parse_hex(input)?;
    Ok(json!({
        "prefix": hex::encode(&prefix),
        "bound": successor_bound(&prefix).map(hex::encode),
    }))
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    hex::decode(input.trim()).map_err(|e| CliError::input_error(format!("invalid hex: {}", e)))
}
