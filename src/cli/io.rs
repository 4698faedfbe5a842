//! JSON output for the CLI
//!
//! One JSON object per invocation on the output stream. Log lines never
//! share it; the logger writes to stderr.

use std::io::Write;

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    write_line(
        out,
        &serde_json::json!({
            "status": "ok",
            "data": data
        }),
    )
}

/// Write an error response
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    write_line(
        out,
        &serde_json::json!({
            "status": "error",
            "code": code,
            "message": message
        }),
    )
}

fn write_line<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
