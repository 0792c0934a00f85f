//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin (empty input is `null`)
//! - Output: one JSON object on stdout

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Read a JSON document from stdin
pub fn read_payload() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_payload(&input)
}

pub(crate) fn parse_payload(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_null() {
        assert_eq!(parse_payload("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_multiline_input() {
        let value = parse_payload("{\n  \"origin\": \"DEL\"\n}\n").unwrap();
        assert_eq!(value["origin"], "DEL");
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_payload("{origin").is_err());
    }
}
