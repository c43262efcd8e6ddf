use std::fs;
use std::io::Read;

use anyhow::{anyhow, Result};

/// Read a JSON value from a file path, or from stdin when the argument
/// is "-".
pub fn read_json(input: &str) -> Result<serde_json::Value> {
    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };
    serde_json::from_str(&raw).map_err(|e| anyhow!("invalid json: {e}"))
}
