//! Parsing utilities
//!
//! Helpers for CLI arguments, name comparison and JSON-RPC quantities.

use byte_unit::Byte;
use serde_json::Value;
use std::str::FromStr;

/// Parses a human readable size ("1GB", "500MB", "1024KiB") into bytes.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	match Byte::from_str(s) {
		Ok(byte) => Ok(byte.as_u64()),
		Err(e) => Err(format!("Invalid size format: '{}'. Error: {}", s, e)),
	}
}

/// Trims and lowercases a string, for case-insensitive comparisons.
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}

/// Decodes a JSON-RPC quantity.
///
/// Accepts non-negative JSON integers, decimal strings and `0x`-prefixed hex
/// strings (the form used by `eth_blockNumber`, `eth_gasPrice` and friends).
/// Returns `None` for anything else, including values that overflow `u128`.
pub fn parse_quantity(value: &Value) -> Option<u128> {
	match value {
		Value::Number(n) => n.as_u64().map(u128::from),
		Value::String(s) => {
			let s = s.trim();
			match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
				Some(hex) if hex.is_empty() || hex.starts_with('+') => None,
				Some(hex) => u128::from_str_radix(hex, 16).ok(),
				None if s.is_empty() || s.starts_with('+') => None,
				None => s.parse::<u128>().ok(),
			}
		}
		_ => None,
	}
}
