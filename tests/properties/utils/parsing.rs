use explorer_poller::utils::{normalize_string, parse_quantity};
use proptest::{prelude::*, test_runner::Config};
use serde_json::{json, Value};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_hex_quantities_decode(n in any::<u128>(), upper in any::<bool>()) {
		let hex = if upper { format!("0X{:X}", n) } else { format!("0x{:x}", n) };
		prop_assert_eq!(parse_quantity(&json!(hex)), Some(n));
	}

	#[test]
	fn test_decimal_quantities_decode(n in any::<u128>()) {
		prop_assert_eq!(parse_quantity(&json!(n.to_string())), Some(n));
	}

	#[test]
	fn test_json_integers_decode(n in any::<u64>()) {
		prop_assert_eq!(parse_quantity(&json!(n)), Some(u128::from(n)));
	}

	#[test]
	fn test_negative_and_fractional_numbers_rejected(n in 1i64..i64::MAX, f in 0.5f64..1e9) {
		prop_assert_eq!(parse_quantity(&json!(-n)), None);
		prop_assert_eq!(parse_quantity(&json!(f)), None);
	}

	#[test]
	fn test_non_numeric_strings_rejected(s in "[g-zG-Z ]{1,20}") {
		prop_assert_eq!(parse_quantity(&Value::String(s.clone())), None);
		prop_assert_eq!(parse_quantity(&Value::String(format!("0x{}", s))), None);
	}

	#[test]
	fn test_normalize_string_is_idempotent(s in "[a-zA-Z0-9 _-]{0,32}") {
		let once = normalize_string(&s);
		prop_assert_eq!(normalize_string(&once), once.clone());
		prop_assert_eq!(once.trim(), once.as_str());
	}
}
