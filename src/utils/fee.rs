//! Transaction fee math and display.
//!
//! Gas prices arrive from RPC nodes in atto units (10^-18 of the native
//! token). Fees are computed with `rust_decimal` so that values like
//! 0.000021 render exactly instead of as binary floating point.

use rust_decimal::Decimal;

/// Decimal places of the native token
pub const ATTO_DECIMALS: u32 = 18;

/// Fee in native units for `gas` at `gas_price` (atto per gas unit).
///
/// Returns `None` when the product does not fit a `Decimal` mantissa.
pub fn calculate_fee(gas: u64, gas_price: u128) -> Option<Decimal> {
	let atto = u128::from(gas).checked_mul(gas_price)?;
	let atto = i128::try_from(atto).ok()?;
	Decimal::try_from_i128_with_scale(atto, ATTO_DECIMALS)
		.ok()
		.map(|fee| fee.normalize())
}

/// Renders a fee as `"1,234.5 ONE"`, followed by `"($ 12.34)"` when a USD price
/// is known and the converted value does not round to zero.
pub fn format_fee(fee: Decimal, symbol: &str, usd_price: Option<Decimal>) -> String {
	let amount = group_thousands(&fee.round_dp(ATTO_DECIMALS).normalize().to_string());

	match usd_price.and_then(|price| usd_value(fee, price)) {
		Some(usd) => format!("{} {} ($ {})", amount, symbol, usd),
		None => format!("{} {}", amount, symbol),
	}
}

fn usd_value(fee: Decimal, price: Decimal) -> Option<String> {
	let mut usd = fee.checked_mul(price)?.round_dp(2);
	if usd.is_zero() {
		return None;
	}
	usd.rescale(2);
	Some(group_thousands(&usd.to_string()))
}

/// Inserts `,` between every three integer digits, en-US style.
fn group_thousands(number: &str) -> String {
	let (sign, unsigned) = match number.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", number),
	};
	let (integer, fraction) = match unsigned.split_once('.') {
		Some((integer, fraction)) => (integer, Some(fraction)),
		None => (unsigned, None),
	};

	let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
	for (i, digit) in integer.chars().enumerate() {
		if i > 0 && (integer.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}

	match fraction {
		Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
		None => format!("{}{}", sign, grouped),
	}
}
