//! Currency formatting

/// Separators used by [`format_currency`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
	/// Between groups of three integer digits
	pub thousands: char,
	/// Between integer and fraction
	pub decimal: char,
}

impl Default for NumberFormat {
	fn default() -> Self {
		Self {
			thousands: '.',
			decimal: ',',
		}
	}
}

/// Groups the digits of `digits` in threes from the right.
pub fn group_thousands(digits: &str, separator: char) -> String {
	let len = digits.chars().count();
	let mut grouped = String::with_capacity(len + len / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (len - i) % 3 == 0 {
			grouped.push(separator);
		}
		grouped.push(c);
	}
	grouped
}

/// Prefixes `symbol` and thousands-groups a numeric `text`.
///
/// `text` is expected in plain `123456.78` form. Text that is not a number
/// keeps its content and only gets the symbol.
///
/// ```
/// use tablecring_core::format::{NumberFormat, format_currency};
///
/// assert_eq!(format_currency("Rp", "150000", NumberFormat::default()), "Rp 150.000");
/// assert_eq!(format_currency("Rp", "-1234.5", NumberFormat::default()), "Rp -1.234,5");
/// ```
pub fn format_currency(symbol: &str, text: &str, format: NumberFormat) -> String {
	let text = text.trim();
	let (sign, unsigned) = match text.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", text),
	};
	let (integer, fraction) = match unsigned.split_once('.') {
		Some((integer, fraction)) => (integer, Some(fraction)),
		None => (unsigned, None),
	};

	let numeric = !integer.is_empty()
		&& integer.chars().all(|c| c.is_ascii_digit())
		&& fraction.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()));
	if !numeric {
		return format!("{symbol} {text}");
	}

	let mut amount = format!("{sign}{}", group_thousands(integer, format.thousands));
	if let Some(fraction) = fraction {
		amount.push(format.decimal);
		amount.push_str(fraction);
	}
	format!("{symbol} {amount}")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("1", "1")]
	#[case("123", "123")]
	#[case("1234", "1.234")]
	#[case("1234567", "1.234.567")]
	#[case("", "")]
	fn test_group_thousands(#[case] digits: &str, #[case] expected: &str) {
		assert_eq!(group_thousands(digits, '.'), expected);
	}

	#[rstest]
	#[case("150000", "Rp 150.000")]
	#[case("0", "Rp 0")]
	#[case("-5000", "Rp -5.000")]
	#[case("2500.75", "Rp 2.500,75")]
	#[case("n/a", "Rp n/a")]
	#[case("1.", "Rp 1.")]
	fn test_format_currency(#[case] text: &str, #[case] expected: &str) {
		assert_eq!(format_currency("Rp", text, NumberFormat::default()), expected);
	}

	#[test]
	fn test_custom_separators() {
		let format = NumberFormat {
			thousands: ',',
			decimal: '.',
		};
		assert_eq!(format_currency("$", "1234567.5", format), "$ 1,234,567.5");
	}
}
