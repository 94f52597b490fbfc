use esmdoc::esm::{EsmError, Result};

/// Parse a decimal or `0x`-prefixed hex form id literal.
pub(crate) fn parse_form_id(value: &str) -> Result<u32> {
	let parsed = if let Some(stripped) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
		u32::from_str_radix(stripped, 16)
	} else {
		value.parse::<u32>()
	};

	parsed.map_err(|_| EsmError::InvalidFormId { value: value.to_owned() })
}

/// Render a form id as `0x`-prefixed, zero-padded hex.
pub(crate) fn form_id_hex(value: u32) -> String {
	format!("{value:#010x}")
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

#[cfg(test)]
mod tests {
	use super::{form_id_hex, parse_form_id};

	#[test]
	fn parses_decimal_and_hex_literals() {
		assert_eq!(parse_form_id("256").expect("decimal"), 256);
		assert_eq!(parse_form_id("0x100").expect("hex"), 0x100);
		assert_eq!(parse_form_id("0XFF").expect("upper hex"), 0xFF);
		assert!(parse_form_id("nope").is_err());
		assert!(parse_form_id("0x").is_err());
	}

	#[test]
	fn renders_padded_hex() {
		assert_eq!(form_id_hex(0x100), "0x00000100");
	}
}
