use crate::esm::bytes::Cursor;
use crate::esm::{Result, Tag};

/// One tagged, length-prefixed field inside a record's payload.
#[derive(Debug, Clone, Copy)]
pub struct Subrecord<'a> {
	/// Subrecord tag.
	pub tag: Tag,
	/// Raw payload bytes.
	pub payload: &'a [u8],
}

impl<'a> Subrecord<'a> {
	/// Read the next subrecord: tag, 16-bit length, payload.
	pub fn read(cursor: &mut Cursor<'a>) -> Result<Self> {
		let tag = cursor.read_tag()?;
		let len = cursor.read_u16_le()?;
		let payload = cursor.read_exact(usize::from(len))?;
		Ok(Self { tag, payload })
	}

	/// Decode the payload as text, stripping embedded NUL terminators.
	pub fn text(&self) -> String {
		decode_text(self.payload)
	}
}

/// Decode bytes as lossy UTF-8 text with embedded NUL terminators stripped.
pub fn decode_text(bytes: &[u8]) -> String {
	String::from_utf8_lossy(bytes).chars().filter(|ch| *ch != '\0').collect()
}

#[cfg(test)]
mod tests {
	use super::{Subrecord, decode_text};
	use crate::esm::bytes::Cursor;
	use crate::esm::Tag;

	#[test]
	fn reads_tag_length_payload() {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(b"EDID");
		bytes.extend_from_slice(&5_u16.to_le_bytes());
		bytes.extend_from_slice(b"Door\0");
		bytes.extend_from_slice(b"next");

		let mut cursor = Cursor::new(&bytes);
		let sub = Subrecord::read(&mut cursor).expect("subrecord parses");
		assert_eq!(sub.tag, Tag::EDID);
		assert_eq!(sub.payload, b"Door\0");
		assert_eq!(sub.text(), "Door");
		assert_eq!(cursor.pos(), 11);
	}

	#[test]
	fn truncated_payload_fails() {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(b"EDID");
		bytes.extend_from_slice(&9_u16.to_le_bytes());
		bytes.extend_from_slice(b"shor");

		let mut cursor = Cursor::new(&bytes);
		assert!(Subrecord::read(&mut cursor).is_err());
	}

	#[test]
	fn text_strips_every_nul() {
		assert_eq!(decode_text(b"a\0b\0"), "ab");
		assert_eq!(decode_text(b""), "");
	}
}
