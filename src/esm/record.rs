use std::collections::BTreeMap;

use crate::esm::bytes::Cursor;
use crate::esm::group::Walker;
use crate::esm::store::ObjectStore;
use crate::esm::subrecord::Subrecord;
use crate::esm::{EsmError, Result, Tag};

/// Fixed record header fields following the 4-byte type tag.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
	/// Payload size in bytes, tag and header excluded.
	pub size: u32,
	/// Record flags.
	pub flags: u32,
	/// Form id addressing this record within its kind.
	pub form_id: u32,
	/// Version control dword.
	pub vc_info: u32,
	/// Form version.
	pub form_version: u16,
	/// Second version control word.
	pub vc_info2: i16,
}

impl RecordHeader {
	/// Encoded width of the header, excluding the type tag.
	pub const WIDTH: usize = 20;

	/// Parse a record header from a cursor positioned at the size field.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		Ok(Self {
			size: cursor.read_u32_le()?,
			flags: cursor.read_u32_le()?,
			form_id: cursor.read_u32_le()?,
			vc_info: cursor.read_u32_le()?,
			form_version: cursor.read_u16_le()?,
			vc_info2: cursor.read_i16_le()?,
		})
	}
}

/// Decoded subrecord attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Text payload (editor id, display name, model path).
	Text(String),
	/// Form id payload (container sound references).
	FormId(u32),
	/// Container object list: referenced form id to count.
	ObjectCounts(BTreeMap<u32, u32>),
}

/// One decoded record: fixed header fields plus recognized attributes.
#[derive(Debug, Clone)]
pub struct Record {
	/// Record type tag.
	pub kind: Tag,
	/// Form id addressing this record within its kind.
	pub form_id: u32,
	/// Record flags.
	pub flags: u32,
	/// Version control dword.
	pub vc_info: u32,
	/// Form version.
	pub form_version: u16,
	/// Second version control word.
	pub vc_info2: i16,
	/// Recognized subrecord attributes keyed by tag.
	pub attributes: BTreeMap<Tag, Value>,
}

/// Decode one generic record and insert it into the store.
///
/// The cursor must sit at the record's size field; the type tag has already
/// been consumed by the caller. The terminating tag (the record's own kind
/// or a group tag) is left unconsumed for the parent dispatcher.
pub(crate) fn decode_record(
	cursor: &mut Cursor<'_>,
	kind: Tag,
	store: &mut ObjectStore,
	walker: &mut Walker<'_>,
) -> Result<()> {
	let start = cursor.pos() - Tag::WIDTH;
	let header = RecordHeader::parse(cursor)?;
	let payload_start = cursor.pos();
	let mut attributes = BTreeMap::new();

	loop {
		if cursor.remaining() < Tag::WIDTH {
			break;
		}
		let next = cursor.peek_tag()?;
		if next == kind || next == Tag::GRUP {
			break;
		}

		let mut sub_at = cursor.pos();
		let mut sub = Subrecord::read(cursor)?;

		if kind == Tag::CONT && sub.tag == Tag::CNTO {
			let mut counts = match attributes.remove(&Tag::CNTO) {
				Some(Value::ObjectCounts(existing)) => existing,
				_ => BTreeMap::new(),
			};
			// Object list entries arrive as a run; the first subrecord past
			// the run falls through to the normal handling below.
			loop {
				let mut entry = Cursor::new(sub.payload);
				let target = entry.read_u32_le()?;
				let count = entry.read_u32_le()?;
				counts.insert(target, count);

				sub_at = cursor.pos();
				sub = Subrecord::read(cursor)?;
				if sub.tag != Tag::CNTO {
					break;
				}
			}
			attributes.insert(Tag::CNTO, Value::ObjectCounts(counts));
		}

		match sub.tag {
			Tag::EDID | Tag::FULL => {
				attributes.insert(sub.tag, Value::Text(sub.text()));
			}
			Tag::MODL => {
				attributes.insert(Tag::MODL, Value::Text(sub.text().replace('\\', "/")));
			}
			Tag::SNAM | Tag::QNAM if kind == Tag::CONT => {
				let mut payload = Cursor::new(sub.payload);
				attributes.insert(sub.tag, Value::FormId(payload.read_u32_le()?));
			}
			unknown => walker.note_unknown_subrecord(sub_at, kind, unknown, sub.payload),
		}
	}

	let consumed = cursor.pos() - payload_start;
	if consumed != header.size as usize {
		return Err(EsmError::RecordSizeMismatch {
			at: start,
			kind,
			declared: header.size,
			consumed,
		});
	}

	store.insert(Record {
		kind,
		form_id: header.form_id,
		flags: header.flags,
		vc_info: header.vc_info,
		form_version: header.form_version,
		vc_info2: header.vc_info2,
		attributes,
	});
	Ok(())
}
