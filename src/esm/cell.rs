use crate::esm::bytes::Cursor;
use crate::esm::group::{GroupContent, Walker};
use crate::esm::record::RecordHeader;
use crate::esm::reference::Reference;
use crate::esm::store::ObjectStore;
use crate::esm::subrecord::Subrecord;
use crate::esm::{Result, Tag};

/// One interior cell with its identity fields and placed-object lists.
#[derive(Debug, Clone, Default)]
pub struct Cell {
	/// Form id of the cell record.
	pub form_id: u32,
	/// Editor id text.
	pub editor_id: String,
	/// Display name text, when present.
	pub full_name: Option<String>,
	/// Persistent placed-object references, in stream order.
	pub persistent: Vec<Reference>,
	/// Temporary placed-object references, in stream order.
	pub temporary: Vec<Reference>,
}

/// Persistent/temporary lists parsed from one cell-children group.
#[derive(Debug, Clone, Default)]
pub struct CellChildren {
	/// Persistent placed-object references.
	pub persistent: Vec<Reference>,
	/// Temporary placed-object references.
	pub temporary: Vec<Reference>,
}

/// Assemble one cell from its record and optional children group.
///
/// Only the identity subrecords are decoded. The cursor then jumps over the
/// rest of the record using its declared size, so unrecognized cell payload
/// never desynchronizes the walk.
pub(crate) fn assemble_cell(cursor: &mut Cursor<'_>, store: &mut ObjectStore, walker: &mut Walker<'_>) -> Result<Cell> {
	let start = cursor.pos() - Tag::WIDTH;
	let header = RecordHeader::parse(cursor)?;

	let mut cell = Cell {
		form_id: header.form_id,
		..Cell::default()
	};
	if cursor.remaining() >= Tag::WIDTH && cursor.peek_tag()? == Tag::EDID {
		cell.editor_id = Subrecord::read(cursor)?.text();
		if cursor.remaining() >= Tag::WIDTH && cursor.peek_tag()? == Tag::FULL {
			cell.full_name = Some(Subrecord::read(cursor)?.text());
		}
	}

	let end = start + Tag::WIDTH + RecordHeader::WIDTH + header.size as usize;
	cursor.seek_relative(end as i64 - cursor.pos() as i64)?;

	if cursor.remaining() >= Tag::WIDTH && cursor.peek_tag()? == Tag::GRUP {
		cursor.read_tag()?;
		if let GroupContent::Children(children) = walker.walk_group(cursor, store)? {
			cell.persistent = children.persistent;
			cell.temporary = children.temporary;
		}
	}

	Ok(cell)
}

#[cfg(test)]
mod tests {
	use super::assemble_cell;
	use crate::esm::bytes::Cursor;
	use crate::esm::file::ParseOptions;
	use crate::esm::group::Walker;
	use crate::esm::report::ParseReport;
	use crate::esm::store::ObjectStore;
	use crate::esm::Tag;

	fn sub(tag: Tag, payload: &[u8]) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend_from_slice(&tag.as_bytes());
		out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
		out.extend_from_slice(payload);
		out
	}

	fn cell_record(form_id: u32, subs: &[Vec<u8>]) -> Vec<u8> {
		let payload: Vec<u8> = subs.concat();
		let mut out = Vec::new();
		out.extend_from_slice(&Tag::CELL.as_bytes());
		out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&form_id.to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&15_u16.to_le_bytes());
		out.extend_from_slice(&0_i16.to_le_bytes());
		out.extend_from_slice(&payload);
		out
	}

	fn assemble(bytes: &[u8]) -> (super::Cell, usize) {
		let options = ParseOptions::default();
		let mut store = ObjectStore::new(options.scale);
		let mut report = ParseReport::default();
		let mut walker = Walker {
			options: &options,
			report: &mut report,
		};
		let mut cursor = Cursor::new(bytes);
		cursor.read_tag().expect("cell tag");
		let cell = assemble_cell(&mut cursor, &mut store, &mut walker).expect("cell assembles");
		(cell, cursor.pos())
	}

	#[test]
	fn childless_cell_keeps_identity_fields() {
		let bytes = cell_record(
			0x3200,
			&[sub(Tag::EDID, b"TestCell01\0"), sub(Tag::FULL, b"Test Cell\0")],
		);
		let (cell, end) = assemble(&bytes);

		assert_eq!(cell.form_id, 0x3200);
		assert_eq!(cell.editor_id, "TestCell01");
		assert_eq!(cell.full_name.as_deref(), Some("Test Cell"));
		assert!(cell.persistent.is_empty());
		assert!(cell.temporary.is_empty());
		assert_eq!(end, bytes.len());
	}

	#[test]
	fn display_name_is_optional() {
		let bytes = cell_record(0x3201, &[sub(Tag::EDID, b"BareCell\0")]);
		let (cell, _) = assemble(&bytes);
		assert_eq!(cell.editor_id, "BareCell");
		assert_eq!(cell.full_name, None);
	}

	#[test]
	fn unrecognized_cell_payload_is_jumped_by_declared_size() {
		// Lighting data after the identity fields must not move the end.
		let bytes = cell_record(
			0x3202,
			&[sub(Tag::EDID, b"LitCell\0"), sub(Tag(*b"XCLL"), &[0x11; 40])],
		);
		let (cell, end) = assemble(&bytes);
		assert_eq!(cell.editor_id, "LitCell");
		assert_eq!(end, bytes.len());
	}

	#[test]
	fn next_sibling_tag_is_left_unconsumed() {
		let mut bytes = cell_record(0x3203, &[sub(Tag::EDID, b"CellA\0")]);
		let cell_len = bytes.len();
		bytes.extend_from_slice(&Tag::CELL.as_bytes());

		let (_, end) = assemble(&bytes);
		assert_eq!(end, cell_len);
	}
}
