use crate::esm::bytes::Cursor;
use crate::esm::cell::{CellChildren, assemble_cell};
use crate::esm::file::ParseOptions;
use crate::esm::record::decode_record;
use crate::esm::reference::{Reference, decode_reference};
use crate::esm::report::{ParseReport, SkipReason, SkippedGroup, SkippedRecord, UnknownSubrecord};
use crate::esm::store::{CellBlock, CellSubBlock, ObjectStore};
use crate::esm::subrecord::decode_text;
use crate::esm::tag::is_placeable_kind;
use crate::esm::{Result, Tag};

/// Fixed group header fields, including the 4-byte `GRUP` tag.
#[derive(Debug, Clone, Copy)]
pub struct GroupHeader {
	/// Total group size in bytes, header included.
	pub size: u32,
	/// Raw label bytes; meaning depends on the group type.
	pub label: [u8; 4],
	/// Group type code selecting the nesting rules.
	pub group_type: i32,
	/// Timestamp/version word.
	pub stamp: u32,
}

impl GroupHeader {
	/// Encoded width of the header, including the group tag.
	pub const WIDTH: usize = 20;

	/// Parse a group header from a cursor positioned at the size field.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		Ok(Self {
			size: cursor.read_u32_le()?,
			label: cursor.read_tag()?.as_bytes(),
			group_type: cursor.read_i32_le()?,
			stamp: cursor.read_u32_le()?,
		})
	}

	/// Interpret the label as a record-type tag (top-level groups).
	pub fn label_tag(&self) -> Tag {
		Tag(self.label)
	}

	/// Interpret the label as a signed block or sub-block number.
	pub fn label_index(&self) -> i32 {
		i32::from_le_bytes(self.label)
	}
}

/// Group type codes with defined nesting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
	/// Top-level group labelled with a record-type tag.
	Top,
	/// Interior cell block holding sub-block groups.
	InteriorBlock,
	/// Interior cell sub-block holding cell records.
	InteriorSubBlock,
	/// Wrapper around one cell's child reference lists.
	CellChildren,
	/// Persistent placed-object list.
	PersistentChildren,
	/// Temporary placed-object list.
	TemporaryChildren,
}

impl GroupKind {
	/// Map a raw group type code to its nesting rules, if recognized.
	pub fn from_code(code: i32) -> Option<Self> {
		match code {
			0 => Some(Self::Top),
			2 => Some(Self::InteriorBlock),
			3 => Some(Self::InteriorSubBlock),
			6 => Some(Self::CellChildren),
			8 => Some(Self::PersistentChildren),
			9 => Some(Self::TemporaryChildren),
			_ => None,
		}
	}
}

/// Parsed content of one group, by nesting kind.
pub(crate) enum GroupContent {
	/// Flat run of generic records, inserted into the store.
	Records,
	/// The interior cell hierarchy root; blocks were pushed to the store.
	InteriorCells,
	/// One interior block, outside the cell hierarchy root.
	Block,
	/// One interior sub-block, outside a block run.
	SubBlock,
	/// Persistent/temporary lists for one cell.
	Children(CellChildren),
	/// One placed-object list, outside a children wrapper.
	References,
	/// Unrecognized group, skipped by declared size.
	Skipped,
}

/// Recursive-descent walker over the group grammar.
pub(crate) struct Walker<'w> {
	/// Externally supplied parse configuration.
	pub options: &'w ParseOptions,
	/// Accumulated recoverable diagnostics.
	pub report: &'w mut ParseReport,
}

impl Walker<'_> {
	/// Dispatch one group by its type code.
	///
	/// The cursor must sit at the group's size field; the `GRUP` tag has
	/// already been consumed by the caller.
	pub fn walk_group(&mut self, cursor: &mut Cursor<'_>, store: &mut ObjectStore) -> Result<GroupContent> {
		let start = cursor.pos() - Tag::WIDTH;
		let header = GroupHeader::parse(cursor)?;

		match GroupKind::from_code(header.group_type) {
			Some(GroupKind::Top) => self.walk_top(cursor, store, start, &header),
			Some(GroupKind::InteriorBlock) => {
				self.walk_block(cursor, store, &header)?;
				Ok(GroupContent::Block)
			}
			Some(GroupKind::InteriorSubBlock) => {
				self.walk_sub_block(cursor, store, &header)?;
				Ok(GroupContent::SubBlock)
			}
			Some(GroupKind::CellChildren) => Ok(GroupContent::Children(self.walk_cell_children(cursor)?)),
			Some(GroupKind::PersistentChildren) | Some(GroupKind::TemporaryChildren) => {
				self.walk_reference_list(cursor)?;
				Ok(GroupContent::References)
			}
			None => {
				self.report.skipped_groups.push(SkippedGroup {
					at: start,
					label: header.label_tag(),
					group_type: header.group_type,
					size: header.size,
					reason: SkipReason::UnknownGroupType,
				});
				skip_group_remainder(cursor, &header)?;
				Ok(GroupContent::Skipped)
			}
		}
	}

	/// Parse one top-level group: the cell-hierarchy root, a flat record
	/// run, or an unsupported label skipped whole.
	fn walk_top(
		&mut self,
		cursor: &mut Cursor<'_>,
		store: &mut ObjectStore,
		start: usize,
		header: &GroupHeader,
	) -> Result<GroupContent> {
		let label = header.label_tag();

		if label == Tag::CELL {
			// Interior blocks only. Exterior blocks use other type codes and
			// are left for the top-level dispatcher to skip.
			while matches!(peek_group_kind(cursor)?, Some(GroupKind::InteriorBlock)) {
				cursor.read_tag()?;
				let child = GroupHeader::parse(cursor)?;
				let block = self.walk_block(cursor, store, &child)?;
				store.interior_mut().push_block(block);
			}
			return Ok(GroupContent::InteriorCells);
		}

		if is_placeable_kind(label) {
			loop {
				if cursor.remaining() < Tag::WIDTH || cursor.peek_tag()? != label {
					break;
				}
				cursor.read_tag()?;
				decode_record(cursor, label, store, self)?;
			}
			return Ok(GroupContent::Records);
		}

		self.report.skipped_groups.push(SkippedGroup {
			at: start,
			label,
			group_type: header.group_type,
			size: header.size,
			reason: SkipReason::UnsupportedLabel,
		});
		skip_group_remainder(cursor, header)?;
		Ok(GroupContent::Skipped)
	}

	/// Parse one interior block: a run of sub-block groups.
	fn walk_block(&mut self, cursor: &mut Cursor<'_>, store: &mut ObjectStore, header: &GroupHeader) -> Result<CellBlock> {
		let mut block = CellBlock {
			label: header.label_index(),
			subs: Vec::new(),
		};
		while matches!(peek_group_kind(cursor)?, Some(GroupKind::InteriorSubBlock)) {
			cursor.read_tag()?;
			let child = GroupHeader::parse(cursor)?;
			block.subs.push(self.walk_sub_block(cursor, store, &child)?);
		}
		Ok(block)
	}

	/// Parse one interior sub-block: a run of cell records.
	fn walk_sub_block(&mut self, cursor: &mut Cursor<'_>, store: &mut ObjectStore, header: &GroupHeader) -> Result<CellSubBlock> {
		let mut sub = CellSubBlock {
			label: header.label_index(),
			cells: Vec::new(),
		};
		loop {
			if cursor.remaining() < Tag::WIDTH || cursor.peek_tag()? != Tag::CELL {
				break;
			}
			cursor.read_tag()?;
			sub.cells.push(assemble_cell(cursor, store, self)?);
		}
		Ok(sub)
	}

	/// Parse one cell-children wrapper: up to two persistent/temporary lists.
	fn walk_cell_children(&mut self, cursor: &mut Cursor<'_>) -> Result<CellChildren> {
		let mut children = CellChildren::default();
		loop {
			let Some(kind @ (GroupKind::PersistentChildren | GroupKind::TemporaryChildren)) = peek_group_kind(cursor)?
			else {
				break;
			};
			cursor.read_tag()?;
			GroupHeader::parse(cursor)?;
			let references = self.walk_reference_list(cursor)?;
			match kind {
				GroupKind::PersistentChildren => children.persistent = references,
				_ => children.temporary = references,
			}
		}
		Ok(children)
	}

	/// Parse one persistent/temporary list of placed-object records.
	fn walk_reference_list(&mut self, cursor: &mut Cursor<'_>) -> Result<Vec<Reference>> {
		let mut references = Vec::new();
		loop {
			if cursor.remaining() < Tag::WIDTH {
				break;
			}
			let tag = cursor.peek_tag()?;
			if tag == Tag::GRUP || tag == Tag::CELL {
				break;
			}
			cursor.read_tag()?;
			if tag == Tag::REFR {
				references.push(decode_reference(cursor, self)?);
			} else {
				let at = cursor.pos() - Tag::WIDTH;
				let size = skip_record(cursor)?;
				self.report.skipped_records.push(SkippedRecord { at, kind: tag, size });
			}
		}
		Ok(references)
	}

	/// Record an unrecognized subrecord when verbose reporting is on.
	pub fn note_unknown_subrecord(&mut self, at: usize, record: Tag, tag: Tag, payload: &[u8]) {
		if !self.options.verbose_subrecords {
			return;
		}
		self.report.unknown_subrecords.push(UnknownSubrecord {
			at,
			record,
			tag,
			preview: decode_text(payload),
		});
	}
}

/// Peek the type code of a group starting at the cursor, without consuming.
///
/// Returns `None` when the next structure is not a recognized group.
fn peek_group_kind(cursor: &mut Cursor<'_>) -> Result<Option<GroupKind>> {
	if cursor.remaining() < GroupHeader::WIDTH - Tag::WIDTH {
		return Ok(None);
	}
	if cursor.peek_tag()? != Tag::GRUP {
		return Ok(None);
	}

	// Tag, size, and label sit before the type code.
	cursor.seek_relative(12)?;
	let code = cursor.read_i32_le()?;
	cursor.seek_relative(-16)?;
	Ok(GroupKind::from_code(code))
}

/// Skip a record from its size field; returns the declared payload size.
pub(crate) fn skip_record(cursor: &mut Cursor<'_>) -> Result<u32> {
	let size = cursor.read_u32_le()?;
	cursor.seek_relative(i64::from(size) + 16)?;
	Ok(size)
}

/// Skip the rest of a group whose header was just consumed.
fn skip_group_remainder(cursor: &mut Cursor<'_>, header: &GroupHeader) -> Result<()> {
	cursor.seek_relative(i64::from(header.size) - GroupHeader::WIDTH as i64)
}
