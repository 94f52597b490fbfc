use crate::esm::Tag;

/// Why a group was skipped instead of parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	/// Group type code outside the recognized set.
	UnknownGroupType,
	/// Top-level label naming a record kind with no decoder.
	UnsupportedLabel,
}

/// One group skipped whole by its declared size.
#[derive(Debug, Clone)]
pub struct SkippedGroup {
	/// File offset of the group tag.
	pub at: usize,
	/// Group label bytes rendered as a tag.
	pub label: Tag,
	/// Raw group type code.
	pub group_type: i32,
	/// Declared total group size.
	pub size: u32,
	/// Why the group was skipped.
	pub reason: SkipReason,
}

/// One record skipped by its declared size.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
	/// File offset of the record tag.
	pub at: usize,
	/// Record type tag.
	pub kind: Tag,
	/// Declared payload size.
	pub size: u32,
}

/// One unrecognized subrecord, collected in verbose mode only.
#[derive(Debug, Clone)]
pub struct UnknownSubrecord {
	/// File offset of the subrecord tag.
	pub at: usize,
	/// Record type the subrecord appeared in.
	pub record: Tag,
	/// Subrecord tag.
	pub tag: Tag,
	/// Payload rendered as text for display.
	pub preview: String,
}

/// Recoverable diagnostics accumulated across one parse.
///
/// Nothing here aborts a parse; the CLI renders entries on request.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
	/// Groups skipped whole.
	pub skipped_groups: Vec<SkippedGroup>,
	/// Records skipped at the top level or inside children lists.
	pub skipped_records: Vec<SkippedRecord>,
	/// Unrecognized subrecords observed in verbose mode.
	pub unknown_subrecords: Vec<UnknownSubrecord>,
}
