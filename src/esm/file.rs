use std::fs;
use std::path::Path;

use crate::esm::bytes::Cursor;
use crate::esm::group::{Walker, skip_record};
use crate::esm::report::{ParseReport, SkippedRecord};
use crate::esm::store::ObjectStore;
use crate::esm::{Result, Tag};

/// Default uniform scale factor applied to reference transforms.
pub const DEFAULT_SCALE: f32 = 1.4;

/// Externally supplied parse configuration.
#[derive(Debug, Clone)]
pub struct ParseOptions {
	/// Uniform scale factor shared by the parser and the exporter.
	pub scale: f32,
	/// Collect unrecognized subrecord tags into the parse report.
	pub verbose_subrecords: bool,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			scale: DEFAULT_SCALE,
			verbose_subrecords: false,
		}
	}
}

/// An ESM/ESP plugin image loaded into memory.
pub struct PluginFile {
	bytes: Vec<u8>,
}

impl PluginFile {
	/// Read a plugin file from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Ok(Self { bytes: fs::read(path)? })
	}

	/// Wrap an in-memory plugin image.
	pub fn from_bytes(bytes: Vec<u8>) -> Self {
		Self { bytes }
	}

	/// Raw plugin bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Parse the plugin into an object store in one forward pass.
	pub fn parse(&self, options: &ParseOptions) -> Result<ParseOutput> {
		let mut cursor = Cursor::new(&self.bytes);
		let mut store = ObjectStore::new(options.scale);
		let mut report = ParseReport::default();
		let mut walker = Walker {
			options,
			report: &mut report,
		};

		while cursor.remaining() > 0 {
			let tag = cursor.read_tag()?;
			if tag == Tag::GRUP {
				walker.walk_group(&mut cursor, &mut store)?;
			} else {
				// Top-level records (the file header among them) carry
				// nothing the scene model needs.
				let at = cursor.pos() - Tag::WIDTH;
				let size = skip_record(&mut cursor)?;
				walker.report.skipped_records.push(SkippedRecord { at, kind: tag, size });
			}
		}

		Ok(ParseOutput { store, report })
	}
}

/// Parsed object model plus accumulated diagnostics.
pub struct ParseOutput {
	/// The populated object store.
	pub store: ObjectStore,
	/// Recoverable diagnostics gathered during the parse.
	pub report: ParseReport,
}

#[cfg(test)]
mod tests {
	use super::{ParseOptions, PluginFile};
	use crate::esm::Tag;

	#[test]
	fn empty_stream_parses_to_empty_store() {
		let plugin = PluginFile::from_bytes(Vec::new());
		let output = plugin.parse(&ParseOptions::default()).expect("empty parse");
		assert_eq!(output.store.kind_counts().count(), 0);
		assert_eq!(output.store.interior().blocks().len(), 0);
		assert!(output.report.skipped_records.is_empty());
	}

	#[test]
	fn top_level_record_is_skipped_and_counted() {
		// A bare header-style record with an 8-byte payload.
		let mut bytes = Vec::new();
		bytes.extend_from_slice(b"TES4");
		bytes.extend_from_slice(&8_u32.to_le_bytes());
		bytes.extend_from_slice(&[0_u8; 16]);
		bytes.extend_from_slice(&[0xCD_u8; 8]);

		let plugin = PluginFile::from_bytes(bytes);
		let output = plugin.parse(&ParseOptions::default()).expect("parse succeeds");
		assert_eq!(output.report.skipped_records.len(), 1);
		assert_eq!(output.report.skipped_records[0].kind, Tag(*b"TES4"));
		assert_eq!(output.report.skipped_records[0].at, 0);
		assert_eq!(output.report.skipped_records[0].size, 8);
	}

	#[test]
	fn truncated_stream_is_fatal() {
		let plugin = PluginFile::from_bytes(b"GR".to_vec());
		assert!(plugin.parse(&ParseOptions::default()).is_err());
	}
}
