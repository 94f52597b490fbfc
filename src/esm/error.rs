use thiserror::Error;

use crate::esm::Tag;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, EsmError>;

/// Errors produced while reading and decoding plugin data.
#[derive(Debug, Error)]
pub enum EsmError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Relative seek would land before the start of the stream.
	#[error("seek before stream start (offset {at}, delta {delta})")]
	SeekBeforeStart {
		/// Byte offset where the seek was attempted.
		at: usize,
		/// Requested signed delta.
		delta: i64,
	},
	/// Record subrecord stream did not match the declared payload size.
	#[error("record {kind} at offset {at} declared {declared} payload bytes, consumed {consumed}")]
	RecordSizeMismatch {
		/// File offset of the record's type tag.
		at: usize,
		/// Record type tag.
		kind: Tag,
		/// Declared payload size from the record header.
		declared: u32,
		/// Payload bytes actually consumed.
		consumed: usize,
	},
	/// CLI record kind argument was invalid.
	#[error("invalid record kind: {value}")]
	InvalidRecordKind {
		/// User-provided kind string.
		value: String,
	},
	/// CLI form id literal was invalid.
	#[error("invalid form id literal: {value}")]
	InvalidFormId {
		/// User-provided form id string.
		value: String,
	},
	/// Requested record was not found in the store.
	#[error("record not found: {kind} {form_id:#010x}")]
	RecordNotFound {
		/// Requested record kind.
		kind: Tag,
		/// Requested form id.
		form_id: u32,
	},
}
