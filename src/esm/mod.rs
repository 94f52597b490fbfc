mod bytes;
mod cell;
mod error;
mod file;
mod group;
mod record;
mod reference;
mod report;
mod store;
mod subrecord;
mod tag;

/// Bounded byte cursor with tag lookahead.
pub use bytes::Cursor;
/// Cell entity and its children lists.
pub use cell::{Cell, CellChildren};
/// Error and result aliases.
pub use error::{EsmError, Result};
/// File abstraction, parse options, and parse output.
pub use file::{DEFAULT_SCALE, ParseOptions, ParseOutput, PluginFile};
/// Group header and type codes.
pub use group::{GroupHeader, GroupKind};
/// Record header, decoded record, and attribute values.
pub use record::{Record, RecordHeader, Value};
/// Placed-reference value with its world transform.
pub use reference::Reference;
/// Recoverable parse diagnostics.
pub use report::{ParseReport, SkipReason, SkippedGroup, SkippedRecord, UnknownSubrecord};
/// Object store and the interior cell hierarchy.
pub use store::{CellBlock, CellSubBlock, CellTree, ObjectStore};
/// Subrecord scanner and text decoding.
pub use subrecord::{Subrecord, decode_text};
/// Tag newtype and the placeable kind set.
pub use tag::{PLACEABLE_KINDS, Tag, is_placeable_kind};
