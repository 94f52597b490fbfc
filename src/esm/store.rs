use std::collections::BTreeMap;

use crate::esm::cell::Cell;
use crate::esm::record::Record;
use crate::esm::Tag;

/// All decoded records and the interior cell hierarchy from one parse.
///
/// Populated monotonically during a single forward pass; nothing is ever
/// removed. Handed whole to the exporter afterwards.
pub struct ObjectStore {
	records: BTreeMap<Tag, BTreeMap<u32, Record>>,
	interior: CellTree,
	scale: f32,
}

impl ObjectStore {
	/// Create an empty store carrying the parse-time scale factor.
	pub(crate) fn new(scale: f32) -> Self {
		Self {
			records: BTreeMap::new(),
			interior: CellTree::default(),
			scale,
		}
	}

	/// Uniform scale factor the parse applied to reference transforms.
	pub fn scale(&self) -> f32 {
		self.scale
	}

	/// Insert a record under its kind and form id, replacing any earlier one.
	pub(crate) fn insert(&mut self, record: Record) {
		self.records.entry(record.kind).or_default().insert(record.form_id, record);
	}

	/// Look up one record by kind and form id.
	pub fn record(&self, kind: Tag, form_id: u32) -> Option<&Record> {
		self.records.get(&kind)?.get(&form_id)
	}

	/// All records of one kind, ordered by form id.
	pub fn records_of(&self, kind: Tag) -> impl Iterator<Item = &Record> {
		self.records.get(&kind).into_iter().flat_map(|entries| entries.values())
	}

	/// Record kinds present in the store with their entry counts.
	pub fn kind_counts(&self) -> impl Iterator<Item = (Tag, usize)> {
		self.records.iter().map(|(kind, entries)| (*kind, entries.len()))
	}

	/// The interior cell hierarchy.
	pub fn interior(&self) -> &CellTree {
		&self.interior
	}

	pub(crate) fn interior_mut(&mut self) -> &mut CellTree {
		&mut self.interior
	}
}

/// Interior cell hierarchy addressed by parse order.
///
/// Block, sub-block, and cell positions are assigned as they are parsed;
/// the signed labels carried by the group headers are informational only.
#[derive(Debug, Clone, Default)]
pub struct CellTree {
	blocks: Vec<CellBlock>,
}

impl CellTree {
	/// All interior blocks, in parse order.
	pub fn blocks(&self) -> &[CellBlock] {
		&self.blocks
	}

	/// Cells under one (block, sub-block) slot, in parse order.
	pub fn cells_under(&self, block: usize, sub: usize) -> Option<&[Cell]> {
		Some(self.blocks.get(block)?.subs.get(sub)?.cells.as_slice())
	}

	/// Total number of cells across all blocks.
	pub fn cell_count(&self) -> usize {
		self.blocks.iter().flat_map(|block| &block.subs).map(|sub| sub.cells.len()).sum()
	}

	pub(crate) fn push_block(&mut self, block: CellBlock) {
		self.blocks.push(block);
	}
}

/// One interior cell block, holding sub-blocks in parse order.
#[derive(Debug, Clone)]
pub struct CellBlock {
	/// Signed block number from the group label.
	pub label: i32,
	/// Sub-blocks in parse order.
	pub subs: Vec<CellSubBlock>,
}

/// One interior cell sub-block, holding cells in parse order.
#[derive(Debug, Clone)]
pub struct CellSubBlock {
	/// Signed sub-block number from the group label.
	pub label: i32,
	/// Cells in parse order.
	pub cells: Vec<Cell>,
}
