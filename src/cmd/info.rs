use std::path::PathBuf;

use esmdoc::esm::{DEFAULT_SCALE, ParseOptions, PluginFile, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, default_value_t = DEFAULT_SCALE)]
	pub scale: f32,
	#[arg(long)]
	pub all_subs: bool,
	#[arg(long)]
	pub json: bool,
}

/// Print record, cell, and skip statistics for one plugin.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		scale,
		all_subs,
		json,
	} = args;

	let plugin = PluginFile::open(&path)?;
	let options = ParseOptions {
		scale,
		verbose_subrecords: all_subs,
	};
	let output = plugin.parse(&options)?;
	let store = &output.store;
	let report = &output.report;

	let kinds: Vec<KindCountJson> = store
		.kind_counts()
		.map(|(kind, count)| KindCountJson {
			kind: kind.to_string(),
			count,
		})
		.collect();

	let interior = store.interior();
	let sub_blocks: usize = interior.blocks().iter().map(|block| block.subs.len()).sum();
	let mut persistent_refs = 0_usize;
	let mut temporary_refs = 0_usize;
	for block in interior.blocks() {
		for sub in &block.subs {
			for cell in &sub.cells {
				persistent_refs += cell.persistent.len();
				temporary_refs += cell.temporary.len();
			}
		}
	}

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			scale: store.scale(),
			record_kinds: kinds,
			interior_blocks: interior.blocks().len(),
			interior_sub_blocks: sub_blocks,
			interior_cells: interior.cell_count(),
			persistent_refs,
			temporary_refs,
			skipped_groups: report.skipped_groups.len(),
			skipped_records: report.skipped_records.len(),
			unknown_subrecords: report.unknown_subrecords.len(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("scale: {}", store.scale());
	println!("record_kinds:");
	for entry in &kinds {
		println!("  {}: {}", entry.kind, entry.count);
	}
	println!("interior_blocks: {}", interior.blocks().len());
	println!("interior_sub_blocks: {sub_blocks}");
	println!("interior_cells: {}", interior.cell_count());
	println!("persistent_refs: {persistent_refs}");
	println!("temporary_refs: {temporary_refs}");

	println!("skipped_groups: {}", report.skipped_groups.len());
	for group in &report.skipped_groups {
		println!(
			"  {} type {} at {} ({} bytes)",
			group.label, group.group_type, group.at, group.size
		);
	}
	println!("skipped_records: {}", report.skipped_records.len());

	if all_subs {
		println!("unknown_subrecords: {}", report.unknown_subrecords.len());
		for sub in &report.unknown_subrecords {
			println!("  {} in {} at {}: {}", sub.tag, sub.record, sub.at, sub.preview);
		}
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct KindCountJson {
	kind: String,
	count: usize,
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	scale: f32,
	record_kinds: Vec<KindCountJson>,
	interior_blocks: usize,
	interior_sub_blocks: usize,
	interior_cells: usize,
	persistent_refs: usize,
	temporary_refs: usize,
	skipped_groups: usize,
	skipped_records: usize,
	unknown_subrecords: usize,
}
