use std::path::PathBuf;

use esmdoc::esm::{DEFAULT_SCALE, ParseOptions, PluginFile, Result};

use crate::cmd::util::{emit_json, form_id_hex};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub block: Option<usize>,
	#[arg(long)]
	pub sub: Option<usize>,
	#[arg(long, default_value_t = DEFAULT_SCALE)]
	pub scale: f32,
	#[arg(long)]
	pub json: bool,
}

/// List interior cells with their placed-reference counts.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		block,
		sub,
		scale,
		json,
	} = args;

	let plugin = PluginFile::open(&path)?;
	let options = ParseOptions {
		scale,
		verbose_subrecords: false,
	};
	let output = plugin.parse(&options)?;

	let mut rows = Vec::new();
	for (block_index, block_entry) in output.store.interior().blocks().iter().enumerate() {
		if block.is_some_and(|wanted| wanted != block_index) {
			continue;
		}
		for (sub_index, sub_entry) in block_entry.subs.iter().enumerate() {
			if sub.is_some_and(|wanted| wanted != sub_index) {
				continue;
			}
			for cell in &sub_entry.cells {
				rows.push(CellJson {
					block: block_index,
					sub: sub_index,
					form_id: form_id_hex(cell.form_id),
					editor_id: cell.editor_id.clone(),
					full_name: cell.full_name.clone(),
					persistent: cell.persistent.len(),
					temporary: cell.temporary.len(),
				});
			}
		}
	}

	if json {
		emit_json(&rows);
		return Ok(());
	}

	for row in &rows {
		let full_name = row.full_name.as_deref().unwrap_or("-");
		println!(
			"{}/{} {} {} ({}) persistent={} temporary={}",
			row.block, row.sub, row.form_id, row.editor_id, full_name, row.persistent, row.temporary
		);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct CellJson {
	block: usize,
	sub: usize,
	form_id: String,
	editor_id: String,
	full_name: Option<String>,
	persistent: usize,
	temporary: usize,
}
