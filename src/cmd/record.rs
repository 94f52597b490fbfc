use std::collections::BTreeMap;
use std::path::PathBuf;

use esmdoc::esm::{DEFAULT_SCALE, EsmError, ParseOptions, PluginFile, Result, Tag, Value};

use crate::cmd::util::{emit_json, form_id_hex, parse_form_id};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub kind: String,
	#[arg(long = "id")]
	pub form_id: String,
	#[arg(long, default_value_t = DEFAULT_SCALE)]
	pub scale: f32,
	#[arg(long)]
	pub json: bool,
}

/// Look up one record by kind and form id and print its attributes.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		kind,
		form_id,
		scale,
		json,
	} = args;

	let kind: Tag = kind.parse()?;
	let form_id = parse_form_id(&form_id)?;

	let plugin = PluginFile::open(&path)?;
	let options = ParseOptions {
		scale,
		verbose_subrecords: false,
	};
	let output = plugin.parse(&options)?;
	let record = output
		.store
		.record(kind, form_id)
		.ok_or(EsmError::RecordNotFound { kind, form_id })?;

	if json {
		let attributes: BTreeMap<String, serde_json::Value> = record
			.attributes
			.iter()
			.map(|(tag, value)| (tag.to_string(), value_to_json(value)))
			.collect();
		let payload = RecordJson {
			kind: record.kind.to_string(),
			form_id: form_id_hex(record.form_id),
			flags: record.flags,
			form_version: record.form_version,
			attributes,
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("kind: {}", record.kind);
	println!("form_id: {}", form_id_hex(record.form_id));
	println!("flags: {:#010x}", record.flags);
	println!("form_version: {}", record.form_version);
	println!("attributes:");
	for (tag, value) in &record.attributes {
		println!("  {tag}: {}", render_value(value));
	}

	Ok(())
}

fn render_value(value: &Value) -> String {
	match value {
		Value::Text(text) => text.clone(),
		Value::FormId(id) => form_id_hex(*id),
		Value::ObjectCounts(counts) => counts
			.iter()
			.map(|(id, count)| format!("{}x{count}", form_id_hex(*id)))
			.collect::<Vec<_>>()
			.join(", "),
	}
}

fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Text(text) => serde_json::json!(text),
		Value::FormId(id) => serde_json::json!(form_id_hex(*id)),
		Value::ObjectCounts(counts) => {
			let map: serde_json::Map<String, serde_json::Value> = counts
				.iter()
				.map(|(id, count)| (form_id_hex(*id), serde_json::json!(count)))
				.collect();
			serde_json::Value::Object(map)
		}
	}
}

#[derive(serde::Serialize)]
struct RecordJson {
	kind: String,
	form_id: String,
	flags: u32,
	form_version: u16,
	attributes: BTreeMap<String, serde_json::Value>,
}
