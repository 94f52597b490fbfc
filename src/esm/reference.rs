use crate::esm::bytes::Cursor;
use crate::esm::group::Walker;
use crate::esm::record::RecordHeader;
use crate::esm::subrecord::Subrecord;
use crate::esm::{EsmError, Result, Tag};

/// Tags ending a placed-reference subrecord stream.
///
/// Reference records are interleaved with other placed-record kinds inside
/// children lists, so any of those kinds terminates the stream, not just the
/// reference's own tag.
const TERMINATORS: [Tag; 6] = [Tag::REFR, Tag::GRUP, Tag::ACHR, Tag::CELL, Tag::ACRE, Tag::PGRE];

/// One placed-object reference inside a cell, with its world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
	/// Form id of the referenced base record.
	pub target: u32,
	/// World position in output units.
	pub position: [f32; 3],
	/// Rotation in degrees, ordered pitch, yaw, roll.
	pub rotation: [f32; 3],
	/// Uniform actor scale in output units.
	pub scale: f32,
	/// Door opens by default.
	pub default_open: bool,
}

/// Decode one `REFR` record into a reference value.
///
/// The cursor must sit at the record's size field; the type tag has already
/// been consumed by the caller. The terminating tag is left unconsumed.
pub(crate) fn decode_reference(cursor: &mut Cursor<'_>, walker: &mut Walker<'_>) -> Result<Reference> {
	let start = cursor.pos() - Tag::WIDTH;
	let header = RecordHeader::parse(cursor)?;
	let payload_start = cursor.pos();
	let scale_factor = walker.options.scale;

	let mut reference = Reference {
		target: 0,
		position: [0.0; 3],
		rotation: [0.0; 3],
		scale: scale_factor,
		default_open: false,
	};

	loop {
		if cursor.remaining() < Tag::WIDTH {
			break;
		}
		if TERMINATORS.contains(&cursor.peek_tag()?) {
			break;
		}

		let sub_at = cursor.pos();
		let sub = Subrecord::read(cursor)?;
		match sub.tag {
			Tag::NAME => {
				let mut payload = Cursor::new(sub.payload);
				reference.target = payload.read_u32_le()?;
			}
			Tag::DATA => {
				let mut payload = Cursor::new(sub.payload);
				let x = payload.read_f32_le()?;
				let y = -payload.read_f32_le()?;
				let z = payload.read_f32_le()?;
				let rad_x = round_radians(payload.read_f32_le()?);
				let rad_y = round_radians(payload.read_f32_le()?);
				let rad_z = round_radians(payload.read_f32_le()?);

				reference.position = [x * scale_factor, y * scale_factor, z * scale_factor];
				// Output order is pitch from Y, yaw from Z (offset by a half
				// turn), roll from X.
				reference.rotation = [rad_y.to_degrees(), rad_z.to_degrees() + 180.0, rad_x.to_degrees()];
			}
			Tag::XSCL => {
				let mut payload = Cursor::new(sub.payload);
				reference.scale = payload.read_f32_le()? * scale_factor;
			}
			Tag::ONAM => reference.default_open = true,
			unknown => walker.note_unknown_subrecord(sub_at, Tag::REFR, unknown, sub.payload),
		}
	}

	let consumed = cursor.pos() - payload_start;
	if consumed != header.size as usize {
		return Err(EsmError::RecordSizeMismatch {
			at: start,
			kind: Tag::REFR,
			declared: header.size,
			consumed,
		});
	}
	Ok(reference)
}

/// Quantize a raw radian value to 5 decimal places to damp float noise.
fn round_radians(value: f32) -> f32 {
	(value * 100_000.0).round() / 100_000.0
}

#[cfg(test)]
mod tests {
	use super::decode_reference;
	use crate::esm::bytes::Cursor;
	use crate::esm::file::ParseOptions;
	use crate::esm::group::Walker;
	use crate::esm::report::ParseReport;
	use crate::esm::Tag;

	fn sub(tag: Tag, payload: &[u8]) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend_from_slice(&tag.as_bytes());
		out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
		out.extend_from_slice(payload);
		out
	}

	fn placement(position: [f32; 3], rotation: [f32; 3]) -> Vec<u8> {
		let mut out = Vec::new();
		for value in position.into_iter().chain(rotation) {
			out.extend_from_slice(&value.to_le_bytes());
		}
		out
	}

	fn refr(subs: &[Vec<u8>]) -> Vec<u8> {
		let payload: Vec<u8> = subs.concat();
		let mut out = Vec::new();
		out.extend_from_slice(&Tag::REFR.as_bytes());
		out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&0x9000_u32.to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&15_u16.to_le_bytes());
		out.extend_from_slice(&0_i16.to_le_bytes());
		out.extend_from_slice(&payload);
		out
	}

	fn decode(bytes: &[u8], options: &ParseOptions) -> (super::Reference, ParseReport, usize) {
		let mut report = ParseReport::default();
		let mut walker = Walker {
			options,
			report: &mut report,
		};
		let mut cursor = Cursor::new(bytes);
		cursor.read_tag().expect("refr tag");
		let reference = decode_reference(&mut cursor, &mut walker).expect("reference decodes");
		let end = cursor.pos();
		(reference, report, end)
	}

	#[test]
	fn zero_placement_maps_to_half_turn_yaw() {
		let bytes = refr(&[
			sub(Tag::NAME, &0x200_u32.to_le_bytes()),
			sub(Tag::DATA, &placement([0.0; 3], [0.0; 3])),
		]);
		let (reference, _, end) = decode(&bytes, &ParseOptions::default());

		assert_eq!(end, bytes.len());
		assert_eq!(reference.target, 0x200);
		assert_eq!(reference.position, [0.0, -0.0, 0.0]);
		assert_eq!(reference.rotation, [0.0, 180.0, 0.0]);
		assert_eq!(reference.scale, 1.4);
		assert!(!reference.default_open);
	}

	#[test]
	fn position_scales_and_flips_y() {
		let options = ParseOptions {
			scale: 2.0,
			..ParseOptions::default()
		};
		let bytes = refr(&[sub(Tag::DATA, &placement([10.0, 4.0, -3.0], [0.0; 3]))]);
		let (reference, _, _) = decode(&bytes, &options);

		assert_eq!(reference.position, [20.0, -8.0, -6.0]);
	}

	#[test]
	fn transform_is_scale_linear() {
		let raw = placement([12.5, -7.25, 3.0], [0.5, -1.25, 2.0]);

		let base = ParseOptions {
			scale: 1.4,
			..ParseOptions::default()
		};
		let doubled = ParseOptions {
			scale: 2.8,
			..ParseOptions::default()
		};
		let (reference_base, _, _) = decode(&refr(&[sub(Tag::DATA, &raw)]), &base);
		let (reference_doubled, _, _) = decode(&refr(&[sub(Tag::DATA, &raw)]), &doubled);

		for axis in 0..3 {
			assert_eq!(reference_doubled.position[axis], reference_base.position[axis] * 2.0);
			assert_eq!(reference_doubled.rotation[axis], reference_base.rotation[axis]);
		}
	}

	#[test]
	fn explicit_scale_override_wins_in_either_order() {
		let raw = placement([1.0, 1.0, 1.0], [0.0; 3]);

		let after = refr(&[
			sub(Tag::DATA, &raw),
			sub(Tag::XSCL, &0.5_f32.to_le_bytes()),
		]);
		let before = refr(&[
			sub(Tag::XSCL, &0.5_f32.to_le_bytes()),
			sub(Tag::DATA, &raw),
		]);

		let (reference_after, _, _) = decode(&after, &ParseOptions::default());
		let (reference_before, _, _) = decode(&before, &ParseOptions::default());
		assert_eq!(reference_after.scale, 0.5 * 1.4);
		assert_eq!(reference_before.scale, 0.5 * 1.4);
	}

	#[test]
	fn door_default_open_flag() {
		let bytes = refr(&[
			sub(Tag::NAME, &0x77_u32.to_le_bytes()),
			sub(Tag::ONAM, b""),
		]);
		let (reference, _, _) = decode(&bytes, &ParseOptions::default());
		assert!(reference.default_open);
	}

	#[test]
	fn stops_at_any_placed_record_terminator() {
		let mut bytes = refr(&[sub(Tag::NAME, &0x1_u32.to_le_bytes())]);
		bytes.extend_from_slice(&Tag::ACHR.as_bytes());

		let (reference, _, end) = decode(&bytes, &ParseOptions::default());
		assert_eq!(reference.target, 0x1);
		assert_eq!(end, bytes.len() - Tag::WIDTH);
	}

	#[test]
	fn unknown_subrecords_reported_only_in_verbose_mode() {
		let bytes = refr(&[sub(Tag(*b"XTEL"), &[0_u8; 4])]);

		let (_, quiet, _) = decode(&bytes, &ParseOptions::default());
		assert!(quiet.unknown_subrecords.is_empty());

		let verbose = ParseOptions {
			verbose_subrecords: true,
			..ParseOptions::default()
		};
		let (_, report, _) = decode(&bytes, &verbose);
		assert_eq!(report.unknown_subrecords.len(), 1);
		assert_eq!(report.unknown_subrecords[0].tag, Tag(*b"XTEL"));
		assert_eq!(report.unknown_subrecords[0].record, Tag::REFR);
	}
}
