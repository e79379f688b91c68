//! Metadata block: `key=value\0` entries following the script region

use crate::constants::{EXTENT_MARGIN, EXTRUDER_COUNT, FORMAT_VERSION};
use crate::error::FcodeError;
use crate::sink::ByteSink;
use crate::stats::Statistics;
use crate::writer::PrimitiveWriter;

/// Keys synthesized by the encoder, in on-disk order
pub const SYNTHESIZED_KEYS: [&str; 9] = [
    "VERSION",
    "HEAD_TYPE",
    "TIME_COST",
    "TRAVEL_DIST",
    "MAX_X",
    "MAX_Y",
    "MAX_Z",
    "MAX_R",
    "FILAMENT_USED",
];

/// Build the full entry list: synthesized entries first, then `extra` in order
pub fn build_entries(
    head_type: &str,
    stats: &Statistics,
    extra: &[(String, String)],
) -> Vec<(String, String)> {
    let synthesized = [
        FORMAT_VERSION.to_string(),
        head_type.to_string(),
        fixed(stats.time_cost),
        fixed(stats.distance_traveled),
        fixed(stats.max_x + EXTENT_MARGIN),
        fixed(stats.max_y + EXTENT_MARGIN),
        fixed(stats.max_z + EXTENT_MARGIN),
        fixed(stats.max_radius + EXTENT_MARGIN),
        filament_used(&stats.filament_used),
    ];

    SYNTHESIZED_KEYS
        .iter()
        .map(|k| k.to_string())
        .zip(synthesized)
        .chain(extra.iter().cloned())
        .collect()
}

/// Comma-joined extruder totals; trailing unused extruders are omitted
///
/// Extruder 0 is always listed, extruder 1 when it or extruder 2 is
/// nonzero, extruder 2 when it is nonzero.
pub fn filament_used(filament: &[f64; EXTRUDER_COUNT]) -> String {
    let count = if filament[2] != 0.0 {
        3
    } else if filament[1] != 0.0 {
        2
    } else {
        1
    };

    filament[..count]
        .iter()
        .map(|&v| fixed(v))
        .collect::<Vec<_>>()
        .join(",")
}

fn fixed(v: f64) -> String {
    format!("{:.2}", v)
}

/// Check that a caller entry can be written as `key=value\0`
pub fn validate_entry(key: &str, value: &str) -> Result<(), FcodeError> {
    if key.is_empty() {
        return Err(FcodeError::InvalidMetadata("empty key".to_string()));
    }
    if key.contains(&['=', '\0'][..]) {
        return Err(FcodeError::InvalidMetadata(format!(
            "key {:?} contains '=' or NUL",
            key
        )));
    }
    if value.contains('\0') {
        return Err(FcodeError::InvalidMetadata(format!(
            "value of {:?} contains NUL",
            key
        )));
    }
    Ok(())
}

/// Write every entry, returning the checksum over exactly those bytes
pub fn write_block<S: ByteSink>(w: &mut PrimitiveWriter<S>, entries: &[(String, String)]) -> u32 {
    let mut crc = 0u32;
    for (key, value) in entries {
        w.write_bytes(key.as_bytes(), Some(&mut crc));
        w.write_bytes(b"=", Some(&mut crc));
        w.write_bytes(value.as_bytes(), Some(&mut crc));
        w.write_bytes(b"\0", Some(&mut crc));
    }
    crc
}
