use alloc::{string::ToString, vec::Vec};

use crate::{Error, Result};

/// Parses a comma separated list of numbers, e.g `"0,2,-2.5"`.
///
/// Whitespace around values is ignored, as is a single trailing comma.
/// An empty or whitespace only string yields an empty list.
pub fn parse_values(text: &str) -> Result<Vec<f32>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let text = text.strip_suffix(',').unwrap_or(text);

    let mut values = Vec::new();
    for (index, token) in text.split(',').enumerate() {
        let token = token.trim();
        match token.parse::<f32>() {
            Ok(value) => values.push(value),
            Err(_) => {
                return Err(Error::ParseValue {
                    token: token.to_string(),
                    index,
                })
            }
        }
    }
    Ok(values)
}

/// Stretches onsets measured on a melody-only track of length `source_length` seconds
/// so that they line up with a backing track of length `target_length` seconds.
pub fn rescale_onsets(onsets: &mut [f32], target_length: f32, source_length: f32) -> Result<()> {
    if !(source_length > 0.0) || !(target_length > 0.0) {
        return Err(Error::InvalidConfig("track lengths must be positive"));
    }
    let scale = target_length / source_length;
    for onset in onsets.iter_mut() {
        *onset *= scale;
    }
    Ok(())
}
