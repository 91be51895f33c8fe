use chrono::{DateTime, Utc};
use sgp4::Elements;

use super::error::EphemerisError;
use super::types::OrbitalElementSet;

/// Parse multi-satellite TLE text into element sets.
///
/// Accepts 2-line and 3-line (named) groups in the same document; lines
/// that belong to neither are skipped. The satellite id and epoch are
/// recovered from the parsed elements.
pub fn parse_tle_table(content: &str) -> Result<Vec<OrbitalElementSet>, EphemerisError> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push(element_set(lines[i], lines[i + 1])?);
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push(element_set(lines[i + 1], lines[i + 2])?);
            i += 3;
        } else {
            i += 1; // skip unknown line
        }
    }

    Ok(result)
}

fn element_set(line1: &str, line2: &str) -> Result<OrbitalElementSet, EphemerisError> {
    let elements = Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
        .map_err(|e| EphemerisError::InvalidElements(e.to_string()))?;

    Ok(OrbitalElementSet {
        satellite_id: elements.norad_id as u32,
        epoch: DateTime::from_naive_utc_and_offset(elements.datetime, Utc),
        line1: line1.to_string(),
        line2: line2.to_string(),
    })
}
