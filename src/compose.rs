use crate::error::{ChronoidError, Result};

/// The two encoded segments of an identifier.
///
/// Composition is plain concatenation, timestamp first; the timestamp
/// segment carries the fixed width, the sequence segment is variable-length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParts {
    pub timestamp: String,
    pub sequence: String,
}

impl IdParts {
    pub const fn new(timestamp: String, sequence: String) -> Self {
        Self {
            timestamp,
            sequence,
        }
    }
}

/// Concatenates the parts into an identifier string.
///
/// # Errors
///
/// Returns `InvalidLength` unless the timestamp segment is exactly
/// `timestamp_width` characters.
pub fn compose(parts: &IdParts, timestamp_width: usize) -> Result<String> {
    let len = parts.timestamp.chars().count();
    if len != timestamp_width {
        return Err(ChronoidError::InvalidLength {
            len,
            expected: format!("timestamp segment of exactly {timestamp_width} characters"),
        });
    }
    Ok(format!("{}{}", parts.timestamp, parts.sequence))
}

/// Splits an identifier back into its segments at `timestamp_width`.
///
/// # Errors
///
/// Returns `InvalidLength` if the input is not strictly longer than the
/// timestamp segment (there must be at least one sequence character).
pub fn split(id: &str, timestamp_width: usize) -> Result<IdParts> {
    let len = id.chars().count();
    if len <= timestamp_width {
        return Err(ChronoidError::InvalidLength {
            len,
            expected: format!("more than {timestamp_width} characters"),
        });
    }
    let boundary = id
        .char_indices()
        .nth(timestamp_width)
        .map_or(id.len(), |(i, _)| i);
    Ok(IdParts::new(
        id[..boundary].to_string(),
        id[boundary..].to_string(),
    ))
}
