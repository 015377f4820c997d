//! Parsing of numbered list selections such as `1,3-5`.

use std::collections::BTreeSet;

/// Why a selection was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SelectionError {
    /// Range without two bounds
    #[display("invalid range '{}'", _0)]
    InvalidRange(#[error(not(source))] String),
    /// Range bound that is not a number
    #[display("invalid number '{}'", _0)]
    InvalidNumber(#[error(not(source))] String),
    /// Entry that is neither a number nor a range
    #[display("invalid selection '{}'", _0)]
    InvalidSelection(#[error(not(source))] String),
    /// Range reaching outside the list
    #[display("range {}-{} is out of bounds (1-{})", start, end, max)]
    RangeOutOfBounds {
        /// Lower bound
        start: usize,
        /// Upper bound
        end: usize,
        /// List length
        max: usize,
    },
    /// Number outside the list
    #[display("selection {} is out of bounds (1-{})", index, max)]
    OutOfBounds {
        /// Selected number
        index: usize,
        /// List length
        max: usize,
    },
}

/// Parse a selection over a list numbered `1..=max`.
///
/// Accepts numbers and ranges (either order) separated by commas,
/// semicolons or whitespace. `all` or `*` select everything; `none`, `n`,
/// `0` or empty input select nothing.
pub fn parse_selection_input(input: &str, max: usize) -> Result<BTreeSet<usize>, SelectionError> {
    let normalized = input.trim().to_lowercase();
    match normalized.as_str() {
        "" | "none" | "n" | "0" => return Ok(BTreeSet::new()),
        "all" | "*" => return Ok((1..=max).collect()),
        _ => {}
    }

    let mut selected = BTreeSet::new();
    let parts = normalized
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|part| !part.is_empty());

    for part in parts {
        if let Some((start, end)) = part.split_once('-') {
            if start.is_empty() || end.is_empty() || end.contains('-') {
                return Err(SelectionError::InvalidRange(part.to_string()));
            }
            let start = parse_number(start)?;
            let end = parse_number(end)?;
            let (start, end) = if start > end { (end, start) } else { (start, end) };
            if start < 1 || end > max {
                return Err(SelectionError::RangeOutOfBounds { start, end, max });
            }
            selected.extend(start..=end);
            continue;
        }

        let index: usize = part
            .parse()
            .map_err(|_| SelectionError::InvalidSelection(part.to_string()))?;
        if index < 1 || index > max {
            return Err(SelectionError::OutOfBounds { index, max });
        }
        selected.insert(index);
    }

    Ok(selected)
}

fn parse_number(raw: &str) -> Result<usize, SelectionError> {
    raw.parse()
        .map_err(|_| SelectionError::InvalidNumber(raw.to_string()))
}
