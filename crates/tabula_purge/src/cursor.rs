//! Ordering of time-ordered snowflake cursors.
//!
//! Snowflakes are decimal strings; a later item always has a larger value.
//! Neither function panics on malformed input: when a value does not parse,
//! comparison falls back to length, then lexicographic order.

use std::cmp::Ordering;

/// Whichever of two cursors denotes the earlier item.
///
/// An empty `current_oldest` means "no bound yet" and is always replaced by a
/// non-empty candidate. An empty candidate never replaces anything.
pub fn older_of<'a>(current_oldest: &'a str, candidate: &'a str) -> &'a str {
    if candidate.is_empty() {
        return current_oldest;
    }
    if current_oldest.is_empty() {
        return candidate;
    }

    if compare(candidate, current_oldest) == Ordering::Less {
        candidate
    } else {
        current_oldest
    }
}

/// The adjacent earlier cursor.
///
/// Numeric cursors are decremented; zero and non-numeric cursors are
/// returned unchanged.
pub fn predecessor(cursor: &str) -> String {
    match cursor.parse::<u64>() {
        Ok(value) if value > 0 => (value - 1).to_string(),
        _ => cursor.to_string(),
    }
}

fn compare(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_of_numeric() {
        assert_eq!(older_of("1200", "1100"), "1100");
        assert_eq!(older_of("1100", "1200"), "1100");
        assert_eq!(older_of("900", "1000"), "900");
        assert_eq!(older_of("7", "7"), "7");
    }

    #[test]
    fn test_older_of_empty_bounds() {
        assert_eq!(older_of("", "55"), "55");
        assert_eq!(older_of("55", ""), "55");
        assert_eq!(older_of("", ""), "");
    }

    #[test]
    fn test_older_of_beyond_u64_uses_length_then_lexicographic() {
        // 21 digits does not fit in u64
        assert_eq!(older_of("999999999999999999999", "12"), "12");
        assert_eq!(older_of("abc", "abd"), "abc");
        assert_eq!(older_of("abd", "abc"), "abc");
        assert_eq!(older_of("zz", "aaa"), "zz");
    }

    #[test]
    fn test_predecessor() {
        assert_eq!(predecessor("1100"), "1099");
        assert_eq!(predecessor("1000"), "999");
        assert_eq!(predecessor("1"), "0");
        assert_eq!(predecessor("0"), "0");
        assert_eq!(predecessor("not-a-snowflake"), "not-a-snowflake");
        assert_eq!(predecessor(""), "");
    }

    #[test]
    fn test_predecessor_of_older_is_strictly_older() {
        let oldest = ["1203", "1187", "1199"]
            .into_iter()
            .fold("", |oldest, id| older_of(oldest, id));
        assert_eq!(oldest, "1187");
        assert_eq!(predecessor(oldest), "1186");
    }
}
