//! String namespace operations
//!
//! Indices count characters, not bytes.

/// String namespace methods
pub struct StringPrototype;

impl StringPrototype {
    /// String.slice(s, start, end); negative indices count from the end
    pub fn slice(s: &str, start: f64, end: Option<f64>) -> String {
        let len = s.chars().count();
        let start_idx = relative_index(start, len);
        let end_idx = end.map_or(len, |e| relative_index(e, len));

        if start_idx >= end_idx {
            String::new()
        } else {
            s.chars()
                .skip(start_idx)
                .take(end_idx - start_idx)
                .collect()
        }
    }

    /// String.replace(s, search, replacement); first occurrence only
    pub fn replace(s: &str, search: &str, replacement: &str) -> String {
        s.replacen(search, replacement, 1)
    }

    /// String.length(s)
    pub fn length(s: &str) -> usize {
        s.chars().count()
    }

    /// String.toUpperCase(s)
    pub fn to_upper_case(s: &str) -> String {
        s.to_uppercase()
    }

    /// String.toLowerCase(s)
    pub fn to_lower_case(s: &str) -> String {
        s.to_lowercase()
    }
}

/// Clamp a possibly negative, possibly fractional index into `0..=len`
fn relative_index(index: f64, len: usize) -> usize {
    if index.is_nan() {
        return 0;
    }
    let index = index.trunc();
    if index < 0.0 {
        let from_end = (-index).min(len as f64) as usize;
        len - from_end
    } else {
        index.min(len as f64) as usize
    }
}
