//! Literal scanning for value text.
//!
//! The scanners read the longest literal at the start of the input and
//! report how many bytes they consumed. [`infer_value_type`] only accepts a
//! kind when its scanner consumes the whole text, trying integer, then
//! float, then bool, so `"42"` is always an `Int` and `"42x"` is a `String`.

use crate::node::ValueType;

/// Scans an optionally signed decimal integer prefix.
///
/// Returns `None` when there are no digits or the value overflows `i64`.
pub fn scan_int(text: &str) -> Option<(i64, usize)> {
    let bytes = text.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign_len..]);
    if digits == 0 {
        return None;
    }
    let end = sign_len + digits;
    text[..end].parse::<i64>().ok().map(|n| (n, end))
}

/// Scans a decimal floating-point prefix: sign, digits, optional fraction,
/// optional exponent. At least one mantissa digit is required, so `nan` and
/// `inf` are not floats.
pub fn scan_float(text: &str) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    text[..end].parse::<f64>().ok().map(|n| (n, end))
}

/// Scans a case-insensitive `true` / `false` prefix.
pub fn scan_bool(text: &str) -> Option<(bool, usize)> {
    for (literal, value) in [("true", true), ("false", false)] {
        if text.len() >= literal.len()
            && text.as_bytes()[..literal.len()].eq_ignore_ascii_case(literal.as_bytes())
        {
            return Some((value, literal.len()));
        }
    }
    None
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn consumes_all<T>(scanned: Option<(T, usize)>, text: &str) -> bool {
    matches!(scanned, Some((_, len)) if len == text.len())
}

/// Classifies literal text as `Int`, `Float`, `Bool` or `String`.
pub fn infer_value_type(text: &str) -> ValueType {
    if consumes_all(scan_int(text), text) {
        ValueType::Int
    } else if consumes_all(scan_float(text), text) {
        ValueType::Float
    } else if consumes_all(scan_bool(text), text) {
        ValueType::Bool
    } else {
        ValueType::String
    }
}

/// Lenient integer reading of value text: the integer prefix, or 0.
pub fn read_int(text: &str) -> i64 {
    scan_int(text).map_or(0, |(n, _)| n)
}

/// Lenient float reading of value text: the float prefix, or 0.0.
pub fn read_float(text: &str) -> f64 {
    scan_float(text).map_or(0.0, |(n, _)| n)
}

/// Lenient bool reading of value text: a `true`/`false` prefix, else a
/// non-zero integer prefix.
pub fn read_bool(text: &str) -> bool {
    match scan_bool(text) {
        Some((b, _)) => b,
        None => read_int(text) != 0,
    }
}

/// Canonical text of a float value. Always carries a `.` or an exponent so
/// the text is re-inferred as a float.
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}
