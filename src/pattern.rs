// CAF-Gen Pattern Handling
// Normalizes and validates CAF patterns, reads the embedded period and fills wildcard slots

use crate::types::{GenerateError, Period};

/// Wildcard marker: one slot filled with a single decimal digit
pub const WILDCARD: char = '*';

/// Byte offsets of the month inside a pattern
const MONTH_RANGE: std::ops::Range<usize> = 2..4;

/// Byte offsets of the year inside a pattern
const YEAR_RANGE: std::ops::Range<usize> = 4..8;

/// Trim surrounding whitespace and upper-case the input
///
/// # Examples
/// ```
/// # use caf_gen::pattern::normalize;
/// assert_eq!(normalize("  ab012025** "), "AB012025**");
/// ```
pub fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Check the pattern is non-empty and uses only `A-Z`, `0-9`, `.` and `*`
///
/// # Examples
/// ```
/// # use caf_gen::pattern::validate_format;
/// assert!(validate_format("AB012025**").is_ok());
/// assert!(validate_format("ab012025**").is_err());
/// ```
pub fn validate_format(pattern: &str) -> Result<(), GenerateError> {
    if pattern.is_empty() {
        return Err(GenerateError::EmptyPattern);
    }

    for ch in pattern.chars() {
        match ch {
            'A'..='Z' | '0'..='9' | '.' | WILDCARD => continue,
            c => return Err(GenerateError::InvalidCharacter { char: c }),
        }
    }
    Ok(())
}

/// Read the month (offsets 2-3) and year (offsets 4-7) embedded in a pattern
///
/// Both fields must be made of ASCII digits and the month must lie in
/// `01..=12`. A wildcard inside either field makes the period malformed.
///
/// # Examples
/// ```
/// # use caf_gen::pattern::extract_period;
/// let period = extract_period("ZZ012025**").unwrap();
/// assert_eq!(period.month, "01");
/// assert_eq!(period.year, "2025");
/// ```
pub fn extract_period(pattern: &str) -> Result<Period, GenerateError> {
    let month = pattern.get(MONTH_RANGE).unwrap_or_default();
    let year = pattern.get(YEAR_RANGE).unwrap_or_default();

    let malformed = || GenerateError::MalformedPeriod {
        month: month.to_string(),
        year: year.to_string(),
    };

    if month.len() != MONTH_RANGE.len() || year.len() != YEAR_RANGE.len() {
        return Err(malformed());
    }
    if !is_digits(month) || !is_digits(year) {
        return Err(malformed());
    }
    match month.parse::<u8>() {
        Ok(1..=12) => Ok(Period::new(month, year)),
        _ => Err(malformed()),
    }
}

/// Count the wildcard slots in a pattern
#[inline]
pub fn count_wildcards(pattern: &str) -> usize {
    pattern.chars().filter(|c| *c == WILDCARD).count()
}

/// Substitute `digits` into the wildcard slots of `pattern`, left to right
///
/// The first digit fills the first `*` met scanning the pattern, and so on.
/// `out` is cleared first so the same buffer can be reused across candidates.
/// `digits` must hold exactly one ASCII digit per wildcard slot.
///
/// # Examples
/// ```
/// # use caf_gen::pattern::fill_wildcards;
/// let mut out = String::new();
/// fill_wildcards("A*B*", b"47", &mut out);
/// assert_eq!(out, "A4B7");
/// ```
pub fn fill_wildcards(pattern: &str, digits: &[u8], out: &mut String) {
    out.clear();
    let mut next = digits.iter();
    for ch in pattern.chars() {
        if ch == WILDCARD {
            match next.next() {
                Some(&d) => out.push(d as char),
                None => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
}

#[inline]
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
