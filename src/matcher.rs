// CAF-Gen Containment Matcher
// Decides whether a candidate contains at least one reference code

use regex::RegexSet;

/// Predicate applied to every generated candidate
///
/// Implementations answer one question: does the candidate contain any of
/// the reference codes as a contiguous substring? The expander only depends
/// on this trait, so the scan strategy can be replaced without touching
/// enumeration.
pub trait ContainmentMatcher {
    /// True when `candidate` contains at least one reference code
    fn matches(&self, candidate: &str) -> bool;

    /// True when there are no reference codes (nothing can match)
    fn is_empty(&self) -> bool;
}

/// Brute-force scan over the reference codes in the order supplied
#[derive(Debug, Clone, Copy)]
pub struct SubstringMatcher<'a> {
    codes: &'a [String],
}

impl<'a> SubstringMatcher<'a> {
    pub fn new(codes: &'a [String]) -> Self {
        Self { codes }
    }
}

impl ContainmentMatcher for SubstringMatcher<'_> {
    #[inline]
    fn matches(&self, candidate: &str) -> bool {
        self.codes.iter().any(|code| candidate.contains(code.as_str()))
    }

    fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Single-pass matcher compiled from the reference codes as escaped literals
///
/// # Example
/// ```
/// # use caf_gen::matcher::{ContainmentMatcher, RegexSetMatcher};
/// let matcher = RegexSetMatcher::new(&["99".to_string()]).unwrap();
/// assert!(matcher.matches("ZZ01202599"));
/// assert!(!matcher.matches("ZZ01202598"));
/// ```
#[derive(Debug, Clone)]
pub struct RegexSetMatcher {
    set: RegexSet,
}

impl RegexSetMatcher {
    pub fn new(codes: &[String]) -> Result<Self, regex::Error> {
        let set = RegexSet::new(codes.iter().map(|code| regex::escape(code)))?;
        Ok(Self { set })
    }
}

impl ContainmentMatcher for RegexSetMatcher {
    #[inline]
    fn matches(&self, candidate: &str) -> bool {
        self.set.is_match(candidate)
    }

    fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
