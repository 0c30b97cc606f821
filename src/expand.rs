// CAF-Gen Pattern Expander
// Enumerates every digit substitution of a pattern and keeps those containing a reference code

use crate::matcher::{ContainmentMatcher, SubstringMatcher};
use crate::pattern::{count_wildcards, fill_wildcards};
use crate::types::{ExpandError, ExpansionLimits};

/// Size of the search space for one pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSpace {
    /// Number of `*` slots
    pub wildcards: usize,
    /// `10^wildcards`
    pub total: u64,
}

/// Check both expansion ceilings for a pattern
///
/// The wildcard ceiling is checked first, so `10^w` is only computed for an
/// admissible `w`. An overflowing power is reported as too many combinations
/// with `actual = u64::MAX`.
pub fn check_limits(pattern: &str, limits: &ExpansionLimits) -> Result<SearchSpace, ExpandError> {
    let wildcards = count_wildcards(pattern);
    if wildcards > limits.max_wildcards {
        return Err(ExpandError::too_many_wildcards(
            wildcards,
            limits.max_wildcards,
        ));
    }

    let total = u32::try_from(wildcards)
        .ok()
        .and_then(|w| 10u64.checked_pow(w))
        .unwrap_or(u64::MAX);
    if total > limits.max_combinations {
        return Err(ExpandError::too_many_combinations(
            total,
            limits.max_combinations,
        ));
    }

    Ok(SearchSpace { wildcards, total })
}

/// Expand `pattern` and keep candidates containing any of `reference_codes`
///
/// Candidates come back in ascending order of the substituted digits.
///
/// # Example
/// ```
/// # use caf_gen::expand::expand;
/// # use caf_gen::types::ExpansionLimits;
/// let combos = expand("ZZ012025**", &["99".to_string()], &ExpansionLimits::default()).unwrap();
/// assert_eq!(combos, vec!["ZZ01202599"]);
/// ```
pub fn expand(
    pattern: &str,
    reference_codes: &[String],
    limits: &ExpansionLimits,
) -> Result<Vec<String>, ExpandError> {
    expand_with(pattern, &SubstringMatcher::new(reference_codes), limits)
}

/// Expand `pattern`, filtering candidates through any containment matcher
pub fn expand_with<M>(
    pattern: &str,
    matcher: &M,
    limits: &ExpansionLimits,
) -> Result<Vec<String>, ExpandError>
where
    M: ContainmentMatcher + ?Sized,
{
    let space = check_limits(pattern, limits)?;

    if matcher.is_empty() {
        tracing::debug!(pattern, "no reference codes, nothing to expand");
        return Ok(Vec::new());
    }

    let mut digits = vec![b'0'; space.wildcards];
    let mut candidate = String::with_capacity(pattern.len());
    let mut combos = Vec::new();

    for index in 0..space.total {
        write_index(index, &mut digits);
        fill_wildcards(pattern, &digits, &mut candidate);
        if matcher.matches(&candidate) {
            combos.push(candidate.clone());
        }
    }

    tracing::debug!(
        pattern,
        wildcards = space.wildcards,
        total = space.total,
        kept = combos.len(),
        "expanded pattern"
    );

    Ok(combos)
}

/// Write `index` as a zero-padded decimal string filling all of `digits`
#[inline]
fn write_index(mut index: u64, digits: &mut [u8]) {
    for slot in digits.iter_mut().rev() {
        *slot = b'0' + (index % 10) as u8;
        index /= 10;
    }
}
