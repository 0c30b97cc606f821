// CAF-Gen Type Definitions
// Core types for periods, reference rows, expansion limits and errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default ceiling on wildcard slots per pattern
pub const DEFAULT_MAX_WILDCARDS: usize = 5;

/// Default ceiling on the size of the search space (`10^w`)
pub const DEFAULT_MAX_COMBINATIONS: u64 = 20_000;

/// Month/year pair a reference code applies to
///
/// The month is always held as a two-character, zero-padded string and the
/// year in its literal form, so lookups are plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    pub month: String,
    pub year: String,
}

impl Period {
    /// Create a period, zero-padding a one-character month
    pub fn new(month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            month: pad_month(month.into()),
            year: year.into(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

fn pad_month(month: String) -> String {
    if month.len() == 1 {
        format!("0{}", month)
    } else {
        month
    }
}

/// One row of the reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    /// Two-digit month (e.g. "01")
    pub month: String,
    /// Four-digit year (e.g. "2025")
    pub year: String,
    /// Code that must appear inside a generated candidate
    pub code: String,
}

impl ReferenceRecord {
    pub fn new(
        month: impl Into<String>,
        year: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            month: pad_month(month.into()),
            year: year.into(),
            code: code.into(),
        }
    }

    /// A row is usable only when every field carries a value
    pub fn is_complete(&self) -> bool {
        !self.month.is_empty() && !self.year.is_empty() && !self.code.is_empty()
    }

    pub fn period(&self) -> Period {
        Period {
            month: self.month.clone(),
            year: self.year.clone(),
        }
    }
}

/// Hard ceilings checked before any candidate is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionLimits {
    /// Maximum number of `*` slots in a pattern
    pub max_wildcards: usize,
    /// Maximum size of the search space `10^w`
    pub max_combinations: u64,
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        Self {
            max_wildcards: DEFAULT_MAX_WILDCARDS,
            max_combinations: DEFAULT_MAX_COMBINATIONS,
        }
    }
}

/// Which expansion ceiling was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    TooManyWildcards,
    TooManyCombinations,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitKind::TooManyWildcards => write!(f, "too_many_wildcards"),
            LimitKind::TooManyCombinations => write!(f, "too_many_combinations"),
        }
    }
}

/// Errors raised by the pattern expander
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// `actual` and `limit` count wildcards for [`LimitKind::TooManyWildcards`]
    /// and combinations for [`LimitKind::TooManyCombinations`]
    #[error("{}", limit_message(.kind, .actual, .limit))]
    LimitExceeded {
        kind: LimitKind,
        actual: u64,
        limit: u64,
    },
}

impl ExpandError {
    pub fn too_many_wildcards(actual: usize, limit: usize) -> Self {
        ExpandError::LimitExceeded {
            kind: LimitKind::TooManyWildcards,
            actual: actual as u64,
            limit: limit as u64,
        }
    }

    pub fn too_many_combinations(actual: u64, limit: u64) -> Self {
        ExpandError::LimitExceeded {
            kind: LimitKind::TooManyCombinations,
            actual,
            limit,
        }
    }

    pub fn kind(&self) -> LimitKind {
        match self {
            ExpandError::LimitExceeded { kind, .. } => *kind,
        }
    }
}

fn limit_message(kind: &LimitKind, actual: &u64, limit: &u64) -> String {
    match kind {
        LimitKind::TooManyWildcards => {
            format!("Excesso de curingas ({}). Máximo: {}", actual, limit)
        }
        LimitKind::TooManyCombinations => format!(
            "Muitas combinações ({}). Máximo: {}",
            group_thousands(*actual),
            group_thousands(*limit)
        ),
    }
}

/// Format an integer with `,` as the thousands separator
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Errors from loading the reference table
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read reference table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reference table: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors surfaced to the caller of a full generation request
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Informe um CAF.")]
    EmptyPattern,

    #[error("Use apenas A–Z, 0–9, ponto (.) e asterisco (*). Caractere inválido: '{char}'")]
    InvalidCharacter { char: char },

    #[error("Mês/ano inválido no CAF: {month}/{year}.")]
    MalformedPeriod { month: String, year: String },

    #[error("Nenhum código encontrado para {month}/{year}.")]
    NoReferenceData { month: String, year: String },

    #[error(transparent)]
    Limit(#[from] ExpandError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Successful generation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    /// Period read from the pattern
    pub period: Period,
    /// Number of reference codes found for the period
    pub reference_count: usize,
    /// Candidates containing at least one reference code, in generation order
    pub combos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_pads_month() {
        let period = Period::new("1", "2025");
        assert_eq!(period.month, "01");
        assert_eq!(period.to_string(), "01/2025");
    }

    #[test]
    fn test_record_period_matches_padded_lookup() {
        // Every way of building a period goes through the month padding
        let record = ReferenceRecord::new("1", "2025", "99");
        assert_eq!(record.month, "01");
        assert_eq!(record.period(), Period::new("01", "2025"));
        assert_eq!(record.period(), Period::new("1", "2025"));

        let json = serde_json::to_value(Period::new("7", "2026")).unwrap();
        assert_eq!(json, serde_json::json!({ "month": "07", "year": "2026" }));
    }

    #[test]
    fn test_record_completeness() {
        assert!(ReferenceRecord::new("01", "2025", "99").is_complete());
        assert!(!ReferenceRecord::new("01", "2025", "").is_complete());
        assert!(!ReferenceRecord::new("", "2025", "99").is_complete());
    }

    #[test]
    fn test_default_limits() {
        let limits = ExpansionLimits::default();
        assert_eq!(limits.max_wildcards, 5);
        assert_eq!(limits.max_combinations, 20_000);
    }

    #[test]
    fn test_limit_messages() {
        let err = ExpandError::too_many_wildcards(6, 5);
        assert_eq!(err.kind(), LimitKind::TooManyWildcards);
        assert_eq!(err.to_string(), "Excesso de curingas (6). Máximo: 5");

        let err = ExpandError::too_many_combinations(100_000, 20_000);
        assert_eq!(err.kind(), LimitKind::TooManyCombinations);
        assert_eq!(err.to_string(), "Muitas combinações (100,000). Máximo: 20,000");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_limit_kind_display() {
        assert_eq!(LimitKind::TooManyWildcards.to_string(), "too_many_wildcards");
        assert_eq!(
            LimitKind::TooManyCombinations.to_string(),
            "too_many_combinations"
        );
    }
}
