//! # CAF-Gen: Wildcard CAF Expansion
//!
//! Expands a partially known CAF (a fixed-length alphanumeric code with `*`
//! wildcard positions) into every fully specified code that contains at least
//! one reference code valid for the month/year embedded in the pattern.
//!
//! ## Pattern Syntax
//!
//! - Alphabet: `A-Z`, `0-9`, `.` and `*`
//! - `*`: one wildcard slot, filled with a single decimal digit
//! - Offsets 2-3 hold the month, offsets 4-7 the year (zero-based)
//!
//! ## Example Usage
//!
//! ```
//! use caf_gen::{CafGenerator, ReferenceIndex, ReferenceRecord, SnapshotSource};
//!
//! let index = ReferenceIndex::from_records(vec![ReferenceRecord::new("01", "2025", "99")]);
//! let generator = CafGenerator::new(SnapshotSource::new(index));
//!
//! let result = generator.generate("zz012025**")?;
//! assert_eq!(result.combos, vec!["ZZ01202599"]);
//! # Ok::<(), caf_gen::GenerateError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Pattern** - Normalization, format validation, period extraction, slot filling
//! - **Reference Index** - Codes grouped by period, loaded from a CSV export
//! - **Matcher** - Swappable containment predicate over the reference codes
//! - **Expander** - Bounded enumeration of all digit substitutions
//! - **CafGenerator** - Main entry point combining all components
//! - **Server** - JSON over HTTP with CORS

pub mod config;
pub mod expand;
pub mod matcher;
pub mod pattern;
pub mod reference;
pub mod search;
pub mod server;
pub mod types;

// Re-export main types and functions for convenience
pub use config::{AppConfig, ConfigError};
pub use expand::{check_limits, expand, expand_with, SearchSpace};
pub use matcher::{ContainmentMatcher, RegexSetMatcher, SubstringMatcher};
pub use pattern::{count_wildcards, extract_period, fill_wildcards, normalize, validate_format};
pub use reference::{
    ColumnLayout, CsvReferenceSource, ReferenceIndex, ReferenceSource, SnapshotSource,
};
pub use search::CafGenerator;
pub use types::{
    ExpandError, ExpansionLimits, GenerateError, Generated, LimitKind, Period, ReferenceError,
    ReferenceRecord,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
