// CAF-Gen Generator
// Main API that runs one request: validate, read the period, look up codes, expand

use std::sync::Arc;

use crate::expand::expand;
use crate::pattern::{extract_period, normalize, validate_format};
use crate::reference::ReferenceSource;
use crate::types::{ExpansionLimits, GenerateError, Generated};

/// Main CAF-Gen entry point
///
/// Combines all components:
/// - Pattern validation and period extraction
/// - Reference lookup for the period
/// - Bounded expansion filtered by the reference codes
///
/// Each call is self-contained; the generator holds no per-request state, so
/// it can be shared freely between threads.
#[derive(Clone)]
pub struct CafGenerator {
    /// Where reference codes come from
    source: Arc<dyn ReferenceSource>,

    /// Hard ceilings for expansion
    limits: ExpansionLimits,
}

impl CafGenerator {
    /// Create a generator with the default limits
    pub fn new(source: impl ReferenceSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            limits: ExpansionLimits::default(),
        }
    }

    /// Create a generator from an already boxed source
    pub fn from_boxed(source: Box<dyn ReferenceSource>) -> Self {
        Self {
            source: Arc::from(source),
            limits: ExpansionLimits::default(),
        }
    }

    /// Set the expansion limits
    pub fn with_limits(mut self, limits: ExpansionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &ExpansionLimits {
        &self.limits
    }

    /// Run a full request for a raw CAF pattern
    ///
    /// # Arguments
    /// * `input` - Pattern as typed by the user (trimmed and upper-cased here)
    ///
    /// # Returns
    /// The period, the number of reference codes for it and the surviving
    /// candidates. An empty candidate list means nothing matched;
    /// [`GenerateError::NoReferenceData`] means the period had no codes at all.
    pub fn generate(&self, input: &str) -> Result<Generated, GenerateError> {
        // Step 1: Normalize and validate
        let pattern = normalize(input);
        validate_format(&pattern)?;

        // Step 2: Period from fixed offsets
        let period = extract_period(&pattern)?;

        // Step 3: Reference codes for the period
        let index = self.source.load()?;
        let codes = index.lookup_period(&period);
        if codes.is_empty() {
            tracing::info!(pattern = %pattern, period = %period, "no reference codes for period");
            return Err(GenerateError::NoReferenceData {
                month: period.month,
                year: period.year,
            });
        }

        // Step 4: Expand and filter
        let combos = expand(&pattern, codes, &self.limits)?;

        tracing::info!(
            pattern = %pattern,
            period = %period,
            references = codes.len(),
            combos = combos.len(),
            "generated candidates"
        );

        Ok(Generated {
            reference_count: codes.len(),
            period,
            combos,
        })
    }
}
