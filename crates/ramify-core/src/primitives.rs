//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Ramify engine.
//!
//! A form starts with zero sections but fixed rules.
//! These primitives are compiled into the binary and are immutable at runtime.

/// Display-name prefix for sections created by `AddSection`.
///
/// The processor appends the smallest unused suffix, so the first
/// top-level section is `"Untitled Section 1"`.
pub const UNTITLED_SECTION_PREFIX: &str = "Untitled Section";

/// Display-name prefix for sections created by `AddNestedSection`.
pub const NESTED_SECTION_PREFIX: &str = "Nested Section";

/// Separator used when a checkbox answer is flattened into a single
/// display string for the submission payload.
pub const CHECKBOX_JOIN_SEPARATOR: &str = ", ";

/// Default lower bound for linear-scale questions.
pub const DEFAULT_MIN_SCALE: i64 = 1;

/// Default upper bound for linear-scale questions.
pub const DEFAULT_MAX_SCALE: i64 = 5;

// =============================================================================
// IMPORT VALIDATION LIMITS
// =============================================================================

/// Maximum allowed payload size for a definition document.
///
/// This prevents memory exhaustion from malicious or corrupted data.
/// Checked BEFORE attempting deserialization.
pub const MAX_DEFINITION_PAYLOAD_SIZE: usize = 16 * 1024 * 1024; // 16 MB

/// Maximum allowed section count in definition imports.
pub const MAX_IMPORT_SECTION_COUNT: usize = 10_000;

/// Maximum allowed question count in definition imports.
///
/// Counted across all sections of the document.
pub const MAX_IMPORT_QUESTION_COUNT: usize = 100_000;
