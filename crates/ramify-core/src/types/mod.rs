//! # Core Type Definitions
//!
//! This module contains all core types for the Ramify branching engine:
//! - Stable identifiers (`SectionId`, `QuestionId`)
//! - The question model (`Question`, `QuestionType`, `ScaleBounds`)
//! - The section model (`Section`)
//! - Runtime answer values (`Answer`, `FileReference`)
//! - Error types (`RamifyError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer and string data only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for identifier counters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable unique identifier for a section within a document.
///
/// Identifiers are minted monotonically by the document, so iterating a
/// `BTreeMap<SectionId, Section>` yields sections in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u64);

/// Stable unique identifier for a question.
///
/// Unique across the whole document (a stronger guarantee than the
/// per-section uniqueness the wire format requires).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub u64);

// =============================================================================
// QUESTION TYPE
// =============================================================================

/// The closed enumeration of supported question types.
///
/// Serialized with the camelCase names fixed by the wire format
/// (`"shortAnswer"`, `"checkBoxes"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    /// Single-line free text. The default for new questions.
    #[default]
    ShortAnswer,
    /// Multi-line free text.
    Paragraph,
    /// Exclusive choice among `options`.
    MultipleChoice,
    /// Non-exclusive choice among `options`; answer is a list.
    CheckBoxes,
    /// Exclusive choice presented as a dropdown.
    Dropdown,
    /// Calendar date, carried as text.
    Date,
    /// Numeric scale with bounds and end labels.
    LinearScale,
    /// Star-style rating, carried as text.
    Rating,
    /// File upload; only the filename reference lives in the document.
    AttachFile,
}

impl QuestionType {
    /// Whether this type carries an `options` list.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(
            self,
            Self::MultipleChoice | Self::CheckBoxes | Self::Dropdown
        )
    }
}

// =============================================================================
// HIERARCHY TYPE
// =============================================================================

/// Whether a question controls nested sections.
///
/// This is derived state: `Nested` exactly when the question's redirect
/// map is non-empty. It is stored for the wire format but resynchronized
/// by every mutation that touches the map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "camelCase")]
pub enum HierarchyType {
    /// No redirects.
    #[default]
    Normal,
    /// At least one option reveals a nested section.
    Nested,
}

// =============================================================================
// ANSWER
// =============================================================================

/// A filename reference for an attach-file answer.
///
/// The binary payload itself belongs to the upload channel, never to the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    /// Filename only, e.g. `"report.pdf"`.
    pub filename: String,
}

impl FileReference {
    /// Create a file reference from a filename.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// The current runtime value of a question.
///
/// Shape depends on the question type: text for most, a list for
/// checkboxes, a filename reference for attach-file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Answer {
    /// Not yet answered.
    #[default]
    None,
    /// Free-text or single-choice value.
    Text(String),
    /// Checkbox selections, in the order they were picked.
    Selections(Vec<String>),
    /// Attach-file reference.
    File(FileReference),
}

impl Answer {
    /// Presence rule applied by the payload serializer: non-empty string,
    /// non-empty selection list, or a resolvable file reference.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::None => false,
            Self::Text(s) => !s.is_empty(),
            Self::Selections(items) => !items.is_empty(),
            Self::File(file) => !file.filename.is_empty(),
        }
    }

    /// Convenience constructor for a text answer.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Whether this answer unlocks the given option text.
    ///
    /// Only exact string equality on a text answer matches; selections,
    /// files, and unset answers never unlock a redirect.
    #[must_use]
    pub fn matches_option(&self, option: &str) -> bool {
        matches!(self, Self::Text(s) if s == option)
    }
}

// =============================================================================
// SCALE BOUNDS
// =============================================================================

/// Bounds and end labels for a linear-scale question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleBounds {
    /// Lower bound of the scale.
    pub min_scale: i64,
    /// Upper bound of the scale.
    pub max_scale: i64,
    /// Label shown at the lower end.
    pub label1: String,
    /// Label shown at the upper end.
    pub label2: String,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min_scale: crate::primitives::DEFAULT_MIN_SCALE,
            max_scale: crate::primitives::DEFAULT_MAX_SCALE,
            label1: String::new(),
            label2: String::new(),
        }
    }
}

// =============================================================================
// QUESTION
// =============================================================================

/// A single prompt with a type, optional choice options, redirect map,
/// and a current runtime answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Stable identifier, unique within the document.
    pub id: QuestionId,
    /// The question type.
    pub question_type: QuestionType,
    /// Prompt string.
    pub text: String,
    /// Ordered, case-insensitively distinct option strings.
    /// Applicable to the choice-bearing types only.
    pub options: Vec<String>,
    /// Partial mapping from option text to the section it reveals.
    /// Every value must reference a section that exists in the document.
    pub redirects: BTreeMap<String, SectionId>,
    /// Derived from `redirects`; kept in sync by every mutation.
    pub hierarchy_type: HierarchyType,
    /// Whether an answer is required at submission time.
    pub is_mandatory: bool,
    /// Scale bounds, meaningful for `LinearScale` only.
    pub scale: Option<ScaleBounds>,
    /// Current runtime value. The only field runtime answering mutates.
    pub answer: Answer,
}

impl Question {
    /// Create a new question with authoring defaults: short answer,
    /// empty text and options, not mandatory, unanswered.
    #[must_use]
    pub fn new(id: QuestionId) -> Self {
        Self {
            id,
            question_type: QuestionType::default(),
            text: String::new(),
            options: Vec::new(),
            redirects: BTreeMap::new(),
            hierarchy_type: HierarchyType::default(),
            is_mandatory: false,
            scale: None,
            answer: Answer::None,
        }
    }

    /// Point `option` at `target`, flipping the hierarchy to `Nested`.
    pub fn set_redirect(&mut self, option: impl Into<String>, target: SectionId) {
        self.redirects.insert(option.into(), target);
        self.sync_hierarchy();
    }

    /// Remove the redirect for `option`, if any, reverting the hierarchy
    /// to `Normal` once the map empties out.
    pub fn remove_redirect(&mut self, option: &str) -> Option<SectionId> {
        let removed = self.redirects.remove(option);
        self.sync_hierarchy();
        removed
    }

    /// Drop every redirect entry pointing at `target`.
    ///
    /// Returns how many entries were severed.
    pub fn sever_redirects_to(&mut self, target: SectionId) -> usize {
        let before = self.redirects.len();
        self.redirects.retain(|_, t| *t != target);
        self.sync_hierarchy();
        before - self.redirects.len()
    }

    /// Resynchronize `hierarchy_type` with map emptiness.
    fn sync_hierarchy(&mut self) {
        self.hierarchy_type = if self.redirects.is_empty() {
            HierarchyType::Normal
        } else {
            HierarchyType::Nested
        };
    }

    /// Find the first option that duplicates an earlier one,
    /// case-insensitively. Returns the offending text.
    #[must_use]
    pub fn find_duplicate_option(options: &[String]) -> Option<String> {
        let mut seen: Vec<String> = Vec::with_capacity(options.len());
        for option in options {
            let folded = option.to_lowercase();
            if seen.contains(&folded) {
                return Some(option.clone());
            }
            seen.push(folded);
        }
        None
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// A named group of questions; top-level or reachable only via a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Stable identifier within the document.
    pub id: SectionId,
    /// Display label, unique within the document at authoring time.
    pub name: String,
    /// Ordered questions. Order is meaningful for rendering and for
    /// first-mandatory-violation reporting.
    pub questions: Vec<Question>,
    /// True if this section was created as a redirect target.
    pub is_nested: bool,
}

impl Section {
    /// Create a new empty section.
    #[must_use]
    pub fn new(id: SectionId, name: impl Into<String>, is_nested: bool) -> Self {
        Self {
            id,
            name: name.into(),
            questions: Vec::new(),
            is_nested,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the Ramify engine.
///
/// - Structural and duplicate-option errors are interactive authoring
///   rejections; the caller keeps the untouched document and keeps editing.
/// - Validation errors block only the final submit action.
/// - External errors belong to out-of-scope collaborators and are
///   propagated unchanged, never swallowed or retried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RamifyError {
    /// An authoring command referenced a section that does not exist.
    #[error("section not found: {0:?}")]
    SectionNotFound(SectionId),

    /// An authoring command addressed a question position that does not exist.
    #[error("question index {index} out of range for section {section:?}")]
    QuestionIndexOutOfRange {
        /// The addressed section.
        section: SectionId,
        /// The out-of-range position.
        index: usize,
    },

    /// A redirect entry expected by the command is absent.
    #[error("no redirect registered for option '{option}'")]
    RedirectNotFound {
        /// The option text that carried no redirect.
        option: String,
    },

    /// An authoring edit would introduce two case-insensitively equal
    /// option strings on one question. Prior state is retained.
    #[error("duplicate option '{option}' on question {question:?}")]
    DuplicateOption {
        /// The question being edited.
        question: QuestionId,
        /// The offending option text.
        option: String,
    },

    /// A visible, mandatory question had no answer at serialization time.
    /// Identifies the first such question in document order.
    #[error("required question '{question}' in section '{section}' has no answer")]
    MissingRequiredAnswer {
        /// Name of the section holding the question.
        section: String,
        /// Prompt text of the unanswered question.
        question: String,
    },

    /// A document failed a structural invariant check.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A serialization error occurred.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("deserialization error: {0}")]
    DeserializationError(String),

    /// A failure of an out-of-scope transport/submit collaborator,
    /// propagated unchanged to the caller.
    #[error("external collaborator error: {0}")]
    External(String),
}

impl RamifyError {
    /// Whether this is an interactive authoring rejection
    /// (recoverable in place; the user keeps editing).
    #[must_use]
    pub const fn is_authoring_rejection(&self) -> bool {
        matches!(
            self,
            Self::SectionNotFound(_)
                | Self::QuestionIndexOutOfRange { .. }
                | Self::RedirectNotFound { .. }
                | Self::DuplicateOption { .. }
        )
    }

    /// Whether this error blocks a submission until resolved.
    #[must_use]
    pub const fn blocks_submission(&self) -> bool {
        matches!(self, Self::MissingRequiredAnswer { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
