//! # ramify-core
//!
//! The deterministic branching-questionnaire engine for Ramify.
//!
//! This crate implements the form engine - an in-memory section/question
//! data model, the authoring operations that mutate it, and the runtime
//! algorithms that resolve which sections are visible given partial
//! answers and serialize only the live answers into a submission payload.
//!
//! ## Components
//!
//! - `document` — the Section Graph Store (pure data, creation-ordered)
//! - `authoring` — the command processor (closed command enum + `apply`)
//! - `resolver` — visibility resolution over option redirects
//! - `answers` — the single runtime mutation (one question's answer)
//! - `submission` — the payload serializer with the mandatory-answer gate
//! - `formats` — the definition-document JSON codec
//! - `session` — the single-owner container for "the current document"
//!
//! ## Architectural Constraints
//!
//! - Every transition is a pure function: document in, document out
//! - Deterministic: `BTreeMap` only, identifiers minted monotonically
//! - No async, no network dependencies; transport, rendering,
//!   persistence, and auth are external collaborators

// =============================================================================
// MODULES
// =============================================================================

pub mod answers;
pub mod authoring;
pub mod document;
pub mod formats;
pub mod primitives;
pub mod resolver;
pub mod session;
pub mod submission;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Answer, FileReference, HierarchyType, Question, QuestionId, QuestionType, RamifyError,
    ScaleBounds, Section, SectionId,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use answers::set_answer;
pub use authoring::{AuthoringCommand, QuestionPatch, apply};
pub use document::{FormDocument, RedirectEdge};
pub use resolver::{hidden_sections, is_section_visible};
pub use session::FormSession;
pub use submission::{
    SubmissionDocument, SubmissionQuestion, SubmissionSection, build_submission,
};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{document_from_json, document_to_json};
