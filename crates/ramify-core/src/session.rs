//! # Session Module
//!
//! The single-owner state container for "the current document".
//!
//! The engine itself is a set of pure functions over [`FormDocument`]
//! values; `FormSession` is the one place that holds the latest value
//! and swaps it on every successful transition. Failed transitions leave
//! the held document untouched, which is what makes authoring errors
//! recoverable in place.

use crate::authoring::{self, AuthoringCommand};
use crate::document::FormDocument;
use crate::submission::{self, SubmissionDocument};
use crate::types::{Answer, RamifyError, SectionId};
use crate::{answers, formats, resolver};
use std::collections::BTreeSet;

/// Owns the current document across authoring and answering.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    /// The latest document value.
    document: FormDocument,
}

impl FormSession {
    /// Create a session over an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over an existing document.
    #[must_use]
    pub fn with_document(document: FormDocument) -> Self {
        Self { document }
    }

    /// Load a session from definition JSON, as the runtime does after
    /// fetching the definition from the external collaborator.
    pub fn from_definition_json(payload: &str) -> Result<Self, RamifyError> {
        Ok(Self {
            document: formats::document_from_json(payload)?,
        })
    }

    /// The current document.
    #[must_use]
    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    // =========================================================================
    // AUTHORING
    // =========================================================================

    /// Apply one authoring command.
    ///
    /// On success the held document advances; on error it is untouched
    /// and the caller keeps editing.
    pub fn apply(&mut self, command: &AuthoringCommand) -> Result<(), RamifyError> {
        self.document = authoring::apply(&self.document, command)?;
        Ok(())
    }

    /// Export the current document as definition JSON.
    pub fn definition_json(&self) -> Result<String, RamifyError> {
        formats::document_to_json(&self.document)
    }

    // =========================================================================
    // ANSWERING
    // =========================================================================

    /// Record an answer for the addressed question.
    pub fn set_answer(
        &mut self,
        section: SectionId,
        index: usize,
        answer: Answer,
    ) -> Result<(), RamifyError> {
        self.document = answers::set_answer(&self.document, section, index, answer)?;
        Ok(())
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Recompute the hidden-section set from the current answers.
    #[must_use]
    pub fn hidden_sections(&self) -> BTreeSet<SectionId> {
        resolver::hidden_sections(&self.document)
    }

    /// Whether a section is currently visible.
    #[must_use]
    pub fn is_section_visible(&self, id: SectionId) -> bool {
        resolver::is_section_visible(&self.document, id)
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Build the submission payload for the current answers.
    ///
    /// Resolver and serializer composed: the hidden set is re-derived,
    /// then the payload is fully computed before any external submit can
    /// begin. A missing mandatory answer blocks with a validation error.
    pub fn submit(&self, subject_id: impl Into<String>) -> Result<SubmissionDocument, RamifyError> {
        let hidden = resolver::hidden_sections(&self.document);
        submission::build_submission(&self.document, &hidden, subject_id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
