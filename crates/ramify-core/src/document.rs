//! # Form Document
//!
//! The canonical in-memory representation of a questionnaire: an ordered
//! collection of sections keyed by identity, each holding an ordered list
//! of questions.
//!
//! All data structures use `BTreeMap` for deterministic ordering. Section
//! identifiers are minted monotonically, so key order IS creation order
//! and iteration order is explicit rather than incidental.

use crate::types::{Question, RamifyError, Section, SectionId};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// REDIRECT EDGE
// =============================================================================

/// One edge of the section-dependency graph implied by the string-keyed
/// redirect maps: "answering `option` on question `question_index` of
/// `source` reveals `target`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEdge {
    /// Section holding the controlling question.
    pub source: SectionId,
    /// Position of the controlling question within its section.
    pub question_index: usize,
    /// The option text that unlocks the target.
    pub option: String,
    /// The section revealed by that option.
    pub target: SectionId,
}

// =============================================================================
// FORM DOCUMENT
// =============================================================================

/// The document: an identity-keyed map of sections plus the identifier
/// mints. Pure data; every behavior lives in the processor, resolver,
/// and serializer modules.
#[derive(Debug, Clone, Default)]
pub struct FormDocument {
    /// Section storage: SectionId -> Section, in creation order.
    sections: BTreeMap<SectionId, Section>,

    /// Next available SectionId.
    next_section_id: u64,

    /// Next available QuestionId.
    next_question_id: u64,
}

impl FormDocument {
    /// Create a new empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Lookup a section by id.
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    /// All sections in creation order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Number of sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of questions across all sections.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.sections.values().map(|s| s.questions.len()).sum()
    }

    /// Whether the document holds no sections at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Lookup a question by section id and position.
    #[must_use]
    pub fn question_at(&self, section: SectionId, index: usize) -> Option<&Question> {
        self.sections.get(&section)?.questions.get(index)
    }

    /// The set of sections named as a redirect target anywhere
    /// in the document.
    #[must_use]
    pub fn redirect_targets(&self) -> BTreeSet<SectionId> {
        self.redirect_edges().map(|edge| edge.target).collect()
    }

    /// Top-level sections: those not reachable via any redirect.
    /// This set is derived, never stored.
    pub fn top_level_sections(&self) -> impl Iterator<Item = &Section> {
        let targets = self.redirect_targets();
        self.sections
            .values()
            .filter(move |section| !targets.contains(&section.id))
    }

    /// All redirect edges in deterministic order: sections in creation
    /// order, questions in position order, options in lexicographic order.
    pub fn redirect_edges(&self) -> impl Iterator<Item = RedirectEdge> + '_ {
        self.sections.values().flat_map(|section| {
            section
                .questions
                .iter()
                .enumerate()
                .flat_map(move |(question_index, question)| {
                    question.redirects.iter().map(move |(option, target)| {
                        RedirectEdge {
                            source: section.id,
                            question_index,
                            option: option.clone(),
                            target: *target,
                        }
                    })
                })
        })
    }

    // =========================================================================
    // IDENTIFIER MINTS
    // =========================================================================

    /// Mint a fresh section identifier.
    pub(crate) fn mint_section_id(&mut self) -> SectionId {
        let id = SectionId(self.next_section_id);
        self.next_section_id = self.next_section_id.saturating_add(1);
        id
    }

    /// Mint a fresh question identifier.
    pub(crate) fn mint_question_id(&mut self) -> crate::types::QuestionId {
        let id = crate::types::QuestionId(self.next_question_id);
        self.next_question_id = self.next_question_id.saturating_add(1);
        id
    }

    /// Insert a section under its own id.
    pub(crate) fn insert_section(&mut self, section: Section) {
        self.sections.insert(section.id, section);
    }

    /// Remove a section by id.
    pub(crate) fn remove_section(&mut self, id: SectionId) -> Option<Section> {
        self.sections.remove(&id)
    }

    /// Mutable lookup for the processor and answer collector.
    pub(crate) fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(&id)
    }

    /// Mutable iteration for redirect severing.
    pub(crate) fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.sections.values_mut()
    }

    /// Restore a section under a pre-existing id (definition import).
    ///
    /// Advances the id mints past every identifier the section carries so
    /// later authoring never collides with imported ids.
    pub(crate) fn import_section(&mut self, section: Section) {
        if section.id.0 >= self.next_section_id {
            self.next_section_id = section.id.0.saturating_add(1);
        }
        for question in &section.questions {
            if question.id.0 >= self.next_question_id {
                self.next_question_id = question.id.0.saturating_add(1);
            }
        }
        self.sections.insert(section.id, section);
    }

    // =========================================================================
    // NAME MINTING
    // =========================================================================

    /// Smallest `"<prefix> N"` (N >= 1) not already used as a section name.
    ///
    /// This is how authoring keeps display labels unique without asking
    /// the operator for a name up front.
    #[must_use]
    pub fn next_unique_name(&self, prefix: &str) -> String {
        let mut n: u64 = 1;
        loop {
            let candidate = format!("{prefix} {n}");
            if !self.sections.values().any(|s| s.name == candidate) {
                return candidate;
            }
            n = n.saturating_add(1);
        }
    }

    // =========================================================================
    // WELL-FORMEDNESS
    // =========================================================================

    /// Check the structural invariants every authoring operation must
    /// preserve:
    ///
    /// - every redirect value names a section that exists;
    /// - every `hierarchy_type` exactly reflects redirect-map emptiness;
    /// - no question carries two case-insensitively equal options;
    /// - section names are unique.
    pub fn validate(&self) -> Result<(), RamifyError> {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        for section in self.sections.values() {
            if !names.insert(section.name.as_str()) {
                return Err(RamifyError::MalformedDocument(format!(
                    "duplicate section name '{}'",
                    section.name
                )));
            }

            for question in &section.questions {
                for target in question.redirects.values() {
                    if !self.sections.contains_key(target) {
                        return Err(RamifyError::MalformedDocument(format!(
                            "question {:?} redirects to missing section {:?}",
                            question.id, target
                        )));
                    }
                }

                let expected_nested = !question.redirects.is_empty();
                let is_nested =
                    question.hierarchy_type == crate::types::HierarchyType::Nested;
                if expected_nested != is_nested {
                    return Err(RamifyError::MalformedDocument(format!(
                        "question {:?} hierarchy flag out of sync with its redirects",
                        question.id
                    )));
                }

                if let Some(dup) = Question::find_duplicate_option(&question.options) {
                    return Err(RamifyError::MalformedDocument(format!(
                        "question {:?} carries duplicate option '{dup}'",
                        question.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Content equality that ignores the identifier mints.
    ///
    /// Two documents are structurally equal when they hold the same
    /// sections with the same questions, regardless of how many ids were
    /// minted and discarded along the way.
    #[must_use]
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}

// =============================================================================
// TESTS
// =============================================================================
