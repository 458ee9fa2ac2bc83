//! # Branching Resolver
//!
//! Computes which sections are currently hidden given the answers
//! embedded in the document.
//!
//! Hiding is the default: a redirected section is visible only while its
//! controlling question's answer exactly matches the option that unlocks
//! it. At most one nested branch per controlling question escapes the
//! hidden set, so radio-button exclusivity needs no explicit
//! mutual-exclusion rule.
//!
//! The hidden set is a pure function of the document and is re-derived
//! from scratch on every call; nothing here is incrementally maintained.

use crate::document::FormDocument;
use crate::types::SectionId;
use std::collections::BTreeSet;

/// Compute the set of hidden section ids.
///
/// For every redirect edge `(option, target)`, `target` is hidden unless
/// the controlling question's current answer equals `option` exactly.
///
/// Only one level of redirection is resolved: a hidden parent does not
/// transitively hide its children's own targets. Once a second-level
/// branch has been unlocked it stays governed by its own controlling
/// question alone.
#[must_use]
pub fn hidden_sections(document: &FormDocument) -> BTreeSet<SectionId> {
    let mut hidden = BTreeSet::new();
    for section in document.sections() {
        for question in &section.questions {
            for (option, target) in &question.redirects {
                if !question.answer.matches_option(option) {
                    hidden.insert(*target);
                }
            }
        }
    }
    hidden
}

/// Whether a single section is currently visible.
///
/// Convenience wrapper over [`hidden_sections`]; sections that are not
/// redirect targets are always visible.
#[must_use]
pub fn is_section_visible(document: &FormDocument, id: SectionId) -> bool {
    !hidden_sections(document).contains(&id)
}

// =============================================================================
// TESTS
// =============================================================================
