//! # Authoring Command Processor
//!
//! Deterministic state transitions over a [`FormDocument`].
//!
//! Commands are a closed sum type consumed by a single [`apply`]
//! function, so dispatch is exhaustiveness-checked at compile time.
//! `apply` never mutates its input: it either returns a new well-formed
//! document or an error, and on error the caller still holds the
//! untouched original.

use crate::document::FormDocument;
use crate::primitives::{NESTED_SECTION_PREFIX, UNTITLED_SECTION_PREFIX};
use crate::types::{Question, QuestionType, RamifyError, ScaleBounds, Section, SectionId};

// =============================================================================
// COMMANDS
// =============================================================================

/// The closed set of authoring commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoringCommand {
    /// Append a new top-level section with an auto-generated unique name
    /// and an empty question list. Always succeeds.
    AddSection,

    /// Delete a section. Redirect entries elsewhere that pointed at it
    /// are severed so no dangling reference survives.
    RemoveSection {
        /// The section to delete.
        section: SectionId,
    },

    /// Append a new default question (short answer, empty text, not
    /// mandatory) to a section.
    AddQuestion {
        /// The owning section.
        section: SectionId,
    },

    /// Shallow-merge a patch into the addressed question.
    UpdateQuestion {
        /// The owning section.
        section: SectionId,
        /// Question position within the section.
        index: usize,
        /// Fields to overwrite; `None` fields are left untouched.
        patch: QuestionPatch,
    },

    /// Remove a question by position. Sections it redirected to are NOT
    /// cascade-deleted; use `RemoveNestedSection` first for that.
    RemoveQuestion {
        /// The owning section.
        section: SectionId,
        /// Question position within the section.
        index: usize,
    },

    /// Create a fresh nested section and point the addressed question's
    /// `option` at it. Each application mints a distinct section.
    AddNestedSection {
        /// The option text that will reveal the new section.
        option: String,
        /// Section holding the controlling question.
        parent: SectionId,
        /// Position of the controlling question.
        index: usize,
    },

    /// Delete a nested section entirely and remove the corresponding
    /// redirect entry from its controlling question.
    RemoveNestedSection {
        /// The nested section to delete.
        section: SectionId,
        /// Section holding the controlling question.
        parent: SectionId,
        /// Position of the controlling question.
        index: usize,
        /// The option whose redirect is being dissolved.
        option: String,
    },

    /// Repoint (or create) the redirect for `option` to an existing
    /// section, without creating a new one.
    UpdateOptionRedirect {
        /// Section holding the controlling question.
        section: SectionId,
        /// Position of the controlling question.
        index: usize,
        /// The option text to repoint.
        option: String,
        /// The existing section the option should reveal.
        target: SectionId,
    },
}

// =============================================================================
// QUESTION PATCH
// =============================================================================

/// Partial question update, shallow-merged by `UpdateQuestion`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionPatch {
    /// New prompt text.
    pub text: Option<String>,
    /// New question type.
    pub question_type: Option<QuestionType>,
    /// Replacement option list. Rejected if it carries a
    /// case-insensitive duplicate.
    pub options: Option<Vec<String>>,
    /// New mandatory flag.
    pub is_mandatory: Option<bool>,
    /// New scale bounds (linear-scale questions).
    pub scale: Option<ScaleBounds>,
}

impl QuestionPatch {
    /// Patch that only replaces the prompt text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Patch that only replaces the question type.
    #[must_use]
    pub fn question_type(question_type: QuestionType) -> Self {
        Self {
            question_type: Some(question_type),
            ..Self::default()
        }
    }

    /// Patch that only replaces the option list.
    #[must_use]
    pub fn options(options: Vec<String>) -> Self {
        Self {
            options: Some(options),
            ..Self::default()
        }
    }

    /// Patch that only flips the mandatory flag.
    #[must_use]
    pub fn mandatory(is_mandatory: bool) -> Self {
        Self {
            is_mandatory: Some(is_mandatory),
            ..Self::default()
        }
    }
}

// =============================================================================
// APPLY
// =============================================================================

/// Apply one authoring command, returning the successor document.
///
/// Either the result satisfies every structural invariant
/// (see [`FormDocument::validate`]) or an error is returned and the
/// input document is left exactly as it was.
pub fn apply(
    document: &FormDocument,
    command: &AuthoringCommand,
) -> Result<FormDocument, RamifyError> {
    let mut next = document.clone();
    match command {
        AuthoringCommand::AddSection => {
            let name = next.next_unique_name(UNTITLED_SECTION_PREFIX);
            let id = next.mint_section_id();
            next.insert_section(Section::new(id, name, false));
        }

        AuthoringCommand::RemoveSection { section } => {
            next.remove_section(*section)
                .ok_or(RamifyError::SectionNotFound(*section))?;
            sever_redirects(&mut next, *section);
        }

        AuthoringCommand::AddQuestion { section } => {
            let id = next.mint_question_id();
            let owner = next
                .section_mut(*section)
                .ok_or(RamifyError::SectionNotFound(*section))?;
            owner.questions.push(Question::new(id));
        }

        AuthoringCommand::UpdateQuestion {
            section,
            index,
            patch,
        } => {
            let question = question_mut(&mut next, *section, *index)?;

            if let Some(options) = &patch.options {
                if let Some(option) = Question::find_duplicate_option(options) {
                    return Err(RamifyError::DuplicateOption {
                        question: question.id,
                        option,
                    });
                }
                question.options.clone_from(options);
            }
            if let Some(text) = &patch.text {
                question.text.clone_from(text);
            }
            if let Some(question_type) = patch.question_type {
                question.question_type = question_type;
            }
            if let Some(is_mandatory) = patch.is_mandatory {
                question.is_mandatory = is_mandatory;
            }
            if let Some(scale) = &patch.scale {
                question.scale = Some(scale.clone());
            }
        }

        AuthoringCommand::RemoveQuestion { section, index } => {
            let owner = next
                .section_mut(*section)
                .ok_or(RamifyError::SectionNotFound(*section))?;
            if *index >= owner.questions.len() {
                return Err(RamifyError::QuestionIndexOutOfRange {
                    section: *section,
                    index: *index,
                });
            }
            owner.questions.remove(*index);
        }

        AuthoringCommand::AddNestedSection {
            option,
            parent,
            index,
        } => {
            // Address must resolve before a fresh section is minted.
            if next.question_at(*parent, *index).is_none() {
                return Err(address_error(&next, *parent, *index));
            }

            let name = next.next_unique_name(NESTED_SECTION_PREFIX);
            let id = next.mint_section_id();
            next.insert_section(Section::new(id, name, true));

            let question = question_mut(&mut next, *parent, *index)?;
            question.set_redirect(option.clone(), id);
        }

        AuthoringCommand::RemoveNestedSection {
            section,
            parent,
            index,
            option,
        } => {
            let question = next
                .question_at(*parent, *index)
                .ok_or_else(|| address_error(&next, *parent, *index))?;
            match question.redirects.get(option) {
                Some(target) if target == section => {}
                _ => {
                    return Err(RamifyError::RedirectNotFound {
                        option: option.clone(),
                    });
                }
            }

            next.remove_section(*section)
                .ok_or(RamifyError::SectionNotFound(*section))?;

            let question = question_mut(&mut next, *parent, *index)?;
            question.remove_redirect(option);

            // Other questions may also have pointed at the dead section.
            sever_redirects(&mut next, *section);
        }

        AuthoringCommand::UpdateOptionRedirect {
            section,
            index,
            option,
            target,
        } => {
            if next.section(*target).is_none() {
                return Err(RamifyError::SectionNotFound(*target));
            }

            let question = question_mut(&mut next, *section, *index)?;
            question.set_redirect(option.clone(), *target);

            // The target is now reachable via a redirect.
            if let Some(target_section) = next.section_mut(*target) {
                target_section.is_nested = true;
            }
        }
    }
    Ok(next)
}

// =============================================================================
// HELPERS
// =============================================================================

/// Delete every redirect entry anywhere that points at `dead`.
///
/// Hierarchy flags revert to `Normal` wherever a map empties out, so
/// removing a section never orphans a redirect.
fn sever_redirects(document: &mut FormDocument, dead: SectionId) {
    for section in document.sections_mut() {
        for question in &mut section.questions {
            question.sever_redirects_to(dead);
        }
    }
}

/// Mutable question lookup with structural-error reporting.
fn question_mut(
    document: &mut FormDocument,
    section: SectionId,
    index: usize,
) -> Result<&mut Question, RamifyError> {
    let owner = document
        .section_mut(section)
        .ok_or(RamifyError::SectionNotFound(section))?;
    owner
        .questions
        .get_mut(index)
        .ok_or(RamifyError::QuestionIndexOutOfRange { section, index })
}

/// Distinguish a missing section from an out-of-range question position.
fn address_error(document: &FormDocument, section: SectionId, index: usize) -> RamifyError {
    if document.section(section).is_none() {
        RamifyError::SectionNotFound(section)
    } else {
        RamifyError::QuestionIndexOutOfRange { section, index }
    }
}

// =============================================================================
// TESTS
// =============================================================================
