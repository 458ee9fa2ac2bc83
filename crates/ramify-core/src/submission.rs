//! # Answer Payload Serializer
//!
//! Walks the document filtered by the resolver's hidden set and produces
//! the wire-format submission: only visible sections, only answered
//! questions, with per-type normalization on the way out.
//!
//! The output is fully computed before any external submit begins; there
//! is no partial or streaming submission.

use crate::document::FormDocument;
use crate::primitives::CHECKBOX_JOIN_SEPARATOR;
use crate::types::{Answer, Question, QuestionType, RamifyError, SectionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// One question in the submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuestion {
    /// Prompt text.
    pub text: String,
    /// The question type, as its wire name.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Normalized answer string. Empty for attach-file questions, whose
    /// payload is the filename reference below.
    pub answer: String,
    /// Filename reference; present only for attach-file questions. The
    /// binary itself travels on the upload channel, never inline here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// One visible, non-empty section in the submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSection {
    /// Section display label.
    pub name: String,
    /// Answered questions only, in section order.
    pub questions: Vec<SubmissionQuestion>,
}

/// The submission document sent to the external submit collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDocument {
    /// The client/subject this submission belongs to.
    pub subject_id: String,
    /// Visible sections that retained at least one answered question.
    pub sections: Vec<SubmissionSection>,
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Build the submission payload.
///
/// The mandatory gate runs first: if any visible section holds a
/// mandatory question with no present answer, this fails with
/// [`RamifyError::MissingRequiredAnswer`] naming the first offender in
/// document order. Submission is blocked until the operator resolves it;
/// nothing is silently omitted.
pub fn build_submission(
    document: &FormDocument,
    hidden: &BTreeSet<SectionId>,
    subject_id: impl Into<String>,
) -> Result<SubmissionDocument, RamifyError> {
    check_mandatory(document, hidden)?;

    let sections = document
        .sections()
        .filter(|section| !hidden.contains(&section.id))
        .filter_map(|section| {
            let questions: Vec<SubmissionQuestion> = section
                .questions
                .iter()
                .filter(|question| question.answer.is_present())
                .map(serialize_question)
                .collect();
            if questions.is_empty() {
                None
            } else {
                Some(SubmissionSection {
                    name: section.name.clone(),
                    questions,
                })
            }
        })
        .collect();

    Ok(SubmissionDocument {
        subject_id: subject_id.into(),
        sections,
    })
}

/// Fail on the first visible, mandatory, unanswered question.
fn check_mandatory(
    document: &FormDocument,
    hidden: &BTreeSet<SectionId>,
) -> Result<(), RamifyError> {
    for section in document.sections() {
        if hidden.contains(&section.id) {
            continue;
        }
        for question in &section.questions {
            if question.is_mandatory && !question.answer.is_present() {
                return Err(RamifyError::MissingRequiredAnswer {
                    section: section.name.clone(),
                    question: question.text.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Per-type answer normalization.
fn serialize_question(question: &Question) -> SubmissionQuestion {
    let (answer, file_path) = match &question.answer {
        Answer::Selections(items) => (items.join(CHECKBOX_JOIN_SEPARATOR), None),
        Answer::File(file) => (String::new(), Some(file.filename.clone())),
        Answer::Text(text) => (text.clone(), None),
        // Already filtered out by the presence check.
        Answer::None => (String::new(), None),
    };
    SubmissionQuestion {
        text: question.text.clone(),
        question_type: question.question_type,
        answer,
        file_path,
    }
}

// =============================================================================
// TESTS
// =============================================================================
