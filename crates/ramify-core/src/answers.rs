//! # Answer Collector
//!
//! The single runtime mutation: replacing one question's `answer` field.
//!
//! No validation happens here. Required-field checking is deferred to
//! submission time so partial, in-progress answer states stay
//! representable.

use crate::document::FormDocument;
use crate::types::{Answer, RamifyError, SectionId};

/// Replace exactly the addressed question's answer.
///
/// Every other field and every other section is carried over unchanged.
/// Bad addresses are structural errors, reported without touching the
/// input document.
pub fn set_answer(
    document: &FormDocument,
    section: SectionId,
    index: usize,
    answer: Answer,
) -> Result<FormDocument, RamifyError> {
    let mut next = document.clone();
    let owner = next
        .section_mut(section)
        .ok_or(RamifyError::SectionNotFound(section))?;
    let question = owner
        .questions
        .get_mut(index)
        .ok_or(RamifyError::QuestionIndexOutOfRange { section, index })?;
    question.answer = answer;
    Ok(next)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authoring::{AuthoringCommand, apply};

    fn two_question_doc() -> (FormDocument, SectionId) {
        let doc = apply(&FormDocument::new(), &AuthoringCommand::AddSection).expect("add");
        let section = doc.sections().next().map(|s| s.id).expect("section");
        let doc = apply(&doc, &AuthoringCommand::AddQuestion { section }).expect("add");
        let doc = apply(&doc, &AuthoringCommand::AddQuestion { section }).expect("add");
        (doc, section)
    }

    #[test]
    fn set_answer_touches_only_the_addressed_question() {
        let (doc, section) = two_question_doc();
        let updated = set_answer(&doc, section, 0, Answer::text("hello")).expect("set");

        assert_eq!(
            updated.question_at(section, 0).map(|q| &q.answer),
            Some(&Answer::text("hello"))
        );
        assert_eq!(
            updated.question_at(section, 1).map(|q| &q.answer),
            Some(&Answer::None)
        );
        // Original untouched.
        assert_eq!(
            doc.question_at(section, 0).map(|q| &q.answer),
            Some(&Answer::None)
        );
    }

    #[test]
    fn overwriting_an_answer_replaces_it() {
        let (doc, section) = two_question_doc();
        let doc = set_answer(&doc, section, 0, Answer::text("first")).expect("set");
        let doc = set_answer(&doc, section, 0, Answer::text("second")).expect("set");

        assert_eq!(
            doc.question_at(section, 0).map(|q| &q.answer),
            Some(&Answer::text("second"))
        );
    }

    #[test]
    fn no_validation_happens_on_the_way_in() {
        let (doc, section) = two_question_doc();
        // An empty text answer is representable mid-fill.
        let doc = set_answer(&doc, section, 0, Answer::text("")).expect("set");
        assert!(
            !doc.question_at(section, 0)
                .map(|q| q.answer.is_present())
                .unwrap_or(true)
        );
    }

    #[test]
    fn bad_addresses_are_structural_errors() {
        let (doc, section) = two_question_doc();
        assert!(matches!(
            set_answer(&doc, SectionId(404), 0, Answer::None),
            Err(RamifyError::SectionNotFound(_))
        ));
        assert!(matches!(
            set_answer(&doc, section, 9, Answer::None),
            Err(RamifyError::QuestionIndexOutOfRange { .. })
        ));
    }
}
