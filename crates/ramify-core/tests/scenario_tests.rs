//! # End-to-End Scenarios
//!
//! Full-engine flows exercised through the public surface:
//! authoring -> definition transport -> answering -> resolution ->
//! submission.
//!
//! ## Groups
//! - S1: Screening branch visibility
//! - S2: Answer normalization
//! - S3: Authoring rejections
//! - S4: The mandatory-answer gate

use ramify_core::{
    Answer, AuthoringCommand, FileReference, FormSession, QuestionPatch, QuestionType,
    RamifyError, SectionId,
};

/// Build the canonical screening form: a "Screening" section whose
/// multiple-choice "Smoker?" question redirects "Yes" to a
/// "Smoking History" section holding one answered question.
fn screening_form() -> (FormSession, SectionId, SectionId) {
    let mut session = FormSession::new();
    session.apply(&AuthoringCommand::AddSection).expect("add section");
    let screening = session
        .document()
        .sections()
        .next()
        .map(|s| s.id)
        .expect("screening section");

    session
        .apply(&AuthoringCommand::AddQuestion { section: screening })
        .expect("add question");
    session
        .apply(&AuthoringCommand::UpdateQuestion {
            section: screening,
            index: 0,
            patch: QuestionPatch {
                text: Some("Smoker?".to_string()),
                question_type: Some(QuestionType::MultipleChoice),
                options: Some(vec!["Yes".to_string(), "No".to_string()]),
                is_mandatory: None,
                scale: None,
            },
        })
        .expect("shape question");
    session
        .apply(&AuthoringCommand::AddNestedSection {
            option: "Yes".to_string(),
            parent: screening,
            index: 0,
        })
        .expect("nest");

    let history = session
        .document()
        .sections()
        .find(|s| s.is_nested)
        .map(|s| s.id)
        .expect("history section");

    // Fill the nested section with an answered question so only
    // visibility decides whether it reaches the payload.
    session
        .apply(&AuthoringCommand::AddQuestion { section: history })
        .expect("add nested question");
    session
        .apply(&AuthoringCommand::UpdateQuestion {
            section: history,
            index: 0,
            patch: QuestionPatch::text("Years smoking?"),
        })
        .expect("shape nested question");
    session
        .set_answer(history, 0, Answer::text("10"))
        .expect("answer nested question");

    (session, screening, history)
}

// =============================================================================
// S1: SCREENING BRANCH VISIBILITY
// =============================================================================

mod s1_screening_branch {
    use super::*;

    /// S1.1: With the controlling answer unset, the nested section is
    /// excluded from submission even though it contains answered questions.
    #[test]
    fn unset_answer_excludes_nested_section() {
        let (mut session, screening, _history) = screening_form();
        session
            .set_answer(screening, 0, Answer::text("irrelevant-warmup"))
            .expect("answer");
        session
            .set_answer(screening, 0, Answer::None)
            .expect("clear");

        let payload = session.submit("client-7").expect("submit");
        assert!(payload.sections.iter().all(|s| s.name != "Nested Section 1"));
    }

    /// S1.2: Answering "Yes" makes the nested section eligible.
    #[test]
    fn matching_answer_includes_nested_section() {
        let (mut session, screening, history) = screening_form();
        session
            .set_answer(screening, 0, Answer::text("Yes"))
            .expect("answer");

        assert!(session.is_section_visible(history));
        let payload = session.submit("client-7").expect("submit");
        let names: Vec<&str> = payload.sections.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"Nested Section 1"));
    }

    /// S1.3: Moving to "No" and back to unset hides it again,
    /// deterministically.
    #[test]
    fn answer_changes_rehide_deterministically() {
        let (mut session, screening, history) = screening_form();

        session
            .set_answer(screening, 0, Answer::text("Yes"))
            .expect("answer yes");
        assert!(session.is_section_visible(history));

        session
            .set_answer(screening, 0, Answer::text("No"))
            .expect("answer no");
        assert!(!session.is_section_visible(history));

        session
            .set_answer(screening, 0, Answer::None)
            .expect("clear");
        assert!(!session.is_section_visible(history));
        assert_eq!(session.hidden_sections().len(), 1);
    }

    /// S1.4: The same flow survives definition-document transport:
    /// author, export, reload, then answer at runtime.
    #[test]
    fn branching_survives_definition_transport() {
        let (session, screening, _history) = screening_form();
        let json = session.definition_json().expect("export");

        let mut runtime = FormSession::from_definition_json(&json).expect("import");
        let history = runtime
            .document()
            .sections()
            .find(|s| s.is_nested)
            .map(|s| s.id)
            .expect("history section");

        // Answers never travel in the definition document.
        assert!(!runtime.is_section_visible(history));

        runtime
            .set_answer(screening, 0, Answer::text("Yes"))
            .expect("answer");
        assert!(runtime.is_section_visible(history));
    }
}

// =============================================================================
// S2: ANSWER NORMALIZATION
// =============================================================================

mod s2_normalization {
    use super::*;

    /// S2.1: A checkbox answer of ["A","B","C"] serializes to "A, B, C".
    #[test]
    fn checkbox_selections_join() {
        let mut session = FormSession::new();
        session.apply(&AuthoringCommand::AddSection).expect("add");
        let section = session
            .document()
            .sections()
            .next()
            .map(|s| s.id)
            .expect("section");
        session
            .apply(&AuthoringCommand::AddQuestion { section })
            .expect("add");
        session
            .apply(&AuthoringCommand::UpdateQuestion {
                section,
                index: 0,
                patch: QuestionPatch {
                    text: Some("Symptoms?".to_string()),
                    question_type: Some(QuestionType::CheckBoxes),
                    options: Some(vec![
                        "A".to_string(),
                        "B".to_string(),
                        "C".to_string(),
                    ]),
                    is_mandatory: None,
                    scale: None,
                },
            })
            .expect("shape");
        session
            .set_answer(
                section,
                0,
                Answer::Selections(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
            )
            .expect("answer");

        let payload = session.submit("client-7").expect("submit");
        assert_eq!(payload.sections[0].questions[0].answer, "A, B, C");
    }

    /// S2.2: An attach-file answer named "report.pdf" serializes to a
    /// filename reference with no binary content inlined.
    #[test]
    fn attach_file_becomes_filename_reference() {
        let mut session = FormSession::new();
        session.apply(&AuthoringCommand::AddSection).expect("add");
        let section = session
            .document()
            .sections()
            .next()
            .map(|s| s.id)
            .expect("section");
        session
            .apply(&AuthoringCommand::AddQuestion { section })
            .expect("add");
        session
            .apply(&AuthoringCommand::UpdateQuestion {
                section,
                index: 0,
                patch: QuestionPatch {
                    text: Some("Latest report".to_string()),
                    question_type: Some(QuestionType::AttachFile),
                    options: None,
                    is_mandatory: None,
                    scale: None,
                },
            })
            .expect("shape");
        session
            .set_answer(section, 0, Answer::File(FileReference::new("report.pdf")))
            .expect("answer");

        let payload = session.submit("client-7").expect("submit");
        let question = &payload.sections[0].questions[0];
        assert_eq!(question.question_type, QuestionType::AttachFile);
        assert_eq!(question.file_path.as_deref(), Some("report.pdf"));
        assert_eq!(question.answer, "");
    }
}

// =============================================================================
// S3: AUTHORING REJECTIONS
// =============================================================================

mod s3_authoring_rejections {
    use super::*;

    /// S3.1: A case-insensitive duplicate option is rejected and the
    /// session's document is not mutated.
    #[test]
    fn duplicate_option_rejected_without_mutation() {
        let (mut session, screening, _history) = screening_form();
        let before = session.document().clone();

        let result = session.apply(&AuthoringCommand::UpdateQuestion {
            section: screening,
            index: 0,
            patch: QuestionPatch::options(vec!["Maybe".to_string(), "MAYBE".to_string()]),
        });

        assert!(matches!(result, Err(RamifyError::DuplicateOption { .. })));
        assert!(session.document().structurally_eq(&before));
    }

    /// S3.2: Structural errors carry the failing address and are
    /// recoverable: the session keeps accepting commands afterwards.
    #[test]
    fn structural_error_is_recoverable() {
        let (mut session, _screening, _history) = screening_form();

        let result = session.apply(&AuthoringCommand::AddQuestion {
            section: SectionId(404),
        });
        assert_eq!(result, Err(RamifyError::SectionNotFound(SectionId(404))));

        session.apply(&AuthoringCommand::AddSection).expect("still editable");
    }
}

// =============================================================================
// S4: THE MANDATORY-ANSWER GATE
// =============================================================================

mod s4_mandatory_gate {
    use super::*;

    /// S4.1: A visible mandatory question without an answer blocks the
    /// submit and names the offender; answering unblocks it.
    #[test]
    fn unanswered_mandatory_blocks_until_resolved() {
        let (mut session, screening, _history) = screening_form();
        session
            .apply(&AuthoringCommand::UpdateQuestion {
                section: screening,
                index: 0,
                patch: QuestionPatch::mandatory(true),
            })
            .expect("mark mandatory");

        let blocked = session.submit("client-7");
        assert_eq!(
            blocked,
            Err(RamifyError::MissingRequiredAnswer {
                section: "Untitled Section 1".to_string(),
                question: "Smoker?".to_string(),
            })
        );

        session
            .set_answer(screening, 0, Answer::text("No"))
            .expect("answer");
        assert!(session.submit("client-7").is_ok());
    }

    /// S4.2: A mandatory question inside a hidden branch does not gate
    /// the submit.
    #[test]
    fn hidden_mandatory_does_not_block() {
        let (mut session, _screening, history) = screening_form();
        session
            .apply(&AuthoringCommand::UpdateQuestion {
                section: history,
                index: 0,
                patch: QuestionPatch::mandatory(true),
            })
            .expect("mark mandatory");
        session
            .set_answer(history, 0, Answer::None)
            .expect("clear nested answer");

        // The history branch is hidden (controlling answer unset), so its
        // mandatory question is not consulted.
        assert!(session.submit("client-7").is_ok());
    }
}
