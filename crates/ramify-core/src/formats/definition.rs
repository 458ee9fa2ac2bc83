//! # Definition Document Format
//!
//! JSON serialization for the definition document: the sequence of
//! sections produced at authoring time and loaded back at runtime.
//!
//! Format: a JSON array of sections, each carrying its questions,
//! options, and option-to-section redirects under the fixed camelCase
//! field names. Runtime answers are engine-local state and are never
//! part of this document.
//!
//! ## Security
//!
//! Imports are validated BEFORE deserialization where possible:
//! - Maximum payload size limit (`MAX_DEFINITION_PAYLOAD_SIZE`)
//! - Section/question count limits after parsing
//! - Structural invariant check before the document is handed out

use crate::document::FormDocument;
use crate::primitives::{
    MAX_DEFINITION_PAYLOAD_SIZE, MAX_IMPORT_QUESTION_COUNT, MAX_IMPORT_SECTION_COUNT,
};
use crate::types::{
    Answer, HierarchyType, Question, QuestionId, QuestionType, RamifyError, ScaleBounds, Section,
    SectionId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// WIRE SHAPES
// =============================================================================

/// One section of the definition document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSection {
    /// Stable section identifier.
    pub section_id: u64,
    /// Display label.
    pub name: String,
    /// True when the section is reachable only via a redirect.
    #[serde(default)]
    pub is_nested: bool,
    /// The section's questions, in order.
    #[serde(default)]
    pub questions: Vec<DefinitionQuestion>,
}

/// One question of the definition document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionQuestion {
    /// Stable question identifier.
    pub id: u64,
    /// The question type, as its wire name.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Prompt string.
    #[serde(default)]
    pub text: String,
    /// Ordered option strings for the choice-bearing types.
    #[serde(default)]
    pub options: Vec<String>,
    /// Mapping from option text to the id of the section it reveals.
    #[serde(default)]
    pub option_to_section_map: BTreeMap<String, u64>,
    /// Whether the question controls nested sections.
    #[serde(default)]
    pub hierarchy_type: HierarchyType,
    /// Whether an answer is required at submission time.
    #[serde(default)]
    pub is_mandatory: bool,
    /// Linear-scale lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_scale: Option<i64>,
    /// Linear-scale upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scale: Option<i64>,
    /// Label at the lower end of the scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label1: Option<String>,
    /// Label at the upper end of the scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label2: Option<String>,
}

// =============================================================================
// EXPORT
// =============================================================================

/// Serialize a document to definition JSON.
///
/// This is a pure transformation - no file I/O.
pub fn document_to_json(document: &FormDocument) -> Result<String, RamifyError> {
    let sections: Vec<DefinitionSection> = document.sections().map(section_to_wire).collect();
    serde_json::to_string(&sections).map_err(|e| RamifyError::SerializationError(e.to_string()))
}

fn section_to_wire(section: &Section) -> DefinitionSection {
    DefinitionSection {
        section_id: section.id.0,
        name: section.name.clone(),
        is_nested: section.is_nested,
        questions: section.questions.iter().map(question_to_wire).collect(),
    }
}

fn question_to_wire(question: &Question) -> DefinitionQuestion {
    let scale = question.scale.as_ref();
    DefinitionQuestion {
        id: question.id.0,
        question_type: question.question_type,
        text: question.text.clone(),
        options: question.options.clone(),
        option_to_section_map: question
            .redirects
            .iter()
            .map(|(option, target)| (option.clone(), target.0))
            .collect(),
        hierarchy_type: question.hierarchy_type,
        is_mandatory: question.is_mandatory,
        min_scale: scale.map(|s| s.min_scale),
        max_scale: scale.map(|s| s.max_scale),
        label1: scale.map(|s| s.label1.clone()),
        label2: scale.map(|s| s.label2.clone()),
    }
}

// =============================================================================
// IMPORT
// =============================================================================

/// Deserialize a definition document into a runtime-ready
/// [`FormDocument`] with all answers unset.
///
/// Rejects oversized payloads before parsing, over-limit documents after
/// parsing, and anything that fails the structural invariant check.
pub fn document_from_json(payload: &str) -> Result<FormDocument, RamifyError> {
    if payload.len() > MAX_DEFINITION_PAYLOAD_SIZE {
        return Err(RamifyError::DeserializationError(format!(
            "definition payload exceeds {MAX_DEFINITION_PAYLOAD_SIZE} bytes"
        )));
    }

    let sections: Vec<DefinitionSection> = serde_json::from_str(payload)
        .map_err(|e| RamifyError::DeserializationError(e.to_string()))?;

    if sections.len() > MAX_IMPORT_SECTION_COUNT {
        return Err(RamifyError::DeserializationError(format!(
            "definition holds more than {MAX_IMPORT_SECTION_COUNT} sections"
        )));
    }
    let question_count: usize = sections.iter().map(|s| s.questions.len()).sum();
    if question_count > MAX_IMPORT_QUESTION_COUNT {
        return Err(RamifyError::DeserializationError(format!(
            "definition holds more than {MAX_IMPORT_QUESTION_COUNT} questions"
        )));
    }

    let mut document = FormDocument::new();
    for section in sections {
        document.import_section(section_from_wire(section));
    }

    document
        .validate()
        .map_err(|e| RamifyError::DeserializationError(e.to_string()))?;
    Ok(document)
}

fn section_from_wire(wire: DefinitionSection) -> Section {
    Section {
        id: SectionId(wire.section_id),
        name: wire.name,
        is_nested: wire.is_nested,
        questions: wire.questions.into_iter().map(question_from_wire).collect(),
    }
}

fn question_from_wire(wire: DefinitionQuestion) -> Question {
    let scale = if wire.min_scale.is_some()
        || wire.max_scale.is_some()
        || wire.label1.is_some()
        || wire.label2.is_some()
    {
        let defaults = ScaleBounds::default();
        Some(ScaleBounds {
            min_scale: wire.min_scale.unwrap_or(defaults.min_scale),
            max_scale: wire.max_scale.unwrap_or(defaults.max_scale),
            label1: wire.label1.unwrap_or_default(),
            label2: wire.label2.unwrap_or_default(),
        })
    } else {
        None
    };

    Question {
        id: QuestionId(wire.id),
        question_type: wire.question_type,
        text: wire.text,
        options: wire.options,
        redirects: wire
            .option_to_section_map
            .into_iter()
            .map(|(option, target)| (option, SectionId(target)))
            .collect(),
        hierarchy_type: wire.hierarchy_type,
        is_mandatory: wire.is_mandatory,
        scale,
        answer: Answer::None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
