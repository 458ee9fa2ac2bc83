//! # Formats
//!
//! Wire-format codecs for documents crossing the engine boundary.
//!
//! The definition document (authoring output, runtime input) lives in
//! [`definition`]. The submission document is owned by the
//! [`crate::submission`] module because its shape is inseparable from
//! the serialization rules that produce it.

pub mod definition;

pub use definition::{document_from_json, document_to_json};
