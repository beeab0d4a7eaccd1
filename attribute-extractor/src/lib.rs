//! Extracts typed fields out of opaque, free-text or XML-tagged attribute
//! blobs. Every field is tried through an ordered list of
//! strategies — cheap exact matches first, shape-based fallbacks last — and
//! ambiguous shapes are deliberately left unset rather than guessed.

pub mod error;
pub mod extractors;
pub mod fields;

pub use error::ExtractionError;
pub use extractors::{DigitShapeExtractor, FieldExtractor, XmlTagExtractor};
pub use fields::{extract, ExtractedAttributes};
