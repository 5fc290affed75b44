use serde::{Serialize, Serializer};
use std::fmt;

/// Content written for a text/num region whose recognized text is blank.
pub const NO_TEXT_DETECTED: &str = "no text detected";
/// Content written for a region whose declared type is not known.
pub const UNRECOGNIZED_REGION_TYPE: &str = "unrecognized region type";

/// What was extracted from one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Trimmed, non-empty recognized text.
    Text(String),
    Checkbox(bool),
    NoTextDetected,
    UnrecognizedRegionType,
}

impl Content {
    /// Build text content from raw OCR output: trimmed, blank becomes
    /// [`Content::NoTextDetected`].
    pub fn from_recognized(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Content::NoTextDetected
        } else {
            Content::Text(trimmed.to_string())
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(s) => f.write_str(s),
            Content::Checkbox(true) => f.write_str("yes"),
            Content::Checkbox(false) => f.write_str("no"),
            Content::NoTextDetected => f.write_str(NO_TEXT_DETECTED),
            Content::UnrecognizedRegionType => f.write_str(UNRECOGNIZED_REGION_TYPE),
        }
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Content")]
    pub content: Content,
}

impl OutputRecord {
    pub fn new(label: impl Into<String>, content: Content) -> Self {
        Self { label: label.into(), content }
    }
}
