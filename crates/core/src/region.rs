use serde::Deserialize;
use std::fmt;

/// A rectangle in source-image pixel coordinates.
///
/// Fields are signed so that a negative origin decodes cleanly and is
/// rejected at crop time as out of bounds instead of as a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Shape {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Shape {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge, `None` on overflow.
    pub fn right(&self) -> Option<i64> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` on overflow.
    pub fn bottom(&self) -> Option<i64> {
        self.y.checked_add(self.height)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Declared content type of an annotated region.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RegionType {
    Text,
    Num,
    Checkbox,
    Image,
    /// Any other declared value, kept verbatim.
    Other(String),
}

impl RegionType {
    pub fn as_str(&self) -> &str {
        match self {
            RegionType::Text => "text",
            RegionType::Num => "num",
            RegionType::Checkbox => "checkbox",
            RegionType::Image => "image",
            RegionType::Other(s) => s,
        }
    }

    /// Whether classifying this region needs its pixels.
    pub fn needs_pixels(&self) -> bool {
        matches!(self, RegionType::Text | RegionType::Num | RegionType::Checkbox)
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Matching is exact and case-sensitive: "Text" is not "text".
impl From<&str> for RegionType {
    fn from(s: &str) -> Self {
        match s {
            "text" => RegionType::Text,
            "num" => RegionType::Num,
            "checkbox" => RegionType::Checkbox,
            "image" => RegionType::Image,
            other => RegionType::Other(other.to_string()),
        }
    }
}

impl From<String> for RegionType {
    fn from(s: String) -> Self {
        match RegionType::from(s.as_str()) {
            RegionType::Other(_) => RegionType::Other(s),
            known => known,
        }
    }
}

impl From<RegionType> for String {
    fn from(t: RegionType) -> Self {
        match t {
            RegionType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// One decoded row of the annotations table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    /// 1-based index of the data row (header excluded).
    pub row: usize,
    pub shape: Shape,
    pub region_type: RegionType,
    pub label: String,
}
