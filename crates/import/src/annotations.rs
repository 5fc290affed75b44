use formscan_core::{AnnotationRow, RegionType, RowErrorPolicy, Shape};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SHAPE_COLUMN: &str = "region_shape_attributes";
pub const ATTRIBUTES_COLUMN: &str = "region_attributes";

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Failed to open annotations {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Row {row}: malformed `{column}`: {reason}")]
    MalformedField {
        row: usize,
        column: &'static str,
        reason: String,
    },
}

/// Rows decoded from an annotations table.
#[derive(Debug, Default)]
pub struct LoadedAnnotations {
    pub rows: Vec<AnnotationRow>,
    /// Rows dropped under [`RowErrorPolicy::Skip`].
    pub skipped: usize,
}

// The shape column decodes straight into `Shape`. Unknown keys (VIA writes
// `"name": "rect"` into the shape) are ignored.

#[derive(Debug, Deserialize)]
struct RegionAttributes {
    #[serde(rename = "type")]
    region_type: RegionType,
    label: String,
}

pub fn load_annotations(
    path: &Path,
    policy: RowErrorPolicy,
) -> Result<LoadedAnnotations, AnnotationError> {
    let file = std::fs::File::open(path).map_err(|source| AnnotationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_annotations(file, policy)
}

pub fn read_annotations<R: Read>(
    data: R,
    policy: RowErrorPolicy,
) -> Result<LoadedAnnotations, AnnotationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| AnnotationError::MissingColumn(name.to_string()))
    };
    let shape_col = column(SHAPE_COLUMN)?;
    let attrs_col = column(ATTRIBUTES_COLUMN)?;

    let mut loaded = LoadedAnnotations::default();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;

        match decode_row(row, record.get(shape_col), record.get(attrs_col)) {
            Ok(annotation) => loaded.rows.push(annotation),
            Err(e @ AnnotationError::MalformedField { .. }) if policy == RowErrorPolicy::Skip => {
                tracing::warn!(row, "Skipping annotation: {e}");
                loaded.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(rows = loaded.rows.len(), skipped = loaded.skipped, "Annotations loaded");
    Ok(loaded)
}

fn decode_row(
    row: usize,
    shape_field: Option<&str>,
    attrs_field: Option<&str>,
) -> Result<AnnotationRow, AnnotationError> {
    let shape: Shape = decode_field(row, SHAPE_COLUMN, shape_field)?;
    let attrs: RegionAttributes = decode_field(row, ATTRIBUTES_COLUMN, attrs_field)?;

    Ok(AnnotationRow {
        row,
        shape,
        region_type: attrs.region_type,
        label: attrs.label,
    })
}

fn decode_field<T: for<'de> Deserialize<'de>>(
    row: usize,
    column: &'static str,
    field: Option<&str>,
) -> Result<T, AnnotationError> {
    let malformed = |reason: String| AnnotationError::MalformedField { row, column, reason };
    let field = field.ok_or_else(|| malformed("value missing".to_string()))?;
    serde_json::from_str(field).map_err(|e| malformed(e.to_string()))
}
