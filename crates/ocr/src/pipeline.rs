use formscan_core::{AnnotationRow, OutputRecord, RowErrorPolicy};
use image::DynamicImage;
use thiserror::Error;

use crate::classify::{classify_region, ClassifyError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::region::{crop_region, RegionError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Row {row} ({label:?}): {source}")]
    Region {
        row: usize,
        label: String,
        #[source]
        source: RegionError,
    },
    #[error("Row {row} ({label:?}): OCR recognition failed: {source}")]
    Ocr {
        row: usize,
        label: String,
        #[source]
        source: OcrError,
    },
}

/// The records of a completed run, in row order.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub records: Vec<OutputRecord>,
    /// Rows dropped under [`RowErrorPolicy::Skip`].
    pub skipped: usize,
}

/// Orchestrates, per row: crop → classify → append.
pub struct FormPipeline<R: OcrBackend> {
    recognizer: R,
    policy: RowErrorPolicy,
}

impl<R: OcrBackend> FormPipeline<R> {
    pub fn new(recognizer: R, policy: RowErrorPolicy) -> Self {
        Self { recognizer, policy }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Process every row against the source image. Nothing is returned on
    /// failure, so a caller that writes only on `Ok` never emits partial output.
    pub fn process(
        &self,
        source: &DynamicImage,
        rows: &[AnnotationRow],
    ) -> Result<PipelineOutput, PipelineError> {
        let mut output = PipelineOutput::default();

        for row in rows {
            let classified =
                classify_region(&self.recognizer, &row.region_type, || crop_region(source, &row.shape));

            match classified {
                Ok(Some(content)) => {
                    tracing::debug!(row = row.row, label = %row.label, region_type = %row.region_type, %content, "Region extracted");
                    output.records.push(OutputRecord::new(row.label.clone(), content));
                }
                Ok(None) => {
                    tracing::debug!(row = row.row, label = %row.label, "Image region skipped");
                }
                Err(ClassifyError::Region(err)) => match self.policy {
                    RowErrorPolicy::Fail => {
                        return Err(PipelineError::Region {
                            row: row.row,
                            label: row.label.clone(),
                            source: err,
                        })
                    }
                    RowErrorPolicy::Skip => {
                        tracing::warn!(row = row.row, label = %row.label, "Skipping row: {err}");
                        output.skipped += 1;
                    }
                },
                Err(ClassifyError::Ocr(err)) => {
                    return Err(PipelineError::Ocr {
                        row: row.row,
                        label: row.label.clone(),
                        source: err,
                    })
                }
            }
        }

        tracing::info!(
            rows = rows.len(),
            records = output.records.len(),
            skipped = output.skipped,
            "Regions processed"
        );
        Ok(output)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
