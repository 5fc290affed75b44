use std::sync::Mutex;
use thiserror::Error;

use crate::preprocess::PreprocessError;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("Failed to prepare region for OCR: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available: build with `tesseract` feature")]
    NotAvailable,
}

/// How the engine should segment the region before recognizing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationMode {
    /// A single uniform block of text.
    Block,
    /// One isolated character.
    SingleChar,
}

impl SegmentationMode {
    /// Tesseract page segmentation mode number.
    pub fn psm(self) -> u8 {
        match self {
            SegmentationMode::Block => 6,
            SegmentationMode::SingleChar => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionParams {
    pub mode: SegmentationMode,
    /// Restrict recognized glyphs to this set.
    pub whitelist: Option<String>,
}

impl RecognitionParams {
    pub fn block() -> Self {
        Self { mode: SegmentationMode::Block, whitelist: None }
    }

    pub fn single_char(whitelist: impl Into<String>) -> Self {
        Self {
            mode: SegmentationMode::SingleChar,
            whitelist: Some(whitelist.into()),
        }
    }

    /// Whitelist value to hand a long-lived engine. Engine variables persist
    /// across requests, so "no restriction" is sent as an empty set.
    pub fn engine_whitelist(&self) -> &str {
        self.whitelist.as_deref().unwrap_or("")
    }
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG-encoded region bytes and return the recognized text.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_png: &[u8], params: &RecognitionParams) -> Result<String, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for &T {
    fn recognize(&self, image_png: &[u8], params: &RecognitionParams) -> Result<String, OcrError> {
        (**self).recognize(image_png, params)
    }
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_png: &[u8], params: &RecognitionParams) -> Result<String, OcrError> {
        (**self).recognize(image_png, params)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns pre-set strings and records every request it receives. Useful for
/// testing the extraction pipeline without requiring Tesseract to be installed.
pub struct MockRecognizer {
    pub text: String,
    /// Reply for [`SegmentationMode::SingleChar`] requests; falls back to `text`.
    pub single_char: Option<String>,
    calls: Mutex<Vec<RecognitionParams>>,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), single_char: None, calls: Mutex::new(Vec::new()) }
    }

    pub fn with_single_char(mut self, text: impl Into<String>) -> Self {
        self.single_char = Some(text.into());
        self
    }

    /// Parameters of every `recognize` call so far, in order.
    pub fn calls(&self) -> Vec<RecognitionParams> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_png: &[u8], params: &RecognitionParams) -> Result<String, OcrError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(params.clone());
        let reply = match (params.mode, &self.single_char) {
            (SegmentationMode::SingleChar, Some(s)) => s,
            _ => &self.text,
        };
        Ok(reply.clone())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError, RecognitionParams};
    use formscan_core::TesseractConfig;
    use leptess::{LepTess, Variable};
    use std::sync::Mutex;

    /// One initialized engine shared by every region of a run.
    pub struct TesseractRecognizer {
        engine: Mutex<LepTess>,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<&str>, lang: &str) -> Result<Self, OcrError> {
            let engine = LepTess::new(data_path, lang).map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(Self { engine: Mutex::new(engine) })
        }

        pub fn from_config(config: &TesseractConfig) -> Result<Self, OcrError> {
            Self::new(config.data_path.as_deref(), &config.language)
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_png: &[u8], params: &RecognitionParams) -> Result<String, OcrError> {
            let mut lt = self.engine.lock().unwrap_or_else(|e| e.into_inner());
            lt.set_variable(Variable::TesseditPagesegMode, &params.mode.psm().to_string())
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_variable(Variable::TesseditCharWhitelist, params.engine_whitelist())
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_png)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
