pub mod checkbox;
pub mod classify;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod region;

pub use checkbox::{detect_checkbox, CHECKBOX_WHITELIST};
pub use classify::{classify_region, recognize_text, ClassifyError};
pub use pipeline::{FormPipeline, PipelineError, PipelineOutput};
pub use preprocess::{binarize, encode_as_png, load_image, PreprocessError, BINARIZE_THRESHOLD};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, RecognitionParams, SegmentationMode};
pub use region::{crop_region, RegionError};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
