use anyhow::Context;
use formscan_core::{ExtractConfig, RowErrorPolicy, TesseractConfig};
use formscan_ocr::{FormPipeline, OcrBackend};
use std::path::Path;

use crate::Args;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    /// Rows dropped while loading or cropping under the skip policy.
    pub skipped: usize,
}

/// Config file values, overridden by command-line flags.
pub fn resolve_config(args: &Args) -> anyhow::Result<ExtractConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractConfig::load(path)?,
        None => ExtractConfig::default(),
    };
    if args.skip_invalid_rows {
        config.on_invalid_row = RowErrorPolicy::Skip;
    }
    if let Some(dir) = &args.tessdata {
        config.tesseract.data_path = Some(dir.clone());
    }
    if let Some(lang) = &args.lang {
        config.tesseract.language = lang.clone();
    }
    Ok(config)
}

#[cfg(feature = "tesseract")]
fn ocr_backend(config: &TesseractConfig) -> anyhow::Result<Box<dyn OcrBackend>> {
    tracing::debug!(language = %config.language, data_path = ?config.data_path, "Using Tesseract");
    let recognizer = formscan_ocr::TesseractRecognizer::from_config(config)
        .context("Failed to initialize Tesseract")?;
    Ok(Box::new(recognizer))
}

#[cfg(not(feature = "tesseract"))]
fn ocr_backend(_config: &TesseractConfig) -> anyhow::Result<Box<dyn OcrBackend>> {
    Err(formscan_ocr::OcrError::NotAvailable.into())
}

pub fn extract(args: &Args) -> anyhow::Result<RunSummary> {
    let config = resolve_config(args)?;
    let backend = ocr_backend(&config.tesseract)?;
    run(
        backend,
        config.on_invalid_row,
        &args.image,
        &args.annotations,
        &args.output,
    )
}

/// Load both inputs, process every row, then write the table. The output
/// file is only touched once every row has been processed.
pub fn run<R: OcrBackend>(
    recognizer: R,
    policy: RowErrorPolicy,
    image_path: &Path,
    annotations_path: &Path,
    output_path: &Path,
) -> anyhow::Result<RunSummary> {
    let annotations = formscan_import::load_annotations(annotations_path, policy)
        .with_context(|| format!("Failed to load annotations from {}", annotations_path.display()))?;
    let source = formscan_ocr::load_image(image_path)?;
    tracing::info!(
        rows = annotations.rows.len(),
        width = source.width(),
        height = source.height(),
        "Inputs loaded"
    );

    let pipeline = FormPipeline::new(recognizer, policy);
    let output = pipeline
        .process(&source, &annotations.rows)
        .context("Failed to extract regions")?;

    formscan_import::write_results(output_path, &output.records)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Ok(RunSummary {
        records: output.records.len(),
        skipped: annotations.skipped + output.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use formscan_ocr::MockRecognizer;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use std::path::PathBuf;

    const HEADER: &str = "filename,region_shape_attributes,region_attributes\n";

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(annotation_rows: &[(&str, &str)]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let img: GrayImage = ImageBuffer::from_fn(200, 100, |_, _| Luma([255u8]));
            DynamicImage::ImageLuma8(img).save(dir.path().join("form.png")).unwrap();

            let quote = |s: &str| format!("\"{}\"", s.replace('"', "\"\""));
            let mut csv = HEADER.to_string();
            for (shape, attrs) in annotation_rows {
                csv.push_str(&format!("form.png,{},{}\n", quote(shape), quote(attrs)));
            }
            std::fs::write(dir.path().join("annotations.csv"), csv).unwrap();
            Self { dir }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn run(&self, recognizer: MockRecognizer, policy: RowErrorPolicy) -> anyhow::Result<RunSummary> {
            run(
                recognizer,
                policy,
                &self.path("form.png"),
                &self.path("annotations.csv"),
                &self.path("out.csv"),
            )
        }

        fn output(&self) -> String {
            std::fs::read_to_string(self.path("out.csv")).unwrap()
        }
    }

    const NAME_SHAPE: &str = r#"{"name":"rect","x":0,"y":0,"width":100,"height":30}"#;
    const BOX_SHAPE: &str = r#"{"name":"rect","x":120,"y":10,"width":20,"height":20}"#;
    const OUTSIDE: &str = r#"{"name":"rect","x":190,"y":90,"width":50,"height":50}"#;

    #[test]
    fn text_region_end_to_end() {
        let fx = Fixture::new(&[(NAME_SHAPE, r#"{"type":"text","label":"Name"}"#)]);
        let summary = fx.run(MockRecognizer::new("Alice\n"), RowErrorPolicy::Fail).unwrap();
        assert_eq!(summary, RunSummary { records: 1, skipped: 0 });
        assert_eq!(fx.output(), "Label,Content\nName,Alice\n");
    }

    #[test]
    fn mixed_regions_end_to_end() {
        let fx = Fixture::new(&[
            (NAME_SHAPE, r#"{"type":"text","label":"Name"}"#),
            (BOX_SHAPE, r#"{"type":"checkbox","label":"Agree"}"#),
            (NAME_SHAPE, r#"{"type":"image","label":"Photo"}"#),
            (NAME_SHAPE, r#"{"type":"stamp","label":"Seal"}"#),
            (NAME_SHAPE, r#"{"type":"num","label":"Age"}"#),
        ]);
        let recognizer = MockRecognizer::new("  \n").with_single_char("X");
        let summary = fx.run(recognizer, RowErrorPolicy::Fail).unwrap();
        assert_eq!(summary.records, 4);
        assert_eq!(
            fx.output(),
            "Label,Content\n\
             Name,no text detected\n\
             Agree,yes\n\
             Seal,unrecognized region type\n\
             Age,no text detected\n"
        );
    }

    #[test]
    fn unchecked_box_is_no() {
        let fx = Fixture::new(&[(BOX_SHAPE, r#"{"type":"checkbox","label":"Agree"}"#)]);
        fx.run(MockRecognizer::new("").with_single_char(""), RowErrorPolicy::Fail).unwrap();
        assert_eq!(fx.output(), "Label,Content\nAgree,no\n");
    }

    #[test]
    fn failure_leaves_no_output_file() {
        let fx = Fixture::new(&[
            (NAME_SHAPE, r#"{"type":"text","label":"Name"}"#),
            (OUTSIDE, r#"{"type":"text","label":"Overflow"}"#),
        ]);
        let err = fx.run(MockRecognizer::new("Alice"), RowErrorPolicy::Fail).unwrap_err();
        assert!(format!("{err:#}").contains("Overflow"));
        assert!(!fx.path("out.csv").exists());
    }

    #[test]
    fn failure_keeps_previous_output_intact() {
        let fx = Fixture::new(&[("not json", r#"{"type":"text","label":"Name"}"#)]);
        std::fs::write(fx.path("out.csv"), "previous\n").unwrap();
        assert!(fx.run(MockRecognizer::new("Alice"), RowErrorPolicy::Fail).is_err());
        assert_eq!(fx.output(), "previous\n");
    }

    #[test]
    fn skip_policy_counts_load_and_crop_skips() {
        let fx = Fixture::new(&[
            ("not json", r#"{"type":"text","label":"Broken"}"#),
            (OUTSIDE, r#"{"type":"text","label":"Overflow"}"#),
            (NAME_SHAPE, r#"{"type":"text","label":"Name"}"#),
        ]);
        let summary = fx.run(MockRecognizer::new("Alice"), RowErrorPolicy::Skip).unwrap();
        assert_eq!(summary, RunSummary { records: 1, skipped: 2 });
        assert_eq!(fx.output(), "Label,Content\nName,Alice\n");
    }

    #[test]
    fn missing_image_is_fatal() {
        let fx = Fixture::new(&[(NAME_SHAPE, r#"{"type":"text","label":"Name"}"#)]);
        std::fs::remove_file(fx.path("form.png")).unwrap();
        let err = fx.run(MockRecognizer::new("Alice"), RowErrorPolicy::Fail).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<formscan_ocr::PreprocessError>(),
            Some(formscan_ocr::PreprocessError::Load { .. })
        ));
        assert!(format!("{err:#}").contains("form.png"));
        assert!(!fx.path("out.csv").exists());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("formscan.toml");
        std::fs::write(&cfg, "[tesseract]\nlanguage = \"fra\"\ndata_path = \"/td\"\n").unwrap();
        let cfg_arg = cfg.to_string_lossy().into_owned();

        let args = Args::parse_from(["formscan", "a.png", "b.csv", "c.csv", "--config", &cfg_arg]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.tesseract.language, "fra");
        assert_eq!(config.on_invalid_row, RowErrorPolicy::Fail);

        let args = Args::parse_from([
            "formscan", "a.png", "b.csv", "c.csv", "--config", &cfg_arg,
            "--lang", "deu", "--skip-invalid-rows",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.tesseract.language, "deu");
        assert_eq!(config.tesseract.data_path.as_deref(), Some("/td"));
        assert_eq!(config.on_invalid_row, RowErrorPolicy::Skip);
    }

    #[cfg(not(feature = "tesseract"))]
    #[test]
    fn extract_without_engine_is_not_available() {
        let args = Args::parse_from(["formscan", "a.png", "b.csv", "c.csv"]);
        let err = extract(&args).unwrap_err();
        assert!(err.to_string().contains("Tesseract not available"));
    }
}
