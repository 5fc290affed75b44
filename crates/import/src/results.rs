use formscan_core::OutputRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const OUTPUT_HEADER: [&str; 2] = ["Label", "Content"];

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("Failed to create output next to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize records as a `Label,Content` table, in the order given.
pub fn write_results_to<W: Write>(data: W, records: &[OutputRecord]) -> Result<(), ResultsError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(data);

    // Written by hand so an empty run still produces the header.
    writer.write_record(OUTPUT_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the table to `path`, replacing any existing file. The table goes to a
/// temporary sibling first and is renamed into place only once complete.
pub fn write_results(path: &Path, records: &[OutputRecord]) -> Result<(), ResultsError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| ResultsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    write_results_to(tmp.as_file_mut(), records)?;

    tmp.persist(path).map_err(|e| ResultsError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "Results written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formscan_core::Content;

    fn render(records: &[OutputRecord]) -> String {
        let mut buf = Vec::new();
        write_results_to(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let records = vec![
            OutputRecord::new("Name", Content::Text("Alice".into())),
            OutputRecord::new("Agree", Content::Checkbox(true)),
            OutputRecord::new("Opt-out", Content::Checkbox(false)),
            OutputRecord::new("Phone", Content::NoTextDetected),
            OutputRecord::new("Seal", Content::UnrecognizedRegionType),
        ];
        assert_eq!(
            render(&records),
            "Label,Content\n\
             Name,Alice\n\
             Agree,yes\n\
             Opt-out,no\n\
             Phone,no text detected\n\
             Seal,unrecognized region type\n"
        );
    }

    #[test]
    fn empty_run_writes_header_only() {
        assert_eq!(render(&[]), "Label,Content\n");
    }

    #[test]
    fn duplicate_labels_are_kept() {
        let records = vec![
            OutputRecord::new("Name", Content::Text("A".into())),
            OutputRecord::new("Name", Content::Text("B".into())),
        ];
        assert_eq!(render(&records), "Label,Content\nName,A\nName,B\n");
    }

    #[test]
    fn special_characters_are_quoted() {
        let records = vec![
            OutputRecord::new("Address, line 1", Content::Text("12 \"Oak\" St\nApt 4".into())),
        ];
        assert_eq!(
            render(&records),
            "Label,Content\n\"Address, line 1\",\"12 \"\"Oak\"\" St\nApt 4\"\n"
        );
    }

    #[test]
    fn write_results_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale content that is much longer than the new table\n").unwrap();

        write_results(&path, &[OutputRecord::new("Name", Content::Text("Alice".into()))]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Label,Content\nName,Alice\n");
        // No temporary files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_results_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.csv");
        let err = write_results(&path, &[]).unwrap_err();
        assert!(matches!(err, ResultsError::Io { .. }));
        assert!(!path.exists());
    }
}
