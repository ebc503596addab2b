use crate::error::PipelineError;
use flate2::read::GzDecoder;
use flate2::{write::GzEncoder, Compression};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// typed dataset cache. every intermediate collection is stored as
/// gzip-compressed JSON; existence of the file lets a finished stage be
/// skipped on re-runs.
pub fn read_dataset<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    let file = File::open(path)
        .map_err(|_| PipelineError::MissingInputFile(path.display().to_string()))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    serde_json::from_reader(decoder).map_err(|e| {
        PipelineError::DatasetReadError(path.display().to_string(), e.to_string())
    })
}

/// atomic publish: write to a temp sibling, remove any stale file, rename.
/// caches are never observable half-written.
pub fn write_dataset<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), PipelineError> {
    let to_write_err =
        |e: String| PipelineError::DatasetWriteError(path.display().to_string(), e);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| to_write_err(e.to_string()))?;
    }
    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path).map_err(|e| to_write_err(e.to_string()))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, rows).map_err(|e| to_write_err(e.to_string()))?;
        encoder.finish().map_err(|e| to_write_err(e.to_string()))?;
    }
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| to_write_err(e.to_string()))?;
    }
    std::fs::rename(&tmp_path, path).map_err(|e| to_write_err(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        label: String,
    }

    #[test]
    fn test_round_trip() {
        let dir = std::env::temp_dir().join("radnetz-dataset-test");
        let path = dir.join("rows.json.gz");
        let rows = vec![
            Row {
                id: 1,
                label: String::from("a"),
            },
            Row {
                id: 2,
                label: String::from("b"),
            },
        ];
        write_dataset(&path, &rows).expect("write succeeds");
        let loaded: Vec<Row> = read_dataset(&path).expect("read succeeds");
        assert_eq!(loaded, rows);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_reported() {
        let missing = std::env::temp_dir().join("radnetz-does-not-exist.json.gz");
        let result: Result<Vec<Row>, _> = read_dataset(&missing);
        assert!(matches!(result, Err(PipelineError::MissingInputFile(_))));
    }
}
