use crate::error::PipelineError;
use csv::QuoteStyle;
use radnetz_osm::model::TranslatedWay;
use std::path::Path;

/// writes the manual-intervention audit file for one data source: every way
/// added or removed through the include/exclude lists, with its action.
pub fn write_manual_audit(path: &Path, ways: &[&TranslatedWay]) -> Result<(), PipelineError> {
    let to_err = |e: String| PipelineError::DatasetWriteError(path.display().to_string(), e);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| to_err(e.to_string()))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_path(path)
        .map_err(|e| to_err(e.to_string()))?;

    writer
        .write_record(["osm_id", "data_source", "manual_action"])
        .map_err(|e| to_err(e.to_string()))?;
    for way in ways {
        let action = way
            .manual_action
            .map(|a| a.to_string())
            .unwrap_or_default();
        writer
            .write_record([
                way.osm_id.to_string(),
                way.data_source.to_string(),
                action,
            ])
            .map_err(|e| to_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| to_err(e.to_string()))?;
    Ok(())
}
