use crate::error::PipelineError;
use radnetz_core::model::Direction;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// one candidate row in the human-readable per-segment log
#[derive(Debug, Clone)]
pub struct CandidateLogEntry {
    pub osm_id: i64,
    pub distance: f64,
    pub angle_diff: f64,
    pub compatibility: u8,
    pub priority: i32,
    pub verkehrsri: String,
    pub selected: bool,
}

/// diagnostic writer for the snapper: lists the selected and alternative
/// candidates of every segment, keyed by element_nr and direction. only
/// active in `--log-candidates` mode, which forces sequential snapping.
pub struct CandidateLogger {
    writer: BufWriter<File>,
}

impl CandidateLogger {
    pub fn create(path: &Path) -> Result<CandidateLogger, PipelineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PipelineError::DatasetWriteError(path.display().to_string(), e.to_string())
            })?;
        }
        let file = File::create(path).map_err(|e| {
            PipelineError::DatasetWriteError(path.display().to_string(), e.to_string())
        })?;
        Ok(CandidateLogger {
            writer: BufWriter::new(file),
        })
    }

    pub fn log_segment(
        &mut self,
        element_nr: &str,
        ri: Direction,
        entries: &[CandidateLogEntry],
    ) {
        let _ = writeln!(
            self.writer,
            "segment element_nr={} ri={} ({} candidates)",
            element_nr,
            ri,
            entries.len()
        );
        if entries.is_empty() {
            let _ = writeln!(self.writer, "  -> no candidates, placeholder variant");
            return;
        }
        for entry in entries {
            let marker = if entry.selected { "*" } else { " " };
            let _ = writeln!(
                self.writer,
                "  {} way {:>12}  dist={:7.2}m  angle={:6.1}°  compat={:2}  prio={}  verkehrsri={}",
                marker,
                entry.osm_id,
                entry.distance,
                entry.angle_diff,
                entry.compatibility,
                entry.priority,
                entry.verkehrsri
            );
        }
    }

    pub fn finish(mut self) {
        let _ = self.writer.flush();
    }
}
