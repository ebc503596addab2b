use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// defines behaviors and tolerances for a pipeline run. loadable from
/// `.toml` or `.json`; every field has a default matching the Berlin
/// production run.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct PipelineConfiguration {
    /// projected metric CRS of all inputs (EPSG code, informational)
    pub crs: u32,
    /// node search tolerance at edge endpoints in meters
    pub node_tolerance: f64,
    /// maximum BFS depth when chasing unresolved endpoints through the graph
    pub bfs_max_depth: usize,
    /// buffer around the priority network when stitching detail geometry
    pub stitch_buffer: f64,
    /// minimum fraction of a way inside the match buffer
    pub match_fraction: f64,
    pub buffer_bikelanes: f64,
    pub buffer_streets: f64,
    pub buffer_paths: f64,
    pub orthogonal_filter: OrthogonalFilterConfiguration,
    /// buffer radius for the overlap-avoiding difference steps
    pub difference_buffer: f64,
    /// fraction inside the difference buffer above which a way is dropped
    pub difference_fraction: f64,
    /// target segment length for the directional snapper
    pub segment_length: f64,
    /// candidate search radius of the snapper
    pub snap_buffer: f64,
    /// maximum orientation difference for the oriented candidate set
    pub max_angle_difference: f64,
    /// snapper work-batch size
    pub batch_size: usize,
    /// worker count for the snapper; defaults to available cores minus one
    pub cpu_cores: Option<usize>,
    /// element numbers removed from the stitched network
    pub excluded_element_nrs: Vec<String>,
    /// passthrough columns dropped from the final output
    pub dropped_columns: Vec<String>,
    pub exclude_ways_file: String,
    pub include_ways_file: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct OrthogonalFilterConfiguration {
    pub enabled_bikelanes: bool,
    pub enabled_streets: bool,
    pub enabled_paths: bool,
    /// probe segment length along the merged priority network
    pub probe_length: f64,
    /// only ways shorter than this are candidates for removal
    pub short_way_threshold: f64,
    /// search radius around a short way for probe segments
    pub way_buffer: f64,
    /// orientation difference above which a short way is removed
    pub removal_angle: f64,
    /// probe bearing spread that marks a junction or curve
    pub complex_spread: f64,
    /// probe-to-way difference that protects a way in the complex case
    pub aligned_angle: f64,
}

impl Default for PipelineConfiguration {
    fn default() -> Self {
        Self {
            crs: 25833,
            node_tolerance: 1.0,
            bfs_max_depth: 50,
            stitch_buffer: 5.0,
            match_fraction: 0.7,
            buffer_bikelanes: 25.0,
            buffer_streets: 15.0,
            buffer_paths: 15.0,
            orthogonal_filter: Default::default(),
            difference_buffer: 10.0,
            difference_fraction: 0.8,
            segment_length: 2.5,
            snap_buffer: 25.0,
            max_angle_difference: 50.0,
            batch_size: 250,
            cpu_cores: None,
            excluded_element_nrs: vec![],
            dropped_columns: vec![
                String::from("okstra_id"),
                String::from("existenz"),
                String::from("ist_radvorrangnetz"),
                String::from("elem_nr"),
                String::from("gisid"),
                String::from("gueltig_von"),
                String::from("dnez__sdatenid"),
                String::from("str_bez"),
                String::from("Index"),
                String::from("strassenklasse"),
            ],
            exclude_ways_file: String::from("exclude_ways.txt"),
            include_ways_file: String::from("include_ways.txt"),
        }
    }
}

impl Default for OrthogonalFilterConfiguration {
    fn default() -> Self {
        Self {
            enabled_bikelanes: true,
            enabled_streets: true,
            enabled_paths: true,
            probe_length: 5.0,
            short_way_threshold: 50.0,
            way_buffer: 25.0,
            removal_angle: 50.0,
            complex_spread: 60.0,
            aligned_angle: 20.0,
        }
    }
}

impl PipelineConfiguration {
    /// snapper worker count: configured value, or all cores but one.
    pub fn worker_count(&self) -> usize {
        match self.cpu_cores {
            Some(n) => n.max(1),
            None => std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1),
        }
    }

    pub fn source_buffer(&self, data_source: radnetz_core::model::DataSource) -> f64 {
        use radnetz_core::model::DataSource;
        match data_source {
            DataSource::Bikelanes => self.buffer_bikelanes,
            DataSource::Streets => self.buffer_streets,
            DataSource::Paths => self.buffer_paths,
        }
    }

    pub fn orthogonal_filter_enabled(
        &self,
        data_source: radnetz_core::model::DataSource,
    ) -> bool {
        use radnetz_core::model::DataSource;
        match data_source {
            DataSource::Bikelanes => self.orthogonal_filter.enabled_bikelanes,
            DataSource::Streets => self.orthogonal_filter.enabled_streets,
            DataSource::Paths => self.orthogonal_filter.enabled_paths,
        }
    }
}

impl TryFrom<&String> for PipelineConfiguration {
    type Error = PipelineError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(PipelineError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfiguration::default();
        assert_eq!(config.segment_length, 2.5);
        assert_eq!(config.snap_buffer, 25.0);
        assert_eq!(config.buffer_bikelanes, 25.0);
        assert_eq!(config.buffer_streets, 15.0);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let parsed: PipelineConfiguration =
            toml::from_str("segment_length = 1.0\n[orthogonal_filter]\nremoval_angle = 40.0\n")
                .expect("valid toml");
        assert_eq!(parsed.segment_length, 1.0);
        assert_eq!(parsed.orthogonal_filter.removal_angle, 40.0);
        // untouched fields keep their defaults
        assert_eq!(parsed.snap_buffer, 25.0);
    }
}
