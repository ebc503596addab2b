use radnetz_core::geometry::CapStyle;
use radnetz_core::model::{DataSource, Direction};
use std::path::{Path, PathBuf};

mod filenames {
    pub const TRANSLATED_DIR: &str = "TILDA-translated";
    pub const MATCHED_DIR: &str = "matched";
    pub const MATCHING_DIR: &str = "matching";
    pub const RVN_DIR: &str = "rvn";
    pub const SNAPPING_DIR: &str = "snapping";
    pub const AGGREGATED_DIR: &str = "aggregated";

    pub const RVN_WITH_ELEMENT_NR: &str = "vorrangnetz_with_element_nr.json.gz";
    pub const ENRICHED_NETWORK: &str = "vorrangnetz_details_combined.json.gz";
    pub const MATCHED_COMBINED: &str = "matched_tilda_ways.json.gz";
    pub const STREETS_WITHOUT_BIKELANES: &str = "matched_tilda_streets_without_bikelanes.json.gz";
    pub const PATHS_WITHOUT_STREETS_AND_BIKELANES: &str =
        "matched_tilda_paths_without_streets_and_bikelanes.json.gz";
    pub const SNAPPED_SEGMENTS: &str = "snapped_segments.json.gz";
    pub const ATTRIBUTED_EDGES: &str = "network_enriched.json.gz";
    pub const CANDIDATE_LOG: &str = "candidate_log.txt";
}

/// canonical on-disk locations of all pipeline intermediates below the
/// output directory.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> OutputLayout {
        OutputLayout {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn translated(&self, data_source: DataSource) -> PathBuf {
        self.root
            .join(filenames::TRANSLATED_DIR)
            .join(format!("tilda_{}_translated.json.gz", data_source))
    }

    /// cached union buffer around the priority network, keyed by radius
    /// and cap style
    pub fn buffer_cache(&self, radius: f64, cap_style: CapStyle) -> PathBuf {
        self.root.join(filenames::MATCHING_DIR).join(format!(
            "vorrangnetz_buffered_{}m_{}.json.gz",
            radius, cap_style
        ))
    }

    pub fn matched_in_buffer(&self, data_source: DataSource) -> PathBuf {
        self.root
            .join(filenames::MATCHING_DIR)
            .join(format!("osm_{}_in_buffer.json.gz", data_source))
    }

    pub fn matched(&self, data_source: DataSource) -> PathBuf {
        self.root
            .join(filenames::MATCHED_DIR)
            .join(format!("matched_tilda_{}_ways.json.gz", data_source))
    }

    pub fn matched_way_ids(&self, data_source: DataSource) -> PathBuf {
        self.root
            .join(filenames::MATCHED_DIR)
            .join(format!("matched_tilda_{}_way_ids.txt", data_source))
    }

    pub fn manual_audit(&self, data_source: DataSource) -> PathBuf {
        self.root
            .join(filenames::MATCHING_DIR)
            .join(format!("osm_{}_manual_interventions.csv", data_source))
    }

    pub fn streets_without_bikelanes(&self) -> PathBuf {
        self.root
            .join(filenames::MATCHED_DIR)
            .join(filenames::STREETS_WITHOUT_BIKELANES)
    }

    pub fn paths_without_streets_and_bikelanes(&self) -> PathBuf {
        self.root
            .join(filenames::MATCHED_DIR)
            .join(filenames::PATHS_WITHOUT_STREETS_AND_BIKELANES)
    }

    pub fn matched_combined(&self) -> PathBuf {
        self.root
            .join(filenames::MATCHED_DIR)
            .join(filenames::MATCHED_COMBINED)
    }

    pub fn rvn_with_element_nr(&self) -> PathBuf {
        self.root
            .join(filenames::RVN_DIR)
            .join(filenames::RVN_WITH_ELEMENT_NR)
    }

    pub fn enriched_network(&self) -> PathBuf {
        self.root
            .join(filenames::RVN_DIR)
            .join(filenames::ENRICHED_NETWORK)
    }

    pub fn snapped_segments(&self) -> PathBuf {
        self.root
            .join(filenames::SNAPPING_DIR)
            .join(filenames::SNAPPED_SEGMENTS)
    }

    pub fn attributed_edges(&self) -> PathBuf {
        self.root
            .join(filenames::SNAPPING_DIR)
            .join(filenames::ATTRIBUTED_EDGES)
    }

    pub fn candidate_log(&self) -> PathBuf {
        self.root
            .join(filenames::SNAPPING_DIR)
            .join(filenames::CANDIDATE_LOG)
    }

    /// one collection per direction layer in the final output
    pub fn final_edges(&self, direction: Direction) -> PathBuf {
        self.root.join(filenames::AGGREGATED_DIR).join(format!(
            "aggregated_rvn_final_{}.json.gz",
            direction.layer_name()
        ))
    }
}
