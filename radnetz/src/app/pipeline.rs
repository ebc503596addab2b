use crate::algorithm::aggregation::{aggregate_network, District};
use crate::algorithm::matching::{
    apply_manual_interventions, combine_matched, remove_orthogonal_short_ways,
    subtract_by_buffer, ways_in_buffer, ManualLists,
};
use crate::algorithm::merging::merge_segments;
use crate::algorithm::snapping::snap_network;
use crate::algorithm::stitching::stitch_detail_network;
use crate::algorithm::topology::assign_element_numbers;
use crate::app::clipping;
use crate::config::PipelineConfiguration;
use crate::error::PipelineError;
use crate::io::{audit, dataset, lists, CandidateLogger, OutputLayout};
use geo::MultiPolygon;
use itertools::Itertools;
use radnetz_core::geometry::{buffer_network, CapStyle};
use radnetz_core::model::{
    AttributedEdge, DataSource, DetailEdge, Direction, EnrichedEdge, NetworkNode, PriorityEdge,
    SnappedSegment,
};
use radnetz_osm::model::{TildaWay, TranslatedWay};
use radnetz_osm::translate::translate_collection;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

mod inputs {
    pub const PRIORITY_NETWORK: &str = "radvorrangsnetz.json.gz";
    pub const DETAIL_NETWORK: &str = "detailnetz.json.gz";
    pub const NODES: &str = "verbindungspunkte.json.gz";
    pub const DISTRICTS: &str = "bezirke.json.gz";

    pub fn tilda(source: radnetz_core::model::DataSource) -> String {
        format!("tilda_{}.json.gz", source)
    }
}

/// explicit path overrides for the snap subcommand
#[derive(Debug, Default, Clone)]
pub struct SnapOverrides {
    pub net: Option<PathBuf>,
    pub osm: Option<PathBuf>,
    pub out: Option<PathBuf>,
}

/// sequential stage driver with on-disk caching of every intermediate.
/// existence of a stage's cache file short-circuits the stage; deleting the
/// file forces a re-run.
pub struct Pipeline {
    config: PipelineConfiguration,
    data_dir: PathBuf,
    layout: OutputLayout,
    clip_neukoelln: bool,
    log_candidates: bool,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfiguration,
        data_dir: &Path,
        output_dir: &Path,
        clip_neukoelln: bool,
        log_candidates: bool,
    ) -> Pipeline {
        Pipeline {
            config,
            data_dir: data_dir.to_path_buf(),
            layout: OutputLayout::new(output_dir),
            clip_neukoelln,
            log_candidates,
        }
    }

    pub fn run(&self) -> Result<(), PipelineError> {
        self.stage("translate", Self::run_translation)?;
        self.stage("match", Self::run_matching)?;
        self.stage("enrich-network", Self::run_network_enrichment)?;
        self.stage("snap", |p| p.run_snapping(&SnapOverrides::default()))?;
        self.stage("aggregate", Self::run_aggregation)?;
        log::info!("pipeline finished");
        Ok(())
    }

    fn stage(
        &self,
        name: &str,
        run: impl Fn(&Self) -> Result<(), PipelineError>,
    ) -> Result<(), PipelineError> {
        log::info!("stage '{}' starting", name);
        match run(self) {
            Ok(()) => {
                log::info!("stage '{}' finished", name);
                Ok(())
            }
            Err(e) => {
                log::error!("pipeline failed in stage '{}'", name);
                Err(e)
            }
        }
    }

    fn input(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    // ---------------------------------------------------------- stage C2 --
    pub fn run_translation(&self) -> Result<(), PipelineError> {
        for source in [DataSource::Bikelanes, DataSource::Streets, DataSource::Paths] {
            let target = self.layout.translated(source);
            if target.exists() {
                log::info!("translation for {} cached, skipping", source);
                continue;
            }
            let input_path = self.input(&inputs::tilda(source));
            if !input_path.exists() {
                log::warn!("input file not found: {}, skipping", input_path.display());
                continue;
            }
            let ways: Vec<TildaWay> = dataset::read_dataset(&input_path)?;
            log::info!("translating {} {} ways", ways.len(), source);
            let translated = translate_collection(&ways, source);
            dataset::write_dataset(&target, &translated)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------- stage C5 --
    pub fn run_matching(&self) -> Result<(), PipelineError> {
        if self.layout.matched_combined().exists() {
            log::info!("matched dataset cached, skipping");
            return Ok(());
        }
        let priority: Vec<PriorityEdge> =
            dataset::read_dataset(&self.input(inputs::PRIORITY_NETWORK))?;
        let manual = ManualLists::load(
            &self.input(&self.config.exclude_ways_file),
            &self.input(&self.config.include_ways_file),
        );

        let mut matched_by_source: Vec<(DataSource, Vec<TranslatedWay>)> = Vec::new();
        for source in [DataSource::Bikelanes, DataSource::Streets, DataSource::Paths] {
            let matched_path = self.layout.matched(source);
            let matched = if matched_path.exists() {
                log::info!("matched {} cached, skipping", source);
                dataset::read_dataset(&matched_path)?
            } else {
                let ways: Vec<TranslatedWay> =
                    dataset::read_dataset(&self.layout.translated(source))?;

                // step 1 is the expensive part and caches independently
                let in_buffer_path = self.layout.matched_in_buffer(source);
                let step1: Vec<TranslatedWay> = if in_buffer_path.exists() {
                    log::info!("buffer containment for {} cached, skipping", source);
                    dataset::read_dataset(&in_buffer_path)?
                } else {
                    let buffer =
                        self.unified_buffer(&priority, self.config.source_buffer(source))?;
                    let step1 =
                        ways_in_buffer(&ways, &buffer, self.config.match_fraction, source);
                    dataset::write_dataset(&in_buffer_path, &step1)?;
                    step1
                };

                let filtered = if self.config.orthogonal_filter_enabled(source) {
                    remove_orthogonal_short_ways(
                        step1,
                        &priority,
                        source,
                        &self.config.orthogonal_filter,
                    )
                } else {
                    log::info!("{}: orthogonal filter skipped", source);
                    step1
                };

                let (matched, manual_audit) =
                    apply_manual_interventions(filtered, &ways, &manual);
                if !manual_audit.is_empty() {
                    audit::write_manual_audit(
                        &self.layout.manual_audit(source),
                        &manual_audit.iter().collect_vec(),
                    )?;
                }
                let ids: BTreeSet<i64> = matched.iter().map(|w| w.osm_id).collect();
                lists::write_way_ids(&self.layout.matched_way_ids(source), &ids).map_err(
                    |e| {
                        PipelineError::DatasetWriteError(
                            self.layout.matched_way_ids(source).display().to_string(),
                            e.to_string(),
                        )
                    },
                )?;
                dataset::write_dataset(&matched_path, &matched)?;
                matched
            };
            matched_by_source.push((source, matched));
        }

        let bikelanes = matched_by_source.remove(0).1;
        let streets = matched_by_source.remove(0).1;
        let paths = matched_by_source.remove(0).1;

        let streets_without_bikelanes = subtract_by_buffer(
            streets,
            &bikelanes,
            self.config.difference_buffer,
            self.config.difference_fraction,
        );
        dataset::write_dataset(
            &self.layout.streets_without_bikelanes(),
            &streets_without_bikelanes,
        )?;

        let streets_and_bikelanes: Vec<TranslatedWay> = bikelanes
            .iter()
            .chain(streets_without_bikelanes.iter())
            .cloned()
            .collect();
        let paths_without_rest = subtract_by_buffer(
            paths,
            &streets_and_bikelanes,
            self.config.difference_buffer,
            self.config.difference_fraction,
        );
        dataset::write_dataset(
            &self.layout.paths_without_streets_and_bikelanes(),
            &paths_without_rest,
        )?;

        let combined =
            combine_matched(vec![bikelanes, streets_without_bikelanes, paths_without_rest]);
        dataset::write_dataset(&self.layout.matched_combined(), &combined)?;
        Ok(())
    }

    /// union buffer around the priority network, cached on disk keyed by
    /// radius and cap style
    fn unified_buffer(
        &self,
        priority: &[PriorityEdge],
        radius: f64,
    ) -> Result<MultiPolygon<f64>, PipelineError> {
        let cap_style = CapStyle::Flat;
        let cache_path = self.layout.buffer_cache(radius, cap_style);
        if cache_path.exists() {
            log::info!("loading cached {}m buffer", radius);
            let cached: Vec<MultiPolygon<f64>> = dataset::read_dataset(&cache_path)?;
            if let Some(buffer) = cached.into_iter().next() {
                return Ok(buffer);
            }
        }
        log::info!("building {}m union buffer around the priority network", radius);
        let buffer = buffer_network(priority.iter().map(|e| &e.geometry), radius, cap_style);
        dataset::write_dataset(&cache_path, std::slice::from_ref(&buffer))?;
        Ok(buffer)
    }

    // ----------------------------------------------------- stages C3 + C4 --
    pub fn run_network_enrichment(&self) -> Result<(), PipelineError> {
        let rvn_path = self.layout.rvn_with_element_nr();
        let with_ids: Vec<PriorityEdge> = if rvn_path.exists() {
            log::info!("element_nr assignment cached, skipping");
            dataset::read_dataset(&rvn_path)?
        } else {
            let priority: Vec<PriorityEdge> =
                dataset::read_dataset(&self.input(inputs::PRIORITY_NETWORK))?;
            let nodes: Vec<NetworkNode> = dataset::read_dataset(&self.input(inputs::NODES))?;
            let assigned = assign_element_numbers(&priority, &nodes, &self.config);
            dataset::write_dataset(&rvn_path, &assigned)?;
            assigned
        };

        let enriched_path = self.layout.enriched_network();
        if enriched_path.exists() {
            log::info!("enriched network cached, skipping");
            return Ok(());
        }
        let detail: Vec<DetailEdge> =
            dataset::read_dataset(&self.input(inputs::DETAIL_NETWORK))?;
        let enriched = stitch_detail_network(&with_ids, &detail, &self.config);
        dataset::write_dataset(&enriched_path, &enriched)?;
        Ok(())
    }

    // ----------------------------------------------------- stages C6 + C7 --
    pub fn run_snapping(&self, overrides: &SnapOverrides) -> Result<(), PipelineError> {
        let attributed_path = self.layout.attributed_edges();
        if attributed_path.exists() {
            log::info!("attributed edges cached, skipping");
            return Ok(());
        }

        let net_path = overrides
            .net
            .clone()
            .unwrap_or_else(|| self.layout.enriched_network());
        let osm_path = overrides
            .osm
            .clone()
            .unwrap_or_else(|| self.layout.matched_combined());
        let mut enriched: Vec<EnrichedEdge> = dataset::read_dataset(&net_path)?;
        let mut matched: Vec<TranslatedWay> = dataset::read_dataset(&osm_path)?;

        if enriched.iter().any(|e| e.element_nr.trim().is_empty()) {
            return Err(PipelineError::MissingRequiredField(
                String::from("element_nr"),
                net_path.display().to_string(),
            ));
        }

        if self.clip_neukoelln {
            if let Some(boundary) = clipping::load_boundary(&self.data_dir) {
                enriched = clipping::clip_enriched(enriched, &boundary);
                matched = clipping::clip_ways(matched, &boundary);
            }
        }

        let segments_path = overrides
            .out
            .clone()
            .unwrap_or_else(|| self.layout.snapped_segments());
        let segments: Vec<SnappedSegment> = if segments_path.exists() {
            log::info!("snapped segments cached, skipping snapper");
            dataset::read_dataset(&segments_path)?
        } else {
            let mut logger = if self.log_candidates {
                Some(CandidateLogger::create(&self.layout.candidate_log())?)
            } else {
                None
            };
            let segments =
                snap_network(&enriched, &matched, &self.config, logger.as_mut());
            if let Some(logger) = logger {
                logger.finish();
                log::info!(
                    "candidate log written to {}",
                    self.layout.candidate_log().display()
                );
            }
            dataset::write_dataset(&segments_path, &segments)?;
            segments
        };

        let edges = merge_segments(&segments);
        dataset::write_dataset(&attributed_path, &edges)?;
        Ok(())
    }

    // ---------------------------------------------------------- stage C8 --
    pub fn run_aggregation(&self) -> Result<(), PipelineError> {
        let forward_path = self.layout.final_edges(Direction::Forward);
        let reverse_path = self.layout.final_edges(Direction::Reverse);
        if forward_path.exists() && reverse_path.exists() {
            log::info!("final aggregation cached, skipping");
            return Ok(());
        }

        let edges: Vec<AttributedEdge> =
            dataset::read_dataset(&self.layout.attributed_edges())?;

        let districts_path = self.input(inputs::DISTRICTS);
        let districts: Vec<District> = if districts_path.exists() {
            dataset::read_dataset(&districts_path)?
        } else {
            log::warn!(
                "district file not found: {}, skipping district assignment",
                districts_path.display()
            );
            vec![]
        };

        let final_edges = aggregate_network(&edges, &districts, &self.config);
        for direction in Direction::BOTH {
            let rows: Vec<_> = final_edges
                .iter()
                .filter(|e| e.ri == direction)
                .cloned()
                .collect();
            log::info!(
                "{} edges in layer '{}'",
                rows.len(),
                direction.layer_name()
            );
            dataset::write_dataset(&self.layout.final_edges(direction), &rows)?;
        }
        Ok(())
    }
}
