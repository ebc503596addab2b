use clap::{Parser, Subcommand};
use radnetz::app::{Pipeline, SnapOverrides};
use radnetz::{PipelineConfiguration, PipelineError};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct RadnetzAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArguments {
    #[arg(long, default_value = "./data", help = "path to the input data directory")]
    data_dir: String,
    #[arg(long, default_value = "./output", help = "output directory for all intermediates")]
    output_dir: String,
    #[arg(long, help = "path to a .toml or .json pipeline configuration file")]
    configuration_file: Option<String>,
    #[arg(long, help = "target EPSG code of the projected inputs")]
    crs: Option<u32>,
}

#[derive(Subcommand)]
pub enum App {
    /// translate the TILDA attribute vocabulary into normalized attributes
    Translate {
        #[command(flatten)]
        common: CommonArguments,
    },
    /// match translated OSM ways onto the priority network
    Match {
        #[command(flatten)]
        common: CommonArguments,
    },
    /// assign element numbers, stitch the detail network and snap
    /// attributes per direction
    Snap {
        #[command(flatten)]
        common: CommonArguments,
        #[arg(long, help = "path to the enriched network dataset")]
        net: Option<String>,
        #[arg(long, help = "path to the matched, translated OSM dataset")]
        osm: Option<String>,
        #[arg(long, help = "output path for the snapped segments")]
        out: Option<String>,
        #[arg(long, help = "candidate search radius in meters")]
        buffer: Option<f64>,
        #[arg(long, help = "clip all inputs to the Neukölln boundary")]
        clip_neukoelln: bool,
        #[arg(long, help = "write the per-segment candidate log (sequential mode)")]
        log_candidates: bool,
        #[arg(long, help = "snapper worker count")]
        cpu_cores: Option<usize>,
    },
    /// aggregate the attributed edges to one edge per element and direction
    Aggregate {
        #[command(flatten)]
        common: CommonArguments,
        #[arg(long, help = "clip all inputs to the Neukölln boundary")]
        clip_neukoelln: bool,
    },
    /// run the whole pipeline
    Run {
        #[command(flatten)]
        common: CommonArguments,
        #[arg(long, help = "clip all inputs to the Neukölln boundary")]
        clip_neukoelln: bool,
        #[arg(long, help = "write the per-segment candidate log (sequential mode)")]
        log_candidates: bool,
    },
}

fn load_configuration(common: &CommonArguments) -> Result<PipelineConfiguration, PipelineError> {
    let mut config = match &common.configuration_file {
        None => PipelineConfiguration::default(),
        Some(f) => {
            log::info!("reading pipeline configuration from {f}");
            PipelineConfiguration::try_from(f)?
        }
    };
    if let Some(crs) = common.crs {
        config.crs = crs;
    }
    Ok(config)
}

fn require_input_dir(data_dir: &str) -> Result<(), PipelineError> {
    if !Path::new(data_dir).is_dir() {
        return Err(PipelineError::MissingInputFile(String::from(data_dir)));
    }
    Ok(())
}

pub fn run(app: &App) -> Result<(), PipelineError> {
    match app {
        App::Translate { common } => {
            require_input_dir(&common.data_dir)?;
            let config = load_configuration(common)?;
            let pipeline = Pipeline::new(
                config,
                Path::new(&common.data_dir),
                Path::new(&common.output_dir),
                false,
                false,
            );
            pipeline.run_translation()
        }
        App::Match { common } => {
            require_input_dir(&common.data_dir)?;
            let config = load_configuration(common)?;
            let pipeline = Pipeline::new(
                config,
                Path::new(&common.data_dir),
                Path::new(&common.output_dir),
                false,
                false,
            );
            pipeline.run_matching()
        }
        App::Snap {
            common,
            net,
            osm,
            out,
            buffer,
            clip_neukoelln,
            log_candidates,
            cpu_cores,
        } => {
            require_input_dir(&common.data_dir)?;
            let mut config = load_configuration(common)?;
            if let Some(buffer) = buffer {
                config.snap_buffer = *buffer;
            }
            if cpu_cores.is_some() {
                config.cpu_cores = *cpu_cores;
            }
            for path in [net, osm].into_iter().flatten() {
                if !Path::new(path).is_file() {
                    return Err(PipelineError::MissingInputFile(path.clone()));
                }
            }
            let pipeline = Pipeline::new(
                config,
                Path::new(&common.data_dir),
                Path::new(&common.output_dir),
                *clip_neukoelln,
                *log_candidates,
            );
            let overrides = SnapOverrides {
                net: net.as_ref().map(PathBuf::from),
                osm: osm.as_ref().map(PathBuf::from),
                out: out.as_ref().map(PathBuf::from),
            };
            pipeline.run_network_enrichment()?;
            pipeline.run_snapping(&overrides)
        }
        App::Aggregate {
            common,
            clip_neukoelln,
        } => {
            require_input_dir(&common.data_dir)?;
            let config = load_configuration(common)?;
            let pipeline = Pipeline::new(
                config,
                Path::new(&common.data_dir),
                Path::new(&common.output_dir),
                *clip_neukoelln,
                false,
            );
            pipeline.run_aggregation()
        }
        App::Run {
            common,
            clip_neukoelln,
            log_candidates,
        } => {
            require_input_dir(&common.data_dir)?;
            let config = load_configuration(common)?;
            let pipeline = Pipeline::new(
                config,
                Path::new(&common.data_dir),
                Path::new(&common.output_dir),
                *clip_neukoelln,
                *log_candidates,
            );
            pipeline.run()
        }
    }
}

fn main() {
    env_logger::init();
    let args = RadnetzAppArguments::parse();
    match run(&args.app) {
        Ok(()) => {}
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
