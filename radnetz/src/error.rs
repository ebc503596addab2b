use radnetz_core::NetzError;
use radnetz_osm::TildaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing input file {0}")]
    MissingInputFile(String),
    #[error("missing required field '{0}' in {1}")]
    MissingRequiredField(String, String),
    #[error("failure reading dataset {0}: {1}")]
    DatasetReadError(String, String),
    #[error("failure writing dataset {0}: {1}")]
    DatasetWriteError(String, String),
    #[error("invalid pipeline configuration: {0}")]
    ConfigurationError(String),
    #[error(transparent)]
    GeometryError(#[from] NetzError),
    #[error(transparent)]
    TildaError(#[from] TildaError),
    #[error("{0}")]
    InternalError(String),
}
