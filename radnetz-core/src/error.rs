use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetzError {
    #[error("unsupported geometry type in {operation}: {geometry}")]
    UnsupportedGeometry { operation: String, geometry: String },
    #[error("{0}")]
    InternalError(String),
}
