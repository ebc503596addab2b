use thiserror::Error;

#[derive(Error, Debug)]
pub enum TildaError {
    #[error("way '{0}' is missing required field '{1}'")]
    MissingRequiredField(i64, String),
    #[error("{0}")]
    InternalError(String),
}
