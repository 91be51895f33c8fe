use thiserror::Error;

#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),
    #[error("propagation failed: {0}")]
    Propagation(String),
}
