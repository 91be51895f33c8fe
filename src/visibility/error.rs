use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisibilityError {
    /// No orbital element data in scope; the report cannot be produced.
    #[error("no orbital element data loaded")]
    EmptyElements,
    /// No track data in scope; the report cannot be produced.
    #[error("no track data loaded")]
    EmptyTracks,
}
