use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The vessel has no reports at all inside the loaded table.
    #[error("no track reports for vessel {vessel_id}")]
    NoReports { vessel_id: u32 },
}
