#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A workload-type string outside the catalog. Only the string-parse
    /// path can hit this; lookup by enum is total.
    #[error("Unknown workload type: {0}")]
    UnknownWorkloadType(String),

    /// A fatal input-contract violation. Aborts the whole operation with
    /// no partial output.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
