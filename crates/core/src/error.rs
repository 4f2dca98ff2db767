use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// HTTP mapping lives in `tasca-api`; repositories and services only name
/// the failure class here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referential-integrity violations and forbidden status transitions.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A propagated failure talking to the external board service.
    #[error("External integration failed: {0}")]
    External(String),

    /// Disk I/O failure while writing or reading an image.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
