use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaintenanceError {
    #[error("{entity} {id} not found")]
    ReferenceNotFound { entity: &'static str, id: i64 },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MaintenanceError {
    pub fn machine_not_found(id: i64) -> Self {
        Self::ReferenceNotFound {
            entity: "machine",
            id,
        }
    }
}
