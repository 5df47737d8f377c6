use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown entity type: {0:?} (expected organization, person or deal)")]
    UnknownEntity(String),
    #[error("invalid mapping spec {0:?} (expected SOURCE=ENTITY:TARGET)")]
    InvalidMappingSpec(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
