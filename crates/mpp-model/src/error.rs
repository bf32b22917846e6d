use thiserror::Error;

use crate::diagnostic::EntityKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate {kind} identifier {id}")]
    DuplicateIdentifier { kind: EntityKind, id: i64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
