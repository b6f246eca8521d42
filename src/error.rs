use thiserror::Error;

use crate::Symbol;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlackboardError {
    #[error("blackboard key {key:?} holds a {found}, not a {expected}")]
    TypeMismatch {
        key: Symbol,
        expected: &'static str,
        found: &'static str,
    },
}

pub type BlackboardResult<T> = Result<T, BlackboardError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindError {
    #[error("no action slot named {0:?}")]
    UnknownAction(String),
    #[error("no condition slot named {0:?}")]
    UnknownCondition(String),
}
