use thiserror::Error;

use crate::TypeId;

/// Errors raised while declaring host types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
	#[error("type name must not be empty")]
	EmptyName,
	#[error("type {0:?} is already declared")]
	DuplicateName(String),
	#[error("unknown type id {}", .0.as_u32())]
	UnknownType(TypeId),
	#[error("type {0:?} is not an interface")]
	NotAnInterface(String),
	#[error("type {0:?} is not a class")]
	NotAClass(String),
}
