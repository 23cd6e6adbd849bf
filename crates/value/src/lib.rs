//! Host value model for the script boundary.
//!
//! Values carry their own runtime type. Named types form a lattice of classes
//! and interfaces held by a [`TypeCatalog`]; converters are registered
//! against those names and values are matched through their capability sets.

mod catalog;
mod error;
mod types;
mod value;

pub use catalog::{TypeCatalog, TypeCatalogBuilder};
pub use error::CatalogError;
pub use types::{ScalarKind, TypeDescriptor, TypeId};
pub use value::{HostObject, HostValue, Mapping, Sequence, Value};
