//! Version- and edition-conditional script variant registry.
//!
//! Several implementations of one named script may coexist, each tagged with
//! its own version, the span of host versions it applies to, and optionally
//! the deployment edition it targets. Lookups pick the highest-priority
//! variant, optionally filtered by a [`SelectionCondition`].
//!
//! # Modules
//!
//! - [`registry`] - variant storage and selection
//! - [`condition`] - selection predicates
//! - [`params`] - conditions from a resolution parameter map
//! - [`locator`] - `name@sub-registry` resolution
//! - [`edition`] - the running edition and its cached lookup
//! - [`layout`] - registration metadata encoded in script paths
//! - [`bootstrap`] - startup registration from configuration

pub mod bootstrap;
pub mod condition;
pub mod edition;
mod error;
pub mod layout;
mod location;
pub mod locator;
pub mod params;
pub mod registry;
mod variant;

pub use bootstrap::register_manifest;
pub use condition::{CompositeCondition, SelectionCondition};
pub use edition::{CachedEdition, Edition, EditionAuthority, EditionProbe, FixedEdition};
pub use error::{BootstrapError, LayoutError, RegistryError, ResolveError};
pub use layout::RegistrationPath;
pub use location::ScriptLocation;
pub use locator::RegisteredScriptLocator;
pub use params::{Parameters, extract_condition};
pub use registry::ScriptRegistry;
pub use variant::ScriptVariant;
