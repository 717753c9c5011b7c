//! Annotation data model
//!
//! - [`AntIdentity`] / [`AntKind`]: who a marker is about
//! - [`MarkerRecord`]: a simple or interaction marker on one frame
//! - [`LegacyRecord`]: the pre-version-3 shape, kept only for migration

pub mod ant;
pub mod legacy;
pub mod marker;

pub use ant::{AntIdentity, AntKind};
pub use legacy::{LegacyMarkerType, LegacyRecord};
pub use marker::{Activity, Interaction, InteractionKind, Location, MarkerKind, MarkerRecord};
