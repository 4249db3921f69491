//! Importance volumes and the per-slice hook that consumes them.
//!
//! ▸ [`VolumeRegistry`] owns the active volumes; the renderer passes it in.
//! ▸ [`ShadowImportance`] runs once per shadow slice and rewrites its projection.

mod importance;
mod registry;

pub use importance::{FitReport, ShadowImportance};
pub use registry::{Anchor, BoxTransform, RegistryError, Volume, VolumeFlags, VolumeId, VolumeRegistry};
