//! Box-vs-frustum clipping.
//!
//! An importance volume is a transformed unit cube. Each frame it is cut by
//! the camera frustum and the surviving corners bound the region whose
//! shadows matter. See [`BoxFrustumIntersection`] for the algorithm.

mod corners;
mod gather;
mod intersection;

use thiserror::Error;

pub use corners::{CornerId, CornerPool, MAX_CORNERS};
pub use gather::{clip_box, gather_points, par_gather_points};
pub use intersection::{BoxFrustumIntersection, DEFAULT_CLIP_TOLERANCE, Edge, PolygonId};

/// Things that can go wrong while clipping.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipError {
    /// Every slot of the fixed corner pool is live.
    #[error("corner pool exhausted ({MAX_CORNERS} slots)")]
    CornerCapacity,
}
