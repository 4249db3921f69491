//! Fitting a shadow projection to the importance volumes.
//!
//! Pipeline per shadow slice:
//!
//! ```text
//!  camera frustum ─┐
//!                  ├─► clip volumes ─► corners ─► shadow-space bounds ─► adjustment
//!  volume boxes  ──┘                          └─► farthest corner ──► shadow distance
//! ```

mod fit;
mod projection;
mod slice;

pub use fit::{ShadowFit, adjustment_matrix, compute_fit, local_bounds, shadow_distance};
pub use projection::{clamp_far, near_far, texel_snap};
pub use slice::{CameraData, ShadowSlice};
