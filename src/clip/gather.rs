use glam::{Mat4, Vec3};
use log::warn;
use rayon::prelude::*;
use smallvec::SmallVec;

use super::{BoxFrustumIntersection, ClipError};
use crate::geometry::{Plane, unit_box_corners};

/// Corners of one clipped box; a clipped cube rarely exceeds 16.
type BoxPoints = SmallVec<[Vec3; 16]>;

/// Clip a single unit box and return the surviving corners.
pub fn clip_box(transform: Mat4, planes: &[Plane], tolerance: f32) -> Result<Vec<Vec3>, ClipError> {
    let mut clip = BoxFrustumIntersection::with_tolerance(tolerance);
    clip.clip(transform, planes).map(<[Vec3]>::to_vec)
}

/// Surviving corners of every box, reusing one scratch intersection.
pub fn gather_points(boxes: &[Mat4], planes: &[Plane], tolerance: f32) -> Vec<Vec3> {
    let mut clip = BoxFrustumIntersection::with_tolerance(tolerance);
    let mut points = Vec::with_capacity(16);
    for &transform in boxes {
        points.extend(clip_or_unclipped(&mut clip, transform, planes));
    }
    points
}

/// [`gather_points`] with one scratch intersection per rayon worker.
/// Output order matches `boxes`.
pub fn par_gather_points(boxes: &[Mat4], planes: &[Plane], tolerance: f32) -> Vec<Vec3> {
    boxes
        .par_iter()
        .map_init(
            || BoxFrustumIntersection::with_tolerance(tolerance),
            |clip, &transform| clip_or_unclipped(clip, transform, planes),
        )
        .flatten_iter()
        .collect()
}

/// A box that overflows the corner pool contributes all 8 corners: a looser
/// fit, never a missing one.
fn clip_or_unclipped(clip: &mut BoxFrustumIntersection, transform: Mat4, planes: &[Plane]) -> BoxPoints {
    let points = match clip.clip(transform, planes) {
        Ok(corners) => SmallVec::from_slice(corners),
        Err(err) => {
            warn!("{err}; box falls back to its unclipped corners");
            SmallVec::from_slice(&unit_box_corners(transform))
        }
    };
    clip.clear();
    points
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
