use glam::{Mat4, Quat, Vec3};
use log::debug;

use crate::{
    clip::{gather_points, par_gather_points},
    config::FitConfig,
    geometry::{Bounds, Plane, min_max, mul_point3x4},
};

/// Result of fitting the shadow projection to the visible volumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowFit {
    /// Pre-multiply onto the slice projection.
    pub adjustment: Mat4,
    /// Distance from the camera to the farthest surviving corner.
    pub shadow_distance: f32,
    /// Shadow clip-space range the adjustment maps to `[-1, 1]`.
    pub bounds: Bounds,
    pub point_count: usize,
}

/// Clip every volume box against `planes` and fit the shadow projection to
/// what survives. `None` when no part of any box is inside the frustum.
pub fn compute_fit(
    camera_position: Vec3,
    world_to_shadow: Mat4,
    boxes: &[Mat4],
    planes: &[Plane],
    config: &FitConfig,
) -> Option<ShadowFit> {
    let points = if boxes.len() >= config.parallel_threshold {
        par_gather_points(boxes, planes, config.clip_tolerance)
    } else {
        gather_points(boxes, planes, config.clip_tolerance)
    };
    debug!("{} volumes -> {} significant points", boxes.len(), points.len());

    let bounds = local_bounds(&points, world_to_shadow, !config.tight_depth)?;
    Some(ShadowFit {
        adjustment: adjustment_matrix(&bounds, config.tight_depth),
        shadow_distance: shadow_distance(camera_position, &points),
        bounds,
        point_count: points.len(),
    })
}

/// Shadow clip-space bounds of `points`, clamped to the clip cube.
///
/// With `full_depth` the depth range stays `[-1, 1]`: casters outside the
/// volumes may still shadow them.
pub fn local_bounds(points: &[Vec3], world_to_shadow: Mat4, full_depth: bool) -> Option<Bounds> {
    let (min, max) = min_max(points.iter().map(|&p| mul_point3x4(world_to_shadow, p)))?;
    let mut min = min.max(Vec3::NEG_ONE);
    let mut max = max.min(Vec3::ONE);
    if full_depth {
        min.z = -1.0;
        max.z = 1.0;
    }
    Some(Bounds::from_min_max(min, max))
}

/// Scale/offset that maps `range` onto `[-1, 1]` on x/y (and z when
/// `tight_z`). Degenerate ranges give the identity.
pub fn adjustment_matrix(range: &Bounds, tight_z: bool) -> Mat4 {
    let size = range.size;
    if size.x <= 0.0 || size.y <= 0.0 || (tight_z && size.z <= 0.0) {
        return Mat4::IDENTITY;
    }

    let mut scale = 2.0 / size;
    let mut offset = -range.center * scale;
    if !tight_z {
        scale.z = 1.0;
        offset.z = 0.0;
    }
    Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, offset)
}

/// Distance from `camera` to the farthest of `points` (0 when empty).
pub fn shadow_distance(camera: Vec3, points: &[Vec3]) -> f32 {
    points
        .iter()
        .map(|p| p.distance_squared(camera))
        .fold(0.0, f32::max)
        .sqrt()
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
