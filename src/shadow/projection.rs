use glam::{Mat4, Vec3};

use crate::geometry::mul_point;

/// Depth range encoded in a GL projection, `(near, far)`.
///
/// Handles both perspective and orthographic matrices; `m22`/`m23` are the
/// third row's depth scale and offset.
pub fn near_far(proj: &Mat4) -> (f32, f32) {
    let m22 = proj.z_axis.z;
    let m23 = proj.w_axis.z;
    if is_perspective(proj) {
        (m23 / (m22 - 1.0), m23 / (m22 + 1.0))
    } else {
        ((m23 + 1.0) / m22, (m23 - 1.0) / m22)
    }
}

/// Pull the far plane of `proj` in to `max_far`; never pushes it out.
pub fn clamp_far(proj: Mat4, max_far: f32) -> Mat4 {
    let (near, far) = near_far(&proj);
    if far <= max_far || max_far <= near {
        return proj;
    }
    let far = max_far;
    let mut out = proj;
    if is_perspective(&proj) {
        out.z_axis.z = -(far + near) / (far - near);
        out.w_axis.z = -(2.0 * far * near) / (far - near);
    } else {
        out.z_axis.z = -2.0 / (far - near);
        out.w_axis.z = -(far + near) / (far - near);
    }
    out
}

/// Translation that moves `anchor` onto a texel centre of the shadow map.
///
/// `world_to_shadow` maps into `[-1, 1]`, so one texel is `2 / resolution`;
/// `snap_texels` widens the grid. Only x/y are corrected.
pub fn texel_snap(world_to_shadow: Mat4, anchor: Vec3, resolution: u32, snap_texels: f32) -> Mat4 {
    let half_res = (resolution / 2) as f32 / snap_texels;
    if !(half_res > 0.0) {
        return Mat4::IDENTITY;
    }
    let local = mul_point(world_to_shadow, anchor);
    let correction = (local * half_res).round() / half_res - local;
    Mat4::from_translation(Vec3::new(correction.x, correction.y, 0.0))
}

#[inline]
fn is_perspective(proj: &Mat4) -> bool {
    proj.z_axis.w != 0.0
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
