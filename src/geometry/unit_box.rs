//! Unit cube topology shared by every importance volume.
//!
//! Corners are numbered by their bit pattern: bit 0 = x, bit 1 = y,
//! bit 2 = z, so corner `i` sits at `((i>>0)&1, (i>>1)&1, (i>>2)&1) - 0.5`.
//!
//! Faces (polygon ids):
//! ```text
//!   0 = -z (bottom)   3 = +z (top)
//!   1 = -y            4 = +y
//!   2 = +x            5 = -x
//! ```

use glam::{Mat4, Vec3};

pub const BOX_CORNERS: usize = 8;
pub const BOX_FACES: usize = 6;

/// `(corner_a, corner_b, polygon_left, polygon_right)` for the 12 cube edges.
///
/// Walking from `corner_a` to `corner_b`, `polygon_left` is on one side and
/// `polygon_right` on the other; every face is bounded by exactly four edges.
pub const BOX_EDGES: [(u16, u16, u16, u16); 12] = [
    // bottom ring
    (0, 1, 0, 1),
    (1, 3, 0, 2),
    (3, 2, 0, 4),
    (2, 0, 0, 5),
    // top ring
    (4, 6, 3, 5),
    (6, 7, 3, 4),
    (7, 5, 3, 2),
    (5, 4, 3, 1),
    // verticals
    (0, 4, 1, 5),
    (1, 5, 2, 1),
    (3, 7, 4, 2),
    (2, 6, 5, 4),
];

/// The 8 corners of the unit cube `[-0.5, 0.5]^3` mapped through `transform`.
pub fn unit_box_corners(transform: Mat4) -> [Vec3; BOX_CORNERS] {
    std::array::from_fn(|i| {
        let local = Vec3::new(
            ((i >> 0) & 1) as f32,
            ((i >> 1) & 1) as f32,
            ((i >> 2) & 1) as f32,
        ) - Vec3::splat(0.5);
        mul_point3x4(transform, local)
    })
}

/// Affine point transform: uses the upper 3x4 block and ignores `w`.
#[inline(always)]
pub fn mul_point3x4(m: Mat4, p: Vec3) -> Vec3 {
    m.x_axis.truncate() * p.x + m.y_axis.truncate() * p.y + m.z_axis.truncate() * p.z
        + m.w_axis.truncate()
}

/// Full projective transform with the perspective divide.
#[inline]
pub fn mul_point(m: Mat4, p: Vec3) -> Vec3 {
    let h = m * p.extend(1.0);
    if h.w.abs() > f32::EPSILON {
        h.truncate() / h.w
    } else {
        h.truncate()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
