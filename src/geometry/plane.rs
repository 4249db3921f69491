use glam::{Mat4, Vec3, Vec4};

/// Number of planes bounding a view frustum.
pub const FRUSTUM_PLANES: usize = 6;

/// Half-space `normal · p + distance >= 0`.
///
/// The normal points **into** the kept region, so a positive signed distance
/// means "inside". Frustum planes produced by [`frustum_planes`] follow the
/// same convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Build a plane from a (not necessarily unit) normal and offset.
    /// Both are rescaled so that `normal` has unit length.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let inv_len = 1.0 / normal.length().max(1e-6);
        Self {
            normal: normal * inv_len,
            distance: distance * inv_len,
        }
    }

    /// Plane through `point` keeping the side `normal` points to.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            distance: -n.dot(point),
        }
    }

    /// Interpret `(a, b, c, d)` as `ax + by + cz + d >= 0`.
    #[inline]
    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.truncate(), v.w)
    }

    /// Signed distance from the plane; positive on the kept side.
    #[inline(always)]
    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.distance
    }
}

/// Extract the six inward-facing planes of a clip matrix (`proj * view`).
///
/// Order: left, right, bottom, top, near, far. Expects GL-style depth
/// (`-w <= z <= w`).
pub fn frustum_planes(view_proj: Mat4) -> [Plane; FRUSTUM_PLANES] {
    // glam stores columns; rows are gathered explicitly.
    let m = view_proj;
    let r0 = m.row(0);
    let r1 = m.row(1);
    let r2 = m.row(2);
    let r3 = m.row(3);

    [
        r3 + r0, // left
        r3 - r0, // right
        r3 + r1, // bottom
        r3 - r1, // top
        r3 + r2, // near
        r3 - r2, // far
    ]
    .map(Plane::from_vec4)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalises_normal_and_offset() {
        let p = Plane::new(Vec3::new(0.0, 2.0, 0.0), 4.0);
        assert!((p.normal - Vec3::Y).length() < 1e-6);
        assert!((p.distance - 2.0).abs() < 1e-6);
        assert!((p.distance_to_point(Vec3::new(0.0, 1.0, 0.0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn normal_and_point_keeps_normal_side() {
        let p = Plane::from_normal_and_point(Vec3::X, Vec3::new(2.0, 0.0, 0.0));
        assert!(p.distance_to_point(Vec3::new(3.0, 5.0, -1.0)) > 0.0);
        assert!(p.distance_to_point(Vec3::new(1.0, 5.0, -1.0)) < 0.0);
        assert_eq!(p.distance_to_point(Vec3::new(2.0, -3.0, 7.0)), 0.0);
    }

    #[test]
    fn identity_clip_matrix_gives_unit_cube() {
        let planes = frustum_planes(Mat4::IDENTITY);
        // Every face of [-1,1]^3 sits at distance 1 from the origin.
        for p in &planes {
            assert!((p.distance_to_point(Vec3::ZERO) - 1.0).abs() < 1e-6);
        }
        assert!((planes[0].normal - Vec3::X).length() < 1e-6); // left keeps +x
        assert!((planes[1].normal + Vec3::X).length() < 1e-6); // right keeps -x
        assert!((planes[4].normal - Vec3::Z).length() < 1e-6); // near keeps +z
    }

    #[test]
    fn perspective_planes_contain_view_axis() {
        let proj = Mat4::perspective_rh_gl(60f32.to_radians(), 1.0, 0.5, 50.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let planes = frustum_planes(proj * view);

        let inside = Vec3::new(0.0, 0.0, -10.0);
        let behind = Vec3::new(0.0, 0.0, 1.0);
        let too_far = Vec3::new(0.0, 0.0, -60.0);
        assert!(planes.iter().all(|p| p.distance_to_point(inside) > 0.0));
        assert!(planes[4].distance_to_point(behind) < 0.0);
        assert!(planes[5].distance_to_point(too_far) < 0.0);
        assert!((planes[5].distance_to_point(Vec3::new(0.0, 0.0, -50.0))).abs() < 1e-3);
    }
}
