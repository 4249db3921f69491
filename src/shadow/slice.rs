use glam::{Mat4, Vec3};

/// What the renderer knows about the viewing camera this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraData {
    /// World-space eye position.
    pub position: Vec3,
    pub view: Mat4,
    /// GL-style projection (`-w <= z <= w`).
    pub projection: Mat4,
}

impl CameraData {
    /// Right-handed look-at camera with a GL perspective projection.
    pub fn perspective(
        position: Vec3,
        target: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            view: Mat4::look_at_rh(position, target, Vec3::Y),
            projection: Mat4::perspective_rh_gl(fov_y, aspect, near, far),
        }
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One light's shadow-casting pass; the fitting rewrites `projection`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSlice {
    pub view: Mat4,
    pub projection: Mat4,
    /// Shadow-map edge length in texels.
    pub resolution: u32,
}

impl ShadowSlice {
    /// World → shadow clip space.
    #[inline]
    pub fn world_to_shadow(&self) -> Mat4 {
        self.projection * self.view
    }
}
