use glam::Mat4;
use log::debug;

use super::registry::{VolumeFlags, VolumeId, VolumeRegistry};
use crate::{
    config::FitConfig,
    geometry::frustum_planes,
    shadow::{CameraData, ShadowSlice, clamp_far, compute_fit, texel_snap},
};

/// What [`ShadowImportance::adjust`] did to one slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitReport {
    pub nearest: Option<VolumeId>,
    pub point_count: usize,
    pub adjusted: bool,
    pub quantized: bool,
}

/// Per-light hook that tightens shadow slices around the registered volumes.
pub struct ShadowImportance {
    pub enabled: bool,
    pub config: FitConfig,
    boxes: Vec<Mat4>,
}

impl Default for ShadowImportance {
    fn default() -> Self {
        Self::new(FitConfig::default())
    }
}

impl ShadowImportance {
    pub fn new(config: FitConfig) -> Self {
        Self {
            enabled: true,
            config,
            boxes: Vec::new(),
        }
    }

    /// Rewrite `slice.projection` and `shadow_distance` for this frame.
    ///
    /// The nearest volume's flags decide what happens; when it asks for
    /// adjustment every registered volume contributes its visible corners.
    pub fn adjust(
        &mut self,
        volumes: &VolumeRegistry,
        camera: &CameraData,
        slice: &mut ShadowSlice,
        shadow_distance: &mut f32,
    ) -> FitReport {
        let mut report = FitReport::default();
        if !self.enabled || volumes.is_empty() {
            return report;
        }

        *shadow_distance = shadow_distance.min(self.config.maximum_distance);

        let Some(nearest) = volumes.nearest(camera.position) else {
            return report;
        };
        report.nearest = Some(nearest.id);

        if nearest.flags.contains(VolumeFlags::SHADOW_ADJUSTMENT) {
            let view_proj = clamp_far(camera.projection, *shadow_distance) * camera.view;
            let planes = frustum_planes(view_proj);
            volumes.fill_box_transforms(&mut self.boxes);

            if let Some(fit) = compute_fit(
                camera.position,
                slice.world_to_shadow(),
                &self.boxes,
                &planes,
                &self.config,
            ) {
                slice.projection = fit.adjustment * slice.projection;
                *shadow_distance = shadow_distance.min(fit.shadow_distance);
                report.point_count = fit.point_count;
                report.adjusted = true;
            }
        }

        if nearest.flags.contains(VolumeFlags::QUANTIZE_MOVEMENT) {
            let snap = texel_snap(
                slice.world_to_shadow(),
                nearest.anchor,
                slice.resolution,
                self.config.snap_texels,
            );
            slice.projection = snap * slice.projection;
            report.quantized = true;
        }

        debug!(
            "slice fit: nearest {:?}, {} points, adjusted={}, quantized={}, distance {:.2}",
            report.nearest, report.point_count, report.adjusted, report.quantized, *shadow_distance
        );
        report
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
