//! Active importance volumes.
//!
//! Every volume is one `hecs` entity carrying a [`BoxTransform`], an
//! [`Anchor`] and its [`VolumeFlags`]. Register / deregister are O(1); the
//! per-frame pass only reads.

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use hecs::{Entity, World};
use thiserror::Error;

bitflags! {
    /// Per-volume switches consulted when the volume is the nearest one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VolumeFlags: u8 {
        /// Tighten the shadow projection around the visible volumes.
        const SHADOW_ADJUSTMENT = 0x01;
        /// Snap the projection so the anchor stays on a texel centre.
        const QUANTIZE_MOVEMENT = 0x02;
    }
}

impl Default for VolumeFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Local-to-world matrix of the unit box `[-0.5, 0.5]^3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxTransform(pub Mat4);

/// Point used for nearest-volume selection and texel snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor(pub Vec3);

/// Handle returned by [`VolumeRegistry::register`].
pub type VolumeId = Entity;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("volume {0:?} is not registered")]
    Unknown(VolumeId),
}

/// Read-only snapshot of one registered volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub id: VolumeId,
    pub transform: Mat4,
    pub anchor: Vec3,
    pub flags: VolumeFlags,
}

#[derive(Default)]
pub struct VolumeRegistry {
    world: World,
}

impl VolumeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume anchored at the box centre (the transform's translation).
    pub fn register(&mut self, transform: Mat4, flags: VolumeFlags) -> VolumeId {
        self.register_with_anchor(transform, transform.w_axis.truncate(), flags)
    }

    pub fn register_with_anchor(&mut self, transform: Mat4, anchor: Vec3, flags: VolumeFlags) -> VolumeId {
        self.world
            .spawn((BoxTransform(transform), Anchor(anchor), flags))
    }

    pub fn deregister(&mut self, id: VolumeId) -> Result<(), RegistryError> {
        self.world.despawn(id).map_err(|_| RegistryError::Unknown(id))
    }

    #[inline]
    pub fn contains(&self, id: VolumeId) -> bool {
        self.world.contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn get(&self, id: VolumeId) -> Option<Volume> {
        let mut q = self
            .world
            .query_one::<(&BoxTransform, &Anchor, &VolumeFlags)>(id)
            .ok()?;
        q.get().map(|(t, a, f)| Volume {
            id,
            transform: t.0,
            anchor: a.0,
            flags: *f,
        })
    }

    /// Move a volume; its anchor follows the new box centre.
    pub fn set_transform(&mut self, id: VolumeId, transform: Mat4) -> Result<(), RegistryError> {
        let (t, a) = self
            .world
            .query_one_mut::<(&mut BoxTransform, &mut Anchor)>(id)
            .map_err(|_| RegistryError::Unknown(id))?;
        t.0 = transform;
        a.0 = transform.w_axis.truncate();
        Ok(())
    }

    pub fn set_anchor(&mut self, id: VolumeId, anchor: Vec3) -> Result<(), RegistryError> {
        let a = self
            .world
            .query_one_mut::<&mut Anchor>(id)
            .map_err(|_| RegistryError::Unknown(id))?;
        a.0 = anchor;
        Ok(())
    }

    pub fn set_flags(&mut self, id: VolumeId, flags: VolumeFlags) -> Result<(), RegistryError> {
        let f = self
            .world
            .query_one_mut::<&mut VolumeFlags>(id)
            .map_err(|_| RegistryError::Unknown(id))?;
        *f = flags;
        Ok(())
    }

    /// Volume whose anchor is closest to `position`; ties keep the first found.
    pub fn nearest(&self, position: Vec3) -> Option<Volume> {
        let mut best: Option<(f32, Volume)> = None;
        for (id, (t, a, f)) in self
            .world
            .query::<(&BoxTransform, &Anchor, &VolumeFlags)>()
            .iter()
        {
            let dist_sq = a.0.distance_squared(position);
            if best.is_some_and(|(d, _)| dist_sq >= d) {
                continue;
            }
            best = Some((
                dist_sq,
                Volume {
                    id,
                    transform: t.0,
                    anchor: a.0,
                    flags: *f,
                },
            ));
        }
        best.map(|(_, v)| v)
    }

    /// Replace `out` with the box transform of every registered volume.
    pub fn fill_box_transforms(&self, out: &mut Vec<Mat4>) {
        out.clear();
        out.extend(
            self.world
                .query::<&BoxTransform>()
                .iter()
                .map(|(_, t)| t.0),
        );
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, y, z))
    }

    #[test]
    fn register_and_deregister() {
        let mut reg = VolumeRegistry::new();
        assert!(reg.is_empty());
        let a = reg.register(at(0.0, 0.0, 0.0), VolumeFlags::default());
        let b = reg.register(at(5.0, 0.0, 0.0), VolumeFlags::empty());
        assert_eq!(reg.len(), 2);
        assert!(reg.contains(a) && reg.contains(b));

        reg.deregister(a).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(!reg.contains(a));
        assert_eq!(reg.deregister(a), Err(RegistryError::Unknown(a)));
        assert!(reg.get(a).is_none());
        assert_eq!(reg.get(b).unwrap().flags, VolumeFlags::empty());
    }

    #[test]
    fn default_flags_enable_everything() {
        let flags = VolumeFlags::default();
        assert!(flags.contains(VolumeFlags::SHADOW_ADJUSTMENT));
        assert!(flags.contains(VolumeFlags::QUANTIZE_MOVEMENT));
    }

    #[test]
    fn anchor_defaults_to_box_centre() {
        let mut reg = VolumeRegistry::new();
        let id = reg.register(at(1.0, 2.0, 3.0), VolumeFlags::default());
        assert_eq!(reg.get(id).unwrap().anchor, Vec3::new(1.0, 2.0, 3.0));

        reg.set_transform(id, at(-4.0, 0.0, 0.0)).unwrap();
        let v = reg.get(id).unwrap();
        assert_eq!(v.anchor, Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(v.transform, at(-4.0, 0.0, 0.0));

        reg.set_anchor(id, Vec3::Y).unwrap();
        assert_eq!(reg.get(id).unwrap().anchor, Vec3::Y);
    }

    #[test]
    fn nearest_by_anchor() {
        let mut reg = VolumeRegistry::new();
        assert!(reg.nearest(Vec3::ZERO).is_none());
        let far = reg.register(at(10.0, 0.0, 0.0), VolumeFlags::default());
        let near = reg.register(at(0.0, 3.0, 0.0), VolumeFlags::SHADOW_ADJUSTMENT);
        let _mid = reg.register(at(0.0, 0.0, -6.0), VolumeFlags::default());

        let v = reg.nearest(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(v.id, near);
        assert_eq!(v.flags, VolumeFlags::SHADOW_ADJUSTMENT);
        assert_eq!(reg.nearest(Vec3::new(9.0, 0.0, 0.0)).unwrap().id, far);

        // a custom anchor overrides the box centre
        reg.set_anchor(far, Vec3::new(0.0, 1.5, 0.0)).unwrap();
        assert_eq!(reg.nearest(Vec3::new(0.0, 1.0, 0.0)).unwrap().id, far);
    }

    #[test]
    fn updating_unknown_volume_fails() {
        let mut reg = VolumeRegistry::new();
        let id = reg.register(Mat4::IDENTITY, VolumeFlags::default());
        reg.deregister(id).unwrap();
        assert!(reg.set_transform(id, Mat4::IDENTITY).is_err());
        assert!(reg.set_flags(id, VolumeFlags::empty()).is_err());
        assert!(reg.set_anchor(id, Vec3::ZERO).is_err());
    }

    #[test]
    fn box_transforms_cover_all_volumes() {
        let mut reg = VolumeRegistry::new();
        for i in 0..5 {
            reg.register(at(i as f32, 0.0, 0.0), VolumeFlags::default());
        }
        let mut out = vec![Mat4::ZERO; 9];
        reg.fill_box_transforms(&mut out);
        assert_eq!(out.len(), 5);
        let mut xs: Vec<i32> = out.iter().map(|m| m.w_axis.x as i32).collect();
        xs.sort();
        assert_eq!(xs, vec![0, 1, 2, 3, 4]);
    }
}
