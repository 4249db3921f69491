use glam::Vec3;

/// Axis-aligned box stored as centre + full size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub size: Vec3,
}

impl Bounds {
    #[inline]
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            size: max - min,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.size * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.size * 0.5
    }
}

/// Componentwise `(min, max)` of `points`, `None` when empty.
pub fn min_max<I: IntoIterator<Item = Vec3>>(points: I) -> Option<(Vec3, Vec3)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}
