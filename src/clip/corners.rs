//! Fixed-capacity corner arena.
//!
//! ▸ Corner slots are addressed by index and tracked by one `u64` bitmask
//!   (bit set = live). Freed slots are reused lowest-index first.
//! ▸ Storage lives inline up to 32 corners, so a typical clip never touches
//!   the heap.

use glam::Vec3;
use smallvec::SmallVec;

use super::ClipError;

/// Hard limit imposed by the `u64` allocation mask.
pub const MAX_CORNERS: usize = 64;

pub type CornerId = u16;

#[derive(Clone, Debug, Default)]
pub struct CornerPool {
    positions: SmallVec<[Vec3; 32]>,
    live: u64,
}

impl CornerPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.live = 0;
    }

    /// Store `p` in the lowest free slot.
    pub fn allocate(&mut self, p: Vec3) -> Result<CornerId, ClipError> {
        let id = (!self.live).trailing_zeros() as usize;
        if id >= MAX_CORNERS {
            return Err(ClipError::CornerCapacity);
        }
        if id >= self.positions.len() {
            debug_assert_eq!(id, self.positions.len());
            self.positions.push(p);
        } else {
            self.positions[id] = p;
        }
        self.live |= 1 << id;
        Ok(id as CornerId)
    }

    /// Return every slot whose bit is set in `mask` to the free pool.
    #[inline]
    pub fn release(&mut self, mask: u64) {
        self.live &= !mask;
    }

    #[inline]
    pub fn is_live(&self, id: CornerId) -> bool {
        (id as usize) < MAX_CORNERS && self.live & (1 << id) != 0
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.count_ones() as usize
    }

    #[inline(always)]
    pub fn position(&self, id: CornerId) -> Vec3 {
        self.positions[id as usize]
    }

    /// Live corners in ascending slot order.
    pub fn iter_live(&self) -> impl Iterator<Item = (CornerId, Vec3)> + '_ {
        let mut mask = self.live;
        std::iter::from_fn(move || {
            if mask == 0 {
                return None;
            }
            let id = mask.trailing_zeros() as usize;
            mask &= mask - 1;
            Some((id as CornerId, self.positions[id]))
        })
    }

    /// Squeeze out free slots so the live corners occupy `0..live_count()`.
    ///
    /// Trailing free slots are dropped; each interior hole is filled with
    /// the current last corner. `on_move(from, to)` is called for every
    /// relocated corner so callers can patch their references.
    pub fn compact(&mut self, mut on_move: impl FnMut(CornerId, CornerId)) -> &[Vec3] {
        loop {
            let last_set = (u64::BITS - self.live.leading_zeros()) as usize;
            self.positions.truncate(last_set);

            let first_empty = (!self.live).trailing_zeros() as usize;
            if first_empty >= self.positions.len() {
                break;
            }
            let from = self.positions.len() - 1;
            self.positions.swap_remove(first_empty);
            self.live |= 1 << first_empty;
            self.live &= !(1 << from);
            on_move(from as CornerId, first_empty as CornerId);
        }
        &self.positions
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(n: usize) -> CornerPool {
        let mut pool = CornerPool::new();
        for i in 0..n {
            pool.allocate(Vec3::splat(i as f32)).unwrap();
        }
        pool
    }

    #[test]
    fn allocates_sequentially_then_reuses_lowest_hole() {
        let mut pool = pool_with(4);
        assert_eq!(pool.live_count(), 4);
        pool.release(0b0101); // free 0 and 2
        assert!(!pool.is_live(0) && pool.is_live(1) && !pool.is_live(2));
        assert_eq!(pool.allocate(Vec3::X).unwrap(), 0);
        assert_eq!(pool.allocate(Vec3::Y).unwrap(), 2);
        assert_eq!(pool.allocate(Vec3::Z).unwrap(), 4);
        assert_eq!(pool.position(2), Vec3::Y);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut pool = pool_with(MAX_CORNERS);
        assert_eq!(pool.live, u64::MAX);
        assert_eq!(pool.allocate(Vec3::ZERO), Err(ClipError::CornerCapacity));
        pool.release(1 << 63);
        assert_eq!(pool.allocate(Vec3::ONE).unwrap(), 63);
    }

    #[test]
    fn iter_live_skips_free_slots() {
        let mut pool = pool_with(5);
        pool.release(0b1_0010);
        let ids: Vec<_> = pool.iter_live().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn compact_fills_holes_and_reports_moves() {
        let mut pool = pool_with(6);
        pool.release(0b10_0101); // free 0, 2, 5
        let mut moves = Vec::new();
        let positions = pool.compact(|from, to| moves.push((from, to))).to_vec();

        assert_eq!(positions.len(), 3);
        // slot 5 was trailing and just dropped; 4 fills 0, 3 fills 2
        assert_eq!(moves, vec![(4, 0), (3, 2)]);
        assert_eq!(positions, vec![Vec3::splat(4.0), Vec3::splat(1.0), Vec3::splat(3.0)]);
        assert_eq!(pool.live, 0b111);
    }

    #[test]
    fn compact_empty_pool() {
        let mut pool = pool_with(3);
        pool.release(u64::MAX);
        assert!(pool.compact(|_, _| panic!("nothing to move")).is_empty());
    }
}
