//! Convex polyhedron clipped plane by plane.
//!
//! The shape is kept as a bag of edges. Each edge stores its two corners and
//! the ids of the two polygons it separates; polygons have no storage of their
//! own and exist only as ids on edges. Cutting with a plane:
//!
//! 1. classify every live corner by signed distance (cached for step 2);
//!    anything below the tolerance goes;
//! 2. drop edges that lie fully outside, shorten edges that cross the
//!    tolerance surface and remember each crossing;
//! 3. close the hole with a fresh polygon by chaining the crossings: the
//!    polygon *ahead* of one crossing is the polygon *behind* the next one;
//! 4. free the corners that fell outside.

use glam::{Mat4, Vec3};
use log::trace;
use smallvec::SmallVec;

use super::{ClipError, CornerId, CornerPool, MAX_CORNERS};
use crate::geometry::{BOX_EDGES, BOX_FACES, Plane, unit_box_corners};

pub type PolygonId = u16;

/// Corners closer than this to a plane's inside, or outside it, are cut away.
pub const DEFAULT_CLIP_TOLERANCE: f32 = 0.01;

/// New corners sit this far past the tolerance surface so that slicing
/// again with the same plane keeps them.
const CUT_BIAS: f32 = 1e-4;

/// Boundary between two adjacent faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub corners: [CornerId; 2],
    /// `[left, right]` seen walking from `corners[0]` to `corners[1]`.
    pub polygons: [PolygonId; 2],
}

impl Edge {
    #[inline]
    pub fn new(c1: CornerId, c2: CornerId, left: PolygonId, right: PolygonId) -> Self {
        Self {
            corners: [c1, c2],
            polygons: [left, right],
        }
    }

    #[inline(always)]
    pub fn polygon(&self, right: bool) -> PolygonId {
        self.polygons[right as usize]
    }

    #[inline(always)]
    pub fn corner(&self, second: bool) -> CornerId {
        self.corners[second as usize]
    }
}

/// A crossing recorded during one clip pass.
#[derive(Clone, Copy, Debug)]
struct Crossing {
    edge: usize,
    /// `true` when `corners[0]` survived (the new corner replaced `corners[1]`).
    kept_first: bool,
}

/// Scratch state for clipping one box against a set of planes.
///
/// Built with [`from_box`](Self::from_box), cut with [`slice`](Self::slice),
/// harvested with [`corners`](Self::corners), then [`clear`](Self::clear)ed
/// and reused for the next box.
#[derive(Clone, Debug)]
pub struct BoxFrustumIntersection {
    corners: CornerPool,
    edges: SmallVec<[Edge; 32]>,
    polygon_counter: PolygonId,
    tolerance: f32,
}

impl Default for BoxFrustumIntersection {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxFrustumIntersection {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_CLIP_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            corners: CornerPool::new(),
            edges: SmallVec::new(),
            polygon_counter: 0,
            tolerance,
        }
    }

    pub fn clear(&mut self) {
        self.corners.clear();
        self.edges.clear();
        self.polygon_counter = 0;
    }

    /// Reset to the unit cube `[-0.5, 0.5]^3` mapped through `transform`.
    pub fn from_box(&mut self, transform: Mat4) {
        self.clear();
        for p in unit_box_corners(transform) {
            // 8 slots in an empty pool always fit
            let _ = self.corners.allocate(p);
        }
        self.edges
            .extend(BOX_EDGES.iter().map(|&(a, b, l, r)| Edge::new(a, b, l, r)));
        self.polygon_counter = BOX_FACES as PolygonId;
    }

    /// Cut away everything closer than the tolerance to the negative side of
    /// `plane`.
    ///
    /// Returns `Ok(false)` when no corner is cut and the shape is left
    /// untouched. After an `Err` the state is unusable until the next
    /// [`from_box`](Self::from_box) / [`clear`](Self::clear).
    pub fn slice(&mut self, plane: &Plane) -> Result<bool, ClipError> {
        let mut distances = [0.0f32; MAX_CORNERS];
        let mut removed: u64 = 0;
        for (id, p) in self.corners.iter_live() {
            let d = plane.distance_to_point(p);
            distances[id as usize] = d;
            if d < self.tolerance {
                removed |= 1 << id;
            }
        }
        if removed == 0 {
            return Ok(false);
        }
        let is_removed = |c: CornerId| removed & (1 << c) != 0;

        /* ---- 1. shorten crossing edges, drop outside edges ---------------- */
        let mut crossings: SmallVec<[Crossing; 8]> = SmallVec::new();
        let mut e = 0;
        while e < self.edges.len() {
            let mut edge = self.edges[e];
            let keep1 = !is_removed(edge.corners[0]);
            let keep2 = !is_removed(edge.corners[1]);
            if keep1 != keep2 {
                let [c1, c2] = edge.corners;
                let (kept, gone) = if keep1 { (c1, c2) } else { (c2, c1) };
                let (dk, dg) = (distances[kept as usize], distances[gone as usize]);
                // dg < tolerance <= dk; a kept corner inside the bias band is reused as is
                let t = ((dk - self.tolerance - CUT_BIAS) / (dk - dg)).max(0.0);
                let p = self.corners.position(kept).lerp(self.corners.position(gone), t);
                // the outside end is replaced: corners[1] if corners[0] survived
                edge.corners[keep1 as usize] = self.corners.allocate(p)?;
                self.edges[e] = edge;
                crossings.push(Crossing {
                    edge: e,
                    kept_first: keep1,
                });
                e += 1;
            } else if !keep1 {
                // swapped-in edge is examined at the same index
                self.edges.swap_remove(e);
            } else {
                e += 1;
            }
        }

        /* ---- 2. stitch the cap polygon ------------------------------------ */
        let cap = self.polygon_counter;
        self.polygon_counter += 1;
        let n = crossings.len();
        for c1 in 0..n {
            let first = crossings[c1];
            let edge1 = self.edges[first.edge];
            let next_polygon = edge1.polygon(first.kept_first);
            let c2 = if c1 + 1 < n {
                let found = (c1 + 1..n).find(|&c| {
                    let cand = crossings[c];
                    self.edges[cand.edge].polygon(!cand.kept_first) == next_polygon
                });
                if let Some(found) = found {
                    crossings.swap(found, c1 + 1);
                }
                c1 + 1
            } else {
                0
            };
            let second = crossings[c2];
            let edge2 = self.edges[second.edge];
            self.edges.push(Edge::new(
                edge1.corner(first.kept_first),
                edge2.corner(second.kept_first),
                cap,
                next_polygon,
            ));
        }

        trace!(
            "clip pass: removed {} corners, inserted {}, {} edges",
            removed.count_ones(),
            n,
            self.edges.len()
        );

        /* ---- 3. release outside corners ----------------------------------- */
        self.corners.release(removed);
        Ok(true)
    }

    /// Clip `transform`'s unit box by every plane in turn and harvest what is left.
    pub fn clip(&mut self, transform: Mat4, planes: &[Plane]) -> Result<&[Vec3], ClipError> {
        self.from_box(transform);
        for plane in planes {
            self.slice(plane)?;
        }
        Ok(self.corners())
    }

    /// Surviving corners, compacted into a dense slice.
    ///
    /// Empty when the box lies outside at least one plane.
    pub fn corners(&mut self) -> &[Vec3] {
        let edges = &mut self.edges;
        self.corners.compact(|from, to| {
            for edge in edges.iter_mut() {
                for c in &mut edge.corners {
                    if *c == from {
                        *c = to;
                    }
                }
            }
        })
    }

    /// Live corners without compacting.
    pub fn live_corners(&self) -> impl Iterator<Item = (CornerId, Vec3)> + '_ {
        self.corners.iter_live()
    }

    #[inline]
    pub fn live_corner_count(&self) -> usize {
        self.corners.live_count()
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of polygon ids handed out so far (6 for a fresh box, +1 per cut).
    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygon_counter as usize
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
