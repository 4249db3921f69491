mod bounds;
mod plane;
mod unit_box;

pub use bounds::{Bounds, min_max};
pub use plane::{FRUSTUM_PLANES, Plane, frustum_planes};
pub use unit_box::{
    BOX_CORNERS, BOX_EDGES, BOX_FACES, mul_point, mul_point3x4, unit_box_corners,
};
