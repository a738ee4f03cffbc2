//! Hit testing against label geometry

mod raycaster;

pub use raycaster::{raycast_oriented_quad, UIRaycastHit};
