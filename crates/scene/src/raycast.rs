//! Surface raycasting
//!
//! A [`Raycaster`] answers "what surface lies under this screen point". The
//! built-in [`HorizontalPlaneRaycaster`] intersects the camera ray with the
//! planes the tracker has reported; tests substitute scripted hits.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use waymark_camera::{Viewer, Viewport};
use waymark_core::WorldTransform;
use waymark_tracking::PlaneTracker;

/// How far the raycast may trust plane estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMode {
    /// Only planes with measured extents
    ExistingPlane,
    /// Accept estimated planes as well
    EstimatedPlane,
}

/// One surface raycast request
///
/// Only horizontal surfaces are tracked, so every query is horizontally
/// aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceQuery {
    /// Pixel position on the viewport
    pub screen_point: Vec2,
    pub estimation: EstimationMode,
}

impl SurfaceQuery {
    /// Placement query: view centre, estimated planes, horizontal only.
    pub fn view_center(viewport: &Viewport) -> Self {
        Self {
            screen_point: viewport.center(),
            estimation: EstimationMode::EstimatedPlane,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Pose of the surface at the hit point
    pub transform: WorldTransform,
    /// Distance along the camera ray
    pub distance: f32,
}

/// What a raycaster may look at
#[derive(Clone, Copy)]
pub struct RaycastContext<'a> {
    pub viewer: &'a Viewer,
    pub viewport: &'a Viewport,
    pub planes: &'a PlaneTracker,
}

/// Surface query primitive
pub trait Raycaster {
    /// Hits ordered nearest first; callers use only the first.
    fn raycast(&self, query: &SurfaceQuery, ctx: &RaycastContext<'_>) -> Vec<RaycastHit>;
}

/// Intersects the camera ray with every tracked horizontal plane
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalPlaneRaycaster;

impl Raycaster for HorizontalPlaneRaycaster {
    fn raycast(&self, query: &SurfaceQuery, ctx: &RaycastContext<'_>) -> Vec<RaycastHit> {
        let ray = ctx.viewer.screen_to_ray(query.screen_point, ctx.viewport);
        // Ray parallel to every horizontal plane
        if ray.direction.y.abs() < 1e-6 {
            return Vec::new();
        }

        let mut hits: Vec<RaycastHit> = ctx
            .planes
            .planes()
            .filter(|plane| {
                query.estimation == EstimationMode::EstimatedPlane
                    || (plane.extent.0 > 0.0 && plane.extent.1 > 0.0)
            })
            .filter_map(|plane| {
                let t = (plane.center.y - ray.origin.y) / ray.direction.y;
                if t <= 0.0 {
                    return None;
                }
                let point = ray.at(t);
                plane.contains_xz(point).then(|| RaycastHit {
                    transform: WorldTransform::from_translation(Vec3::new(
                        point.x,
                        plane.center.y,
                        point.z,
                    )),
                    distance: t,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
