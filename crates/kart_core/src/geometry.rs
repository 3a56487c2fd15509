//! Kart-local geometry
//!
//! ## Coordinate convention
//! - Y is up, the arena floor is the X/Z plane
//! - In kart-local space +Z is the kart's forward direction and +X its right
//!
//! A kart's transform maps kart-local coordinates to world coordinates, so
//! `trans.inverse_transform_point(p)` answers "where is `p` as seen from the
//! driver's seat".

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

pub type Vec3 = Vector3<f32>;
pub type Pos3 = Point3<f32>;
pub type KartTransform = Isometry3<f32>;

/// Relative position of a point as seen from a kart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PosData {
    /// Point lies behind the kart (local z < 0)
    pub behind: bool,
    /// Point lies on the right-hand side (local x >= 0)
    pub on_side: bool,
    /// Unsigned angle between the kart heading axis and the point, 0..=PI/2
    pub angle: f32,
    /// Horizontal distance from the kart to the point
    pub distance: f32,
}

/// Horizontal length, height ignored.
#[inline]
pub fn length_2d(v: &Vec3) -> f32 {
    (v.x * v.x + v.z * v.z).sqrt()
}

#[inline]
pub fn distance_2d(a: &Pos3, b: &Pos3) -> f32 {
    length_2d(&(b - a))
}

/// Build a kart transform from a position and a yaw (radians about +Y).
///
/// Yaw 0 faces +Z.
pub fn kart_transform(position: Pos3, heading: f32) -> KartTransform {
    Isometry3::from_parts(
        Translation3::from(position.coords),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), heading),
    )
}

/// Classify `point` relative to the kart. Also returns the point in
/// kart-local coordinates.
pub fn check_position(trans: &KartTransform, point: &Pos3) -> (PosData, Vec3) {
    let local = trans.inverse_transform_point(point).coords;

    let data = PosData {
        behind: local.z < 0.0,
        on_side: local.x >= 0.0,
        // atan2 of the absolute values keeps (0, 0) at 0 instead of NaN
        angle: local.x.abs().atan2(local.z.abs()),
        distance: distance_2d(&Pos3::from(trans.translation.vector), point),
    };
    (data, local)
}

/// Map a kart-local offset back to world coordinates.
#[inline]
pub fn to_world(trans: &KartTransform, local: &Vec3) -> Pos3 {
    trans.transform_point(&Pos3::from(*local))
}

/// Signed heading error toward a local point: positive = turn right.
#[inline]
pub fn steer_angle(local: &Vec3) -> f32 {
    local.x.atan2(local.z)
}
