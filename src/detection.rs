//! Grounding and velocity geometry.
//!
//! Pure math used by the grounding classifier and the locomotion
//! integrator: slope classification against the walkable limit, plane
//! projection for impact resolution, slope reorientation of ground
//! velocity, and the non-overshooting velocity blend.

use bevy::prelude::*;

/// Angle in radians between `up` and `normal`.
///
/// A zero-magnitude input on either side degenerates to zero angle rather
/// than producing NaN.
pub fn slope_angle(up: Vec3, normal: Vec3) -> f32 {
    let magnitude_sq = up.length_squared() * normal.length_squared();
    if magnitude_sq < 1e-15 {
        return 0.0;
    }
    (up.dot(normal) / magnitude_sq.sqrt())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Whether a contact normal counts as walkable ground.
///
/// The boundary is strict: a surface at exactly `slope_limit` is rejected.
/// Normals facing away from up (or degenerate into the ground) are never
/// walkable, while a zero-magnitude normal degenerates to flat ground.
pub fn is_walkable(normal: Vec3, slope_limit: f32) -> bool {
    if normal.length_squared() < 1e-15 {
        return true;
    }
    if Vec3::Y.dot(normal) <= 0.0 {
        return false;
    }
    slope_angle(Vec3::Y, normal) < slope_limit
}

/// Remove the component of `v` along a unit `normal`, keeping the
/// tangential part. Idempotent for already-tangential vectors.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Re-orient a velocity onto the ground plane so movement follows the
/// slope tangent instead of the world-flat plane. The result never gains
/// speed: magnitude is exact along the slope's fall line and shortened
/// for oblique directions.
pub fn reorient_on_slope(v: Vec3, slope_normal: Vec3, up: Vec3) -> Vec3 {
    let Some(direction) = v.try_normalize() else {
        return v;
    };
    let direction_right = direction.cross(up);
    slope_normal.cross(direction_right) * v.length()
}

/// Move `current` toward `target` by at most `max_delta`, never
/// overshooting within one step.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance < 1e-8 {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Friction scalar for an unwalkable contact: zero for a flat normal,
/// approaching one as the face steepens.
pub fn steep_slope_friction(normal: Vec3) -> f32 {
    1.0 - normal.dot(Vec3::Y)
}
