//! Collision query structures.
//!
//! These structures describe the character's swept collision volume and the
//! results of capsule sweeps against the environment.

use bevy::prelude::*;

use crate::config::CharacterBody;

/// Information about a capsule sweep hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastHit {
    /// Distance travelled along the sweep direction before contact.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if the backend reports one).
    pub entity: Option<Entity>,
}

impl CastHit {
    /// Create a hit result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}

/// Swept-sphere collision volume: two sphere centers joined by a cylinder.
///
/// Derived fresh each tick from [`CharacterBody`] and the character's current
/// position; never stored across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Center of the bottom sphere cap.
    pub bottom: Vec3,
    /// Center of the top sphere cap.
    pub top: Vec3,
    /// Radius of both caps and the joining cylinder.
    pub radius: f32,
}

impl Capsule {
    /// Build the capsule for a character whose origin sits at its feet.
    pub fn from_body(position: Vec3, body: &CharacterBody) -> Self {
        Self {
            bottom: position + Vec3::Y * body.radius,
            top: position + Vec3::Y * (body.height - body.radius),
            radius: body.radius,
        }
    }

    /// The capsule translated by `offset`.
    pub fn offset(&self, offset: Vec3) -> Self {
        Self {
            bottom: self.bottom + offset,
            top: self.top + offset,
            radius: self.radius,
        }
    }

    /// World-space center of the volume.
    pub fn center(&self) -> Vec3 {
        (self.bottom + self.top) * 0.5
    }

    /// Distance between the two cap centers.
    pub fn segment_length(&self) -> f32 {
        (self.top - self.bottom).length()
    }

    /// Lowest point of the volume (bottom of the lower cap).
    pub fn lowest_point(&self) -> Vec3 {
        self.bottom - Vec3::Y * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_hit_new() {
        let hit = CastHit::new(5.0, Vec3::Y, Vec3::new(10.0, 0.0, 0.0), None);

        assert_eq!(hit.distance, 5.0);
        assert_eq!(hit.normal, Vec3::Y);
        assert_eq!(hit.point, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn cast_hit_with_entity() {
        let entity = Entity::from_raw(42);
        let hit = CastHit::new(3.0, Vec3::X, Vec3::ZERO, Some(entity));

        assert_eq!(hit.entity, Some(entity));
    }

    #[test]
    fn capsule_from_body() {
        let body = CharacterBody {
            radius: 0.5,
            height: 2.0,
            ..Default::default()
        };
        let capsule = Capsule::from_body(Vec3::new(1.0, 3.0, -2.0), &body);

        assert_eq!(capsule.bottom, Vec3::new(1.0, 3.5, -2.0));
        assert_eq!(capsule.top, Vec3::new(1.0, 4.5, -2.0));
        assert_eq!(capsule.radius, 0.5);
        assert_eq!(capsule.lowest_point(), Vec3::new(1.0, 3.0, -2.0));
    }

    #[test]
    fn capsule_offset() {
        let body = CharacterBody::default();
        let capsule = Capsule::from_body(Vec3::ZERO, &body);
        let moved = capsule.offset(Vec3::new(0.0, 0.3, 1.0));

        assert_eq!(moved.bottom, capsule.bottom + Vec3::new(0.0, 0.3, 1.0));
        assert_eq!(moved.top, capsule.top + Vec3::new(0.0, 0.3, 1.0));
        assert_eq!(moved.radius, capsule.radius);
    }

    #[test]
    fn capsule_center_and_segment() {
        let body = CharacterBody {
            radius: 0.5,
            height: 1.8,
            ..Default::default()
        };
        let capsule = Capsule::from_body(Vec3::ZERO, &body);

        assert!((capsule.center().y - 0.9).abs() < 1e-6);
        assert!((capsule.segment_length() - 0.8).abs() < 1e-6);
    }
}
