//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::ecs::system::SystemState;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::FpsPhysicsBackend;
use crate::collision::{Capsule, CastHit};
use crate::config::CharacterBody;

/// Rapier3D physics backend for the first-person controller.
///
/// Capsule sweeps go through Rapier's query pipeline with sensors
/// excluded; the move primitive is Rapier's kinematic character
/// controller, whose internal contact resolution stays opaque to the
/// movement systems.
pub struct Rapier3dBackend;

impl FpsPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn capsule_cast(
        world: &mut World,
        capsule: &Capsule,
        direction: Vec3,
        max_distance: f32,
        exclude_entity: Entity,
        collision_groups: Option<(u32, u32)>,
    ) -> Option<CastHit> {
        let mut context_state: SystemState<ReadRapierContext> = SystemState::new(world);
        let rapier_context = context_state.get(world);
        let context = rapier_context.single().ok()?;

        let shape = Collider::capsule_y(capsule.segment_length() / 2.0, capsule.radius);

        let mut filter = QueryFilter::default()
            .exclude_rigid_body(exclude_entity)
            .exclude_sensors();
        if let Some((memberships, filters)) = collision_groups {
            filter = filter.groups(CollisionGroups::new(
                Group::from_bits_truncate(memberships),
                Group::from_bits_truncate(filters),
            ));
        }

        context
            .cast_shape(
                capsule.center(),
                Quat::IDENTITY,
                direction,
                &*shape.raw,
                ShapeCastOptions {
                    max_time_of_impact: max_distance,
                    stop_at_penetration: false,
                    ..default()
                },
                filter,
            )
            .map(|(hit_entity, hit)| {
                let normal = hit.details.map(|d| d.normal1).unwrap_or(-direction);
                let point = hit
                    .details
                    .map(|d| d.witness1)
                    .unwrap_or(capsule.center() + direction * hit.time_of_impact);
                CastHit::new(hit.time_of_impact, normal, point, Some(hit_entity))
            })
    }

    fn move_character(world: &mut World, entity: Entity, displacement: Vec3) {
        if let Some(mut controller) = world.get_mut::<KinematicCharacterController>(entity) {
            // Accumulate: grounding snaps and the main move both land in
            // the same tick before Rapier applies them.
            let pending = controller.translation.unwrap_or(Vec3::ZERO);
            controller.translation = Some(pending + displacement);
        } else if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            // No kinematic controller on the entity: fall back to a raw
            // transform move so the character does not freeze in place.
            transform.translation += displacement;
        }
    }

    fn teleport(world: &mut World, entity: Entity, position: Vec3) {
        if let Some(mut controller) = world.get_mut::<KinematicCharacterController>(entity) {
            controller.translation = None;
        }
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation = position;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation())
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn get_collision_groups(world: &World, entity: Entity) -> Option<(u32, u32)> {
        world
            .get::<CollisionGroups>(entity)
            .map(|cg| (cg.memberships.bits(), cg.filters.bits()))
    }
}

/// Plugin for the Rapier3D backend.
///
/// Rapier's own plugin owns simulation stepping; nothing extra is
/// scheduled here. Add `RapierPhysicsPlugin` to the app alongside the
/// controller plugin.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, _app: &mut App) {}
}

/// Physics components for a Rapier-backed character.
///
/// The collider is a capsule matching [`CharacterBody`], with the entity
/// origin at the feet. The kinematic controller carries the skin width as
/// its contact offset and excludes sensors, matching the sweep filter.
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    /// Position-driven kinematic body.
    pub rigid_body: RigidBody,
    /// Capsule collider, feet origin.
    pub collider: Collider,
    /// Rapier's collision-aware move primitive.
    pub controller: KinematicCharacterController,
}

impl Rapier3dCharacterBundle {
    /// Build the bundle from the character's capsule dimensions.
    pub fn from_body(body: &CharacterBody) -> Self {
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            collider: Collider::capsule(
                Vec3::Y * body.radius,
                Vec3::Y * (body.height - body.radius),
                body.radius,
            ),
            controller: KinematicCharacterController {
                offset: CharacterLength::Absolute(body.skin_width),
                up: *Dir3::Y,
                slide: true,
                // Stepping and ground snapping are handled by the
                // grounding classifier, not by Rapier.
                autostep: None,
                snap_to_ground: None,
                filter_flags: QueryFilterFlags::EXCLUDE_SENSORS,
                ..default()
            },
        }
    }
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::from_body(&CharacterBody::default())
    }
}
