//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! work with the controller. The controller never talks to a physics engine
//! directly: it issues capsule sweeps and move requests through this
//! boundary, which allows swapping engines (Rapier3D, custom, scripted
//! test worlds) without touching the movement logic.

use bevy::prelude::*;

use crate::collision::{Capsule, CastHit};

/// Trait for physics backend implementations.
///
/// All queries are synchronous and run against the world state as it is at
/// the moment of the call; the controller issues them mid-tick and expects
/// blocking answers.
pub trait FpsPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Sweep a capsule along `direction` for at most `max_distance`.
    ///
    /// The sweep must test only static/physical geometry: trigger volumes
    /// and sensors are ignored. Returns `None` when nothing is hit within
    /// range, which the controller treats as the ordinary airborne case.
    ///
    /// # Arguments
    /// * `world` - The ECS world for queries
    /// * `capsule` - Swept volume in world space
    /// * `direction` - Cast direction (normalized)
    /// * `max_distance` - Maximum cast distance
    /// * `exclude_entity` - Entity to exclude from the sweep (usually self)
    /// * `collision_groups` - Optional collision groups (memberships, filters)
    fn capsule_cast(
        world: &mut World,
        capsule: &Capsule,
        direction: Vec3,
        max_distance: f32,
        exclude_entity: Entity,
        collision_groups: Option<(u32, u32)>,
    ) -> Option<CastHit>;

    /// Request the engine's collision-aware move primitive.
    ///
    /// The engine resolves contacts internally while applying the
    /// displacement; that resolution is opaque to the controller, which
    /// runs its own advisory sweep independently.
    fn move_character(world: &mut World, entity: Entity, displacement: Vec3);

    /// Reposition the character without collision resolution.
    ///
    /// Used by the kill-plane recovery, where moving an active collision
    /// volume through the move primitive would fight the physics engine.
    fn teleport(world: &mut World, entity: Entity, position: Vec3);

    /// Current world-space position of the character's feet origin.
    fn get_position(world: &World, entity: Entity) -> Vec3;

    /// Collision group bits for the entity, if it has any.
    fn get_collision_groups(world: &World, entity: Entity) -> Option<(u32, u32)>;

    /// Fixed simulation timestep in seconds.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}
