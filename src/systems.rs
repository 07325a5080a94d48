//! Core controller systems.
//!
//! One full update runs per fixed tick, in a fixed order: kill-plane
//! check, grounding classification, locomotion integration, displacement
//! and impact resolution, then look. The systems are generic over the
//! physics backend so different engines can supply the capsule sweeps
//! and the move primitive.

use bevy::prelude::*;

use crate::audio::MovementSound;
use crate::backend::FpsPhysicsBackend;
use crate::collision::{Capsule, CastHit};
use crate::config::{CharacterBody, CharacterHead, ControllerConfig, EnvironmentState};
use crate::detection::{
    is_walkable, move_towards, project_on_plane, reorient_on_slope, steep_slope_friction,
};
use crate::intent::FpsIntent;
use crate::state::{Airborne, Grounded, MovementState};

fn tick_time(world: &World) -> f32 {
    world
        .get_resource::<Time>()
        .map(|t| t.elapsed_secs())
        .unwrap_or(0.0)
}

/// Teleport characters that fell below the kill plane back to the
/// configured respawn point with zeroed velocity.
///
/// Uses the backend's raw teleport rather than the move primitive:
/// dragging an active collision volume across the world through the
/// physics engine does not end well.
pub fn respawn_below_kill_plane<B: FpsPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, ControllerConfig)> = world
        .query::<(Entity, &ControllerConfig, &MovementState)>()
        .iter(world)
        .map(|(e, config, _)| (e, *config))
        .collect();

    for (entity, config) in entities {
        let position = B::get_position(world, entity);
        if position.y >= config.kill_height {
            continue;
        }

        debug!("character {entity} fell below the kill plane, respawning");
        B::teleport(world, entity, config.respawn_point);
        if let Some(mut state) = world.get_mut::<MovementState>(entity) {
            state.velocity = Vec3::ZERO;
            state.last_impact_velocity = Vec3::ZERO;
        }
    }
}

/// Classify the surface under each character and update grounded state.
///
/// Casts the capsule downward by the probe distance (skin tolerance while
/// grounded, a longer reach while airborne) and resolves the contact in
/// strict order: walkable ground, then climbable step, then the
/// slope-friction fallback. Re-grounding is suppressed entirely inside
/// the jump grace window. Emits a landing cue on the airborne-to-grounded
/// transition when the debounce window has elapsed.
pub fn update_grounding<B: FpsPhysicsBackend>(world: &mut World) {
    let now = tick_time(world);
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(Entity, ControllerConfig, CharacterBody)> = world
        .query::<(Entity, &ControllerConfig, &CharacterBody, &MovementState)>()
        .iter(world)
        .map(|(e, config, body, _)| (e, *config, *body))
        .collect();

    for (entity, config, body) in entities {
        let Some(state) = world.get::<MovementState>(entity).cloned() else {
            continue;
        };
        let was_grounded = state.grounded;
        let mut velocity = state.velocity;
        let mut grounded = false;
        let mut ground_normal = Vec3::Y;
        let mut slope_friction = state.slope_friction;
        let mut snap: Option<Vec3> = None;

        let probe_distance = if was_grounded {
            body.skin_width + config.ground_probe_grounded
        } else {
            config.ground_probe_airborne
        };

        if state.grounding_gate_open(now, config.jump_grace) {
            let position = B::get_position(world, entity);
            let groups = B::get_collision_groups(world, entity);
            let capsule = Capsule::from_body(position, &body);

            if let Some(hit) =
                B::capsule_cast(world, &capsule, Vec3::NEG_Y, probe_distance, entity, groups)
            {
                ground_normal = hit.normal;
                slope_friction = 0.0;

                if is_walkable(hit.normal, body.slope_limit) {
                    grounded = true;
                    if hit.distance > body.skin_width {
                        // Snap down by the excess so the capsule never floats.
                        snap = Some(Vec3::NEG_Y * hit.distance);
                    }
                } else if let Some(step) = probe_step::<B>(
                    world,
                    &capsule,
                    state.horizontal_velocity(),
                    &body,
                    probe_distance,
                    dt,
                    entity,
                    groups,
                ) {
                    if step.distance > body.skin_width {
                        grounded = true;
                        snap = Some(Vec3::Y * (body.step_offset - step.distance));
                    }
                } else if velocity.y > 0.0 {
                    // Bleed upward momentum on steep faces so the character
                    // cannot slide uphill past the slope limit.
                    slope_friction = steep_slope_friction(hit.normal);
                    velocity.y -= slope_friction * config.ground_acceleration * dt;
                }
            }
        }

        if let Some(snap) = snap {
            B::move_character(world, entity, snap);
        }

        let landed = grounded && !was_grounded && state.landing_debounce_elapsed(now, config.land_debounce);

        if let Some(mut state) = world.get_mut::<MovementState>(entity) {
            if !grounded && was_grounded {
                state.left_ground_at = now;
            }
            state.grounded = grounded;
            state.ground_normal = ground_normal;
            state.slope_friction = slope_friction;
            state.velocity = velocity;
        }

        if landed {
            world.send_event(MovementSound::Land);
        }
    }
}

/// Probe for a climbable step: offset the capsule by one tick of
/// horizontal velocity and by the step height, then cast back down. A hit
/// that itself passes the walkable-slope test is a valid step.
#[allow(clippy::too_many_arguments)]
fn probe_step<B: FpsPhysicsBackend>(
    world: &mut World,
    capsule: &Capsule,
    horizontal_velocity: Vec3,
    body: &CharacterBody,
    probe_distance: f32,
    dt: f32,
    entity: Entity,
    groups: Option<(u32, u32)>,
) -> Option<CastHit> {
    let mut offset = horizontal_velocity * dt;
    offset.y = body.step_offset;

    let hit = B::capsule_cast(
        world,
        &capsule.offset(offset),
        Vec3::NEG_Y,
        probe_distance + offset.y,
        entity,
        groups,
    )?;
    is_walkable(hit.normal, body.slope_limit).then_some(hit)
}

/// Integrate velocity from intent, grounded state, and the environment
/// modifiers.
///
/// On ground, velocity blends toward the slope-reoriented target at the
/// ground acceleration rate and jump/footstep cues fire as side effects.
/// In the air, gravity and the clamped air acceleration apply instead.
/// The whole system is a no-op while movement is blocked.
pub fn apply_locomotion<B: FpsPhysicsBackend>(world: &mut World) {
    let now = tick_time(world);
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(
        Entity,
        ControllerConfig,
        CharacterBody,
        EnvironmentState,
        FpsIntent,
        Quat,
    )> = world
        .query::<(
            Entity,
            &ControllerConfig,
            &CharacterBody,
            &EnvironmentState,
            &FpsIntent,
            &Transform,
            &MovementState,
        )>()
        .iter(world)
        .map(|(e, config, body, env, intent, transform, _)| {
            (e, *config, *body, *env, intent.clone(), transform.rotation)
        })
        .collect();

    for (entity, config, body, env, intent, rotation) in entities {
        if env.movement_blocked {
            continue;
        }

        let Some(state) = world.get::<MovementState>(entity).cloned() else {
            continue;
        };
        let mut velocity = state.velocity;

        let move_input = intent.move_input();
        let world_move = rotation * Vec3::new(move_input.x, 0.0, move_input.y);

        let mut jumped = false;
        let mut stepped = false;
        let mut last_jump_at = state.last_jump_at;
        let mut left_ground_at = state.left_ground_at;
        let mut grounded = state.grounded;
        let mut ground_normal = state.ground_normal;
        let mut distance_since_step = state.distance_since_step;

        if grounded {
            let speed_modifier = config.speed_modifier(&env, intent.sprinting());

            let target = world_move * (config.max_ground_speed * speed_modifier);
            let target = reorient_on_slope(target, ground_normal, Vec3::Y);
            velocity = move_towards(velocity, target, config.ground_acceleration * dt);

            if intent.jump_started() {
                let jump_speed = config.jump_speed * config.jump_modifier(&env);
                let position = B::get_position(world, entity);
                let groups = B::get_collision_groups(world, entity);
                let capsule = Capsule::from_body(position, &body);
                let ceiling =
                    B::capsule_cast(world, &capsule, Vec3::Y, jump_speed * dt, entity, groups);

                if ceiling.is_none() {
                    velocity.y = jump_speed;
                    grounded = false;
                    ground_normal = Vec3::Y;
                    last_jump_at = now;
                    left_ground_at = now;
                    jumped = true;
                }
            }

            if distance_since_step > config.step_distance(speed_modifier) {
                distance_since_step = 0.0;
                stepped = true;
            }
            distance_since_step += velocity.length() * dt;
        } else {
            let environment_speed = config.environment_speed_modifier(&env);

            let vertical = velocity.y - config.gravity * config.gravity_modifier(&env) * dt;
            let mut horizontal = state.horizontal_velocity();
            horizontal += world_move * (config.air_acceleration * dt * environment_speed);
            horizontal = horizontal.clamp_length_max(config.max_air_speed * environment_speed);

            velocity = horizontal + Vec3::Y * vertical;
        }

        if let Some(mut state) = world.get_mut::<MovementState>(entity) {
            state.velocity = velocity;
            state.grounded = grounded;
            state.ground_normal = ground_normal;
            state.last_jump_at = last_jump_at;
            state.left_ground_at = left_ground_at;
            state.distance_since_step = distance_since_step;
        }

        if jumped {
            world.send_event(MovementSound::Jump);
        }
        if stepped {
            world.send_event(MovementSound::Footstep);
        }
    }
}

/// Apply the integrated velocity through the move primitive and resolve
/// mid-move impacts.
///
/// The capsule is captured before the move; an independent advisory sweep
/// along the intended motion detects a collision, records the pre-impact
/// velocity for external consumers, and projects the velocity onto the
/// hit surface so the into-surface component is removed.
pub fn resolve_displacement<B: FpsPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(Entity, CharacterBody, EnvironmentState)> = world
        .query::<(Entity, &CharacterBody, &EnvironmentState, &MovementState)>()
        .iter(world)
        .map(|(e, body, env, _)| (e, *body, *env))
        .collect();

    for (entity, body, env) in entities {
        if env.movement_blocked {
            continue;
        }

        let Some(state) = world.get::<MovementState>(entity).cloned() else {
            continue;
        };
        let mut velocity = state.velocity;

        let position = B::get_position(world, entity);
        let groups = B::get_collision_groups(world, entity);
        let capsule = Capsule::from_body(position, &body);

        B::move_character(world, entity, velocity * dt);

        let mut impact_velocity = Vec3::ZERO;
        if let Some(direction) = velocity.try_normalize() {
            if let Some(hit) = B::capsule_cast(
                world,
                &capsule,
                direction,
                velocity.length() * dt,
                entity,
                groups,
            ) {
                impact_velocity = velocity;
                velocity = project_on_plane(velocity, hit.normal);
            }
        }

        if let Some(mut state) = world.get_mut::<MovementState>(entity) {
            state.last_impact_velocity = impact_velocity;
            state.velocity = velocity;
        }
    }
}

/// Integrate look input: yaw on the character's own transform, clamped
/// pitch on the separate head transform.
///
/// Splitting the axes across two transforms keeps the body free of roll
/// artifacts. Pure per-tick integration with a saturating clamp, no
/// smoothing, independent of the locomotion state machine.
pub fn apply_look(
    time: Res<Time>,
    mut q_controllers: Query<(
        &mut Transform,
        &FpsIntent,
        &ControllerConfig,
        &EnvironmentState,
        &mut MovementState,
        Option<&CharacterHead>,
    )>,
    mut q_heads: Query<&mut Transform, Without<MovementState>>,
) {
    let dt = time.delta_secs();

    for (mut transform, intent, config, env, mut state, head) in &mut q_controllers {
        if env.look_blocked {
            continue;
        }

        let look = intent.look_input() * (dt * config.rotation_speed);

        transform.rotate_y(-look.x);

        state.vertical_angle = (state.vertical_angle - look.y).clamp(
            -config.vertical_look_limit,
            config.vertical_look_limit,
        );

        if let Some(head) = head {
            if let Ok(mut head_transform) = q_heads.get_mut(head.0) {
                // Positive vertical angle tilts the view down.
                head_transform.rotation = Quat::from_rotation_x(-state.vertical_angle);
            }
        }
    }
}

/// Sync the `Grounded`/`Airborne` marker components from `MovementState`.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &MovementState, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, state, has_grounded, has_airborne) in &q_controllers {
        if state.grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !state.grounded && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}
