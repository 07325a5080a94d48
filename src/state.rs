//! Movement state and marker components.
//!
//! [`MovementState`] is owned exclusively by the controller systems and
//! mutated once per fixed tick; other systems may only read it. The marker
//! components mirror its grounded flag for ergonomic queries.

use bevy::prelude::*;

/// Per-character movement state.
///
/// Created once when the controller is spawned and alive for its whole
/// lifetime. The vertical velocity component only ever changes through
/// gravity, the jump impulse, the slope-friction bleed, or projection onto
/// a collision normal.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct MovementState {
    /// Current linear velocity, world space.
    pub velocity: Vec3,
    /// True iff the grounding classifier found a walkable surface or a
    /// climbable step this tick.
    pub grounded: bool,
    /// Normal of the current ground contact; world-up while airborne.
    pub ground_normal: Vec3,
    /// Clamped pitch accumulator. Positive tilts the view down.
    pub vertical_angle: f32,
    /// Tick time at which the character last left the ground.
    /// Drives the landing-cue debounce.
    pub left_ground_at: f32,
    /// Tick time of the last jump impulse. The grounding classifier's
    /// grace gate reads this to suppress immediate re-grounding.
    pub last_jump_at: f32,
    /// Transient friction scalar in `[0, 1]` from ground-normal tilt,
    /// applied only while ascending an unwalkable slope.
    pub slope_friction: f32,
    /// Footstep cadence accumulator; reset whenever it crosses the
    /// speed-scaled step distance.
    pub distance_since_step: f32,
    /// Velocity at the moment of the most recent mid-move collision;
    /// zero on ticks without one.
    pub last_impact_velocity: Vec3,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            grounded: true,
            ground_normal: Vec3::Y,
            vertical_angle: 0.0,
            left_ground_at: f32::NEG_INFINITY,
            last_jump_at: f32::NEG_INFINITY,
            slope_friction: 0.0,
            distance_since_step: 0.0,
            last_impact_velocity: Vec3::ZERO,
        }
    }
}

impl MovementState {
    /// Create the initial state: grounded, at rest, ground normal up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal (XZ-plane) component of the velocity.
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    /// Whether the re-grounding grace gate is open at `now`.
    pub fn grounding_gate_open(&self, now: f32, jump_grace: f32) -> bool {
        now > self.last_jump_at + jump_grace
    }

    /// Whether a landing at `now` has been airborne long enough to
    /// produce a landing cue.
    pub fn landing_debounce_elapsed(&self, now: f32, debounce: f32) -> bool {
        now > self.left_ground_at + debounce
    }
}

/// Marker component indicating the character is grounded.
///
/// Added automatically when the grounding classifier accepts a surface.
/// Mutually exclusive with [`Airborne`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Added automatically when the character leaves ground contact.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
