//! Controller configuration components.
//!
//! This module defines the tuning parameters for the first-person controller:
//! movement speeds and accelerations, gravity, jump, grounding probe
//! distances, audio cadence, the character's capsule dimensions, and the
//! externally driven environment flags with their multiplicative modifiers.

use bevy::prelude::*;

/// Static capsule dimensions for a character.
///
/// The character origin sits at its feet; the live [`crate::collision::Capsule`]
/// is rebuilt from these dimensions and the current position every tick.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CharacterBody {
    /// Capsule radius.
    pub radius: f32,
    /// Total capsule height, feet to crown.
    pub height: f32,
    /// Contact buffer between "touching" and "just above" a surface.
    /// Hits within this distance never trigger a downward snap.
    pub skin_width: f32,
    /// Maximum ledge height that is climbed automatically instead of
    /// blocking horizontal motion.
    pub step_offset: f32,
    /// Maximum walkable slope angle in radians, measured from world-up.
    /// The boundary is strict: a surface at exactly this angle is not walkable.
    pub slope_limit: f32,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 1.8,
            skin_width: 0.08,
            step_offset: 0.3,
            slope_limit: 45f32.to_radians(),
        }
    }
}

impl CharacterBody {
    /// Builder: set radius and height.
    pub fn with_size(mut self, radius: f32, height: f32) -> Self {
        self.radius = radius;
        self.height = height;
        self
    }

    /// Builder: set the skin width.
    pub fn with_skin_width(mut self, skin_width: f32) -> Self {
        self.skin_width = skin_width;
        self
    }

    /// Builder: set the maximum automatic step height.
    pub fn with_step_offset(mut self, step_offset: f32) -> Self {
        self.step_offset = step_offset;
        self
    }

    /// Builder: set the maximum walkable slope angle (radians).
    pub fn with_slope_limit(mut self, slope_limit: f32) -> Self {
        self.slope_limit = slope_limit;
        self
    }
}

/// Tuning parameters for the first-person controller.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Safety ===
    /// World-space height below which the character is teleported back
    /// to `respawn_point`.
    pub kill_height: f32,
    /// Recovery position used by the kill-plane check.
    pub respawn_point: Vec3,

    // === Ground Movement ===
    /// Acceleration toward the target velocity while grounded (units/s^2).
    /// Also scales the slope-friction bleed on unwalkable faces.
    pub ground_acceleration: f32,
    /// Maximum ground speed before modifiers (units/s).
    pub max_ground_speed: f32,

    // === Air Movement ===
    /// Horizontal acceleration from input while airborne (units/s^2).
    pub air_acceleration: f32,
    /// Horizontal speed cap while airborne, before modifiers (units/s).
    pub max_air_speed: f32,
    /// Downward acceleration while airborne (units/s^2).
    pub gravity: f32,

    // === Jump ===
    /// Vertical velocity applied by a jump, before modifiers (units/s).
    pub jump_speed: f32,
    /// Window after a jump during which re-grounding is suppressed (seconds).
    pub jump_grace: f32,

    // === Grounding Probes ===
    /// Downward probe distance beyond the skin width while grounded.
    pub ground_probe_grounded: f32,
    /// Downward probe distance while airborne.
    pub ground_probe_airborne: f32,

    // === Look ===
    /// Scale applied to look input per second.
    pub rotation_speed: f32,
    /// Pitch clamp, radians either side of level.
    pub vertical_look_limit: f32,

    // === Audio Cadence ===
    /// Minimum airborne duration before a landing cue fires (seconds).
    pub land_debounce: f32,
    /// Distance travelled between footstep cues at modifier 1.0.
    pub base_step_distance: f32,

    // === Modifiers ===
    /// Ground speed multiplier while sprint is held.
    pub sprint_multiplier: f32,
    /// Gravity multiplier while the gravity power-up is active.
    pub gravity_power_up_multiplier: f32,
    /// Speed multiplier while the sprint power-up is active.
    pub sprint_power_up_multiplier: f32,
    /// Speed multiplier while on water.
    pub water_speed_multiplier: f32,
    /// Jump velocity multiplier while on water.
    pub water_jump_multiplier: f32,
    /// Gravity multiplier while on water.
    pub water_gravity_multiplier: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kill_height: -50.0,
            respawn_point: Vec3::Y,

            ground_acceleration: 50.0,
            max_ground_speed: 10.0,

            air_acceleration: 8.0,
            max_air_speed: 10.0,
            gravity: 20.0,

            jump_speed: 8.0,
            jump_grace: 0.2,

            ground_probe_grounded: 0.05,
            ground_probe_airborne: 0.07,

            rotation_speed: 5.0,
            vertical_look_limit: 89f32.to_radians(),

            land_debounce: 0.3,
            base_step_distance: 3.5,

            sprint_multiplier: 1.5,
            gravity_power_up_multiplier: 0.5,
            sprint_power_up_multiplier: 1.5,
            water_speed_multiplier: 0.3,
            water_jump_multiplier: 0.3,
            water_gravity_multiplier: 0.3,
        }
    }
}

impl ControllerConfig {
    /// Create a config with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set ground and air speed caps.
    pub fn with_speeds(mut self, ground: f32, air: f32) -> Self {
        self.max_ground_speed = ground;
        self.max_air_speed = air;
        self
    }

    /// Builder: set ground and air acceleration.
    pub fn with_acceleration(mut self, ground: f32, air: f32) -> Self {
        self.ground_acceleration = ground;
        self.air_acceleration = air;
        self
    }

    /// Builder: set gravity.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set jump speed.
    pub fn with_jump_speed(mut self, speed: f32) -> Self {
        self.jump_speed = speed;
        self
    }

    /// Builder: set the kill plane and recovery point.
    pub fn with_kill_plane(mut self, height: f32, respawn: Vec3) -> Self {
        self.kill_height = height;
        self.respawn_point = respawn;
        self
    }

    /// Environment speed modifier: water and sprint power-up, without the
    /// held-sprint multiplier. This is the factor used while airborne.
    pub fn environment_speed_modifier(&self, env: &EnvironmentState) -> f32 {
        let water = if env.on_water {
            self.water_speed_multiplier
        } else {
            1.0
        };
        let power_up = if env.sprint_power_up {
            self.sprint_power_up_multiplier
        } else {
            1.0
        };
        water * power_up
    }

    /// Full ground speed modifier: held sprint composed with the
    /// environment factors. Composition is multiplicative, never additive.
    pub fn speed_modifier(&self, env: &EnvironmentState, sprinting: bool) -> f32 {
        let sprint = if sprinting { self.sprint_multiplier } else { 1.0 };
        sprint * self.environment_speed_modifier(env)
    }

    /// Gravity modifier: water gravity composed with the gravity power-up.
    pub fn gravity_modifier(&self, env: &EnvironmentState) -> f32 {
        let water = if env.on_water {
            self.water_gravity_multiplier
        } else {
            1.0
        };
        let power_up = if env.gravity_power_up {
            self.gravity_power_up_multiplier
        } else {
            1.0
        };
        water * power_up
    }

    /// Jump velocity modifier (water only).
    pub fn jump_modifier(&self, env: &EnvironmentState) -> f32 {
        if env.on_water {
            self.water_jump_multiplier
        } else {
            1.0
        }
    }

    /// Distance the footstep accumulator must cross before the next cue,
    /// for a given speed modifier. Faster movement means a shorter interval.
    pub fn step_distance(&self, speed_modifier: f32) -> f32 {
        self.base_step_distance / speed_modifier
    }
}

/// Externally settable per-tick flags.
///
/// Game systems write these; the controller only reads them. All modifiers
/// derived from them are fixed multiplicative constants on [`ControllerConfig`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct EnvironmentState {
    /// Character is on water: dampens speed, jump and gravity.
    pub on_water: bool,
    /// Low-gravity power-up is active.
    pub gravity_power_up: bool,
    /// Sprint power-up is active.
    pub sprint_power_up: bool,
    /// Suppresses locomotion and displacement entirely for the tick.
    pub movement_blocked: bool,
    /// Suppresses look integration for the tick.
    pub look_blocked: bool,
}

/// Reference to the head entity that receives pitch.
///
/// Yaw rotates the character's own transform; pitch is applied to this
/// separate transform so the body never rolls.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CharacterHead(pub Entity);

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== CharacterBody Tests ====================

    #[test]
    fn body_default_dimensions() {
        let body = CharacterBody::default();
        assert_eq!(body.radius, 0.5);
        assert_eq!(body.height, 1.8);
        assert!((body.slope_limit - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn body_builders() {
        let body = CharacterBody::default()
            .with_size(0.4, 2.0)
            .with_skin_width(0.05)
            .with_step_offset(0.4)
            .with_slope_limit(1.0);
        assert_eq!(body.radius, 0.4);
        assert_eq!(body.height, 2.0);
        assert_eq!(body.skin_width, 0.05);
        assert_eq!(body.step_offset, 0.4);
        assert_eq!(body.slope_limit, 1.0);
    }

    // ==================== Modifier Composition Tests ====================

    #[test]
    fn gravity_modifier_is_product_of_factors() {
        let config = ControllerConfig::default();

        for (on_water, power_up) in [(false, false), (true, false), (false, true), (true, true)] {
            let env = EnvironmentState {
                on_water,
                gravity_power_up: power_up,
                ..Default::default()
            };
            let water = if on_water {
                config.water_gravity_multiplier
            } else {
                1.0
            };
            let boost = if power_up {
                config.gravity_power_up_multiplier
            } else {
                1.0
            };
            assert_eq!(config.gravity_modifier(&env), water * boost);
        }
    }

    #[test]
    fn speed_modifier_composes_sprint_water_and_power_up() {
        let config = ControllerConfig::default();
        let env = EnvironmentState {
            on_water: true,
            sprint_power_up: true,
            ..Default::default()
        };

        let expected = config.sprint_multiplier
            * config.water_speed_multiplier
            * config.sprint_power_up_multiplier;
        assert!((config.speed_modifier(&env, true) - expected).abs() < 1e-6);

        // Held sprint is excluded from the airborne factor.
        let airborne = config.water_speed_multiplier * config.sprint_power_up_multiplier;
        assert!((config.environment_speed_modifier(&env) - airborne).abs() < 1e-6);
    }

    #[test]
    fn speed_modifier_identity_without_flags() {
        let config = ControllerConfig::default();
        let env = EnvironmentState::default();
        assert_eq!(config.speed_modifier(&env, false), 1.0);
        assert_eq!(config.gravity_modifier(&env), 1.0);
        assert_eq!(config.jump_modifier(&env), 1.0);
    }

    #[test]
    fn step_distance_halves_when_modifier_doubles() {
        let config = ControllerConfig::default();
        let base = config.step_distance(1.0);
        assert_eq!(config.step_distance(2.0), base / 2.0);
    }

    #[test]
    fn jump_modifier_water_only() {
        let config = ControllerConfig::default();
        let env = EnvironmentState {
            on_water: true,
            ..Default::default()
        };
        assert_eq!(config.jump_modifier(&env), config.water_jump_multiplier);
    }
}
