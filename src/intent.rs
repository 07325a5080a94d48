//! Input intent component.
//!
//! [`FpsIntent`] is the boundary between device input and the controller.
//! Your input layer writes raw values into it every frame; the controller
//! systems only ever read the filtered accessors. Edge-triggered actions
//! (jump, interact, inspect) are latched once per fixed tick.

use bevy::prelude::*;

/// Platform-dependent input scaling, selected once at startup.
///
/// Browser builds receive a lower look sensitivity than desktop builds;
/// picking the profile at construction time replaces any build-target
/// branching in the input layer.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct InputProfile {
    /// Multiplier applied to raw look input.
    pub look_sensitivity: f32,
    /// Magnitude cap for the move vector (diagonal clamp).
    pub max_move_magnitude: f32,
}

impl Default for InputProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

impl InputProfile {
    /// Profile for desktop builds.
    pub fn desktop() -> Self {
        Self {
            look_sensitivity: 0.5,
            max_move_magnitude: 1.0,
        }
    }

    /// Profile for browser/embedded builds, where pointer deltas arrive
    /// at a different scale.
    pub fn browser() -> Self {
        Self {
            look_sensitivity: 0.25,
            max_move_magnitude: 1.0,
        }
    }
}

/// Per-character input intent.
///
/// Writers push raw values with the `set_*` methods; the controller reads
/// the accessors, which apply the diagonal clamp, the sensitivity profile,
/// and the lock flag.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct FpsIntent {
    /// Active platform profile.
    pub profile: InputProfile,
    /// When set, move input and edge-triggered actions read as inactive.
    /// Look is unaffected; use `EnvironmentState::look_blocked` for that.
    pub locked: bool,

    move_input: Vec2,
    look_input: Vec2,
    sprint: bool,

    jump_pressed: bool,
    pub(crate) jump_pressed_prev: bool,
    interact_pressed: bool,
    pub(crate) interact_pressed_prev: bool,
    inspect_pressed: bool,
    pub(crate) inspect_pressed_prev: bool,
}

impl Default for FpsIntent {
    fn default() -> Self {
        Self::new(InputProfile::default())
    }
}

impl FpsIntent {
    /// Create an empty intent with the given platform profile.
    pub fn new(profile: InputProfile) -> Self {
        Self {
            profile,
            locked: false,
            move_input: Vec2::ZERO,
            look_input: Vec2::ZERO,
            sprint: false,
            jump_pressed: false,
            jump_pressed_prev: false,
            interact_pressed: false,
            interact_pressed_prev: false,
            inspect_pressed: false,
            inspect_pressed_prev: false,
        }
    }

    /// Set the raw move vector. The diagonal clamp is applied here so the
    /// controller always sees a magnitude-limited vector.
    pub fn set_move(&mut self, raw: Vec2) {
        self.move_input = raw.clamp_length_max(self.profile.max_move_magnitude);
    }

    /// Move vector: x is strafe, y is forward. Zero while locked.
    pub fn move_input(&self) -> Vec2 {
        if self.locked {
            Vec2::ZERO
        } else {
            self.move_input
        }
    }

    /// Set the raw look delta; the profile sensitivity is applied here.
    pub fn set_look(&mut self, raw: Vec2) {
        self.look_input = raw * self.profile.look_sensitivity;
    }

    /// Sensitivity-scaled look delta.
    pub fn look_input(&self) -> Vec2 {
        self.look_input
    }

    /// Set whether sprint is currently held.
    pub fn set_sprint(&mut self, held: bool) {
        self.sprint = held;
    }

    /// Whether sprint is held. Sprint is a hold, not an edge.
    pub fn sprinting(&self) -> bool {
        self.sprint
    }

    /// Set whether the jump action is currently down. Call every frame;
    /// the controller detects the rising edge itself.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// True only on the tick the jump action went down.
    pub fn jump_started(&self) -> bool {
        !self.locked && self.jump_pressed && !self.jump_pressed_prev
    }

    /// Set whether the interact action is currently down.
    pub fn set_interact_pressed(&mut self, pressed: bool) {
        self.interact_pressed = pressed;
    }

    /// True only on the tick the interact action went down.
    pub fn interact_started(&self) -> bool {
        !self.locked && self.interact_pressed && !self.interact_pressed_prev
    }

    /// Set whether the inspect action is currently down.
    pub fn set_inspect_pressed(&mut self, pressed: bool) {
        self.inspect_pressed = pressed;
    }

    /// True only on the tick the inspect action went down.
    pub fn inspect_started(&self) -> bool {
        !self.locked && self.inspect_pressed && !self.inspect_pressed_prev
    }

    /// Latch the edge-detection state. Called once per fixed tick by the
    /// controller, after all systems have read the intent.
    pub(crate) fn latch_edges(&mut self) {
        self.jump_pressed_prev = self.jump_pressed;
        self.interact_pressed_prev = self.interact_pressed;
        self.inspect_pressed_prev = self.inspect_pressed;
    }
}

/// Latch input edges at the end of each fixed tick.
pub fn latch_input_edges(mut q: Query<&mut FpsIntent>) {
    for mut intent in &mut q {
        intent.latch_edges();
    }
}
