//! # `fps_character_controller`
//!
//! A 3D first-person kinematic character controller with physics backend abstraction.
//!
//! This crate provides a fixed-timestep movement simulation that:
//! - Classifies the surface under the character each tick (walkable slope,
//!   climbable step, unwalkable face) via downward capsule sweeps
//! - Snaps the character onto walkable ground and up onto low steps
//! - Integrates velocity with separate ground and air branches, composing
//!   multiplicative water/power-up/sprint modifiers
//! - Resolves mid-move impacts by projecting velocity onto the hit surface
//! - Splits look across body yaw and head pitch with a saturating clamp
//! - Emits footstep, jump, and landing audio cues as events
//! - Abstracts the physics backend for easy swapping (Rapier3D included)
//!
//! ## Architecture
//!
//! The controller owns a [`state::MovementState`] per character and mutates
//! it exactly once per fixed tick, running five responsibilities in order:
//!
//! 1. Kill-plane safety check (teleport back above the world)
//! 2. Grounding classifier (capsule sweep down, classify, snap, land cue)
//! 3. Locomotion integrator (ground blend / air gravity, jump, footsteps)
//! 4. Displacement and impact resolver (move primitive + advisory sweep)
//! 5. Look controller (yaw on the body, clamped pitch on the head)
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use fps_character_controller::prelude::*;
//!
//! // Components for a player-controlled character
//! let state = MovementState::new();
//! let config = ControllerConfig::default();
//! let body = CharacterBody::default();
//! let intent = FpsIntent::new(InputProfile::desktop());
//!
//! // These are spawned as a bundle together with the backend's
//! // physics components.
//! ```

use bevy::prelude::*;

pub mod audio;
pub mod backend;
pub mod collision;
pub mod config;
pub mod detection;
pub mod intent;
pub mod outline;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::audio::MovementSound;
    pub use crate::backend::FpsPhysicsBackend;
    pub use crate::collision::{Capsule, CastHit};
    pub use crate::config::{CharacterBody, CharacterHead, ControllerConfig, EnvironmentState};
    pub use crate::intent::{FpsIntent, InputProfile};
    pub use crate::state::{Airborne, Grounded, MovementState};
    pub use crate::FpsControllerPlugin;

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// Main plugin for the first-person controller.
///
/// Generic over a physics backend `B` which provides capsule sweeps, the
/// collision-aware move primitive, and teleportation.
///
/// # Examples
///
/// With the Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use fps_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(FpsControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct FpsControllerPlugin<B: backend::FpsPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::FpsPhysicsBackend> Default for FpsControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::FpsPhysicsBackend> Plugin for FpsControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::CharacterBody>();
        app.register_type::<config::CharacterHead>();
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::EnvironmentState>();
        app.register_type::<intent::FpsIntent>();
        app.register_type::<state::MovementState>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.add_event::<audio::MovementSound>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // One full update per fixed tick, in a fixed order. The look
        // controller is independent of the locomotion state machine but
        // shares the chain so the whole tick stays exclusive.
        app.add_systems(
            FixedUpdate,
            (
                systems::respawn_below_kill_plane::<B>,
                systems::update_grounding::<B>,
                systems::apply_locomotion::<B>,
                systems::resolve_displacement::<B>,
                systems::apply_look,
                systems::sync_state_markers,
            )
                .chain(),
        );

        // Latch input edges once all systems have read the intent.
        app.add_systems(FixedPostUpdate, intent::latch_input_edges);
    }
}
