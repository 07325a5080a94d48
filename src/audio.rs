//! Audio cue boundary.
//!
//! The controller never plays clips itself. It emits fire-and-forget
//! [`MovementSound`] events; the game's audio layer maps each cue to a
//! loaded clip and plays it one-shot. Cues are ordered only by emission
//! order within a tick.

use bevy::prelude::*;

/// Discrete audio cue produced by the movement simulation.
#[derive(Event, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementSound {
    /// Footstep cadence crossed the speed-scaled step distance.
    Footstep,
    /// A jump impulse was applied.
    Jump,
    /// Re-grounded after being airborne longer than the debounce window.
    Land,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_are_distinct() {
        assert_ne!(MovementSound::Footstep, MovementSound::Jump);
        assert_ne!(MovementSound::Jump, MovementSound::Land);
    }
}
