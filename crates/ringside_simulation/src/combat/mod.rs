//! Combat domain: frame data, state machine, hit detection, damage.

pub mod attack;
pub mod hit_detection;
pub mod state_machine;

pub use attack::{ActiveAttack, AttackData, AttackSet, AttackSlot};
pub use hit_detection::{DamageDealt, DebugDamage, FighterKo, HitLanded};
pub use state_machine::{FighterState, StateKind, INPUT_DEADZONE};

use bevy::prelude::*;

use crate::components::flush_input_frames;
use crate::registry::remove_despawned_fighters;
use crate::validation::activate_fighters;
use crate::SimSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HitLanded>()
            .add_event::<DamageDealt>()
            .add_event::<FighterKo>()
            .add_event::<DebugDamage>()
            .add_systems(
                FixedUpdate,
                (activate_fighters, remove_despawned_fighters)
                    .chain()
                    .in_set(SimSet::Activate),
            )
            .add_systems(
                FixedUpdate,
                state_machine::tick_state_machines.in_set(SimSet::Logic),
            )
            .add_systems(
                FixedUpdate,
                (
                    hit_detection::update_active_attacks,
                    hit_detection::resolve_hits,
                    hit_detection::apply_debug_damage,
                )
                    .chain()
                    .in_set(SimSet::Combat),
            )
            .add_systems(FixedUpdate, flush_input_frames.in_set(SimSet::Sync));
    }
}
