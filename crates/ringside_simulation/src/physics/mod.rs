//! Кастомная кинематика бойцов: state-driven velocity + ручная
//! интеграция в Transform. Полноценный физический движок здесь
//! не нужен — контракт детерминизма проще держать на своей интеграции.

pub mod movement;

pub use movement::{
    apply_state_velocity, circle_aabb_overlap, integrate_translation, move_toward, probe_ground,
    ATTACK_DRIFT_FACTOR, GROUND_ACCEL,
};

use bevy::prelude::*;

use crate::SimSet;

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, probe_ground.in_set(SimSet::Probe))
            .add_systems(
                FixedUpdate,
                (apply_state_velocity, integrate_translation)
                    .chain()
                    .in_set(SimSet::Physics),
            );
    }
}
