//! RINGSIDE Simulation Core
//!
//! Детерминированное headless-ядро дуэльного 2D-файтинга на Bevy 0.16.
//! Рендер, физический движок и чтение клавиатуры живут во внешнем хосте;
//! ядро владеет состоянием боя и общается событиями (AnimationRequest,
//! DamageDealt, FighterKo) и ресурсами (FighterRegistry, DebugOverlay).
//!
//! Контракт детерминизма: одинаковые конфиги + одинаковая последовательность
//! InputFrame → побитово одинаковый ход боя. Всё тикается в FixedUpdate
//! (60 Hz), порядок фаз фиксирован через SimSet.

use bevy::prelude::*;

// Публичные модули
pub mod animation;
pub mod combat;
pub mod components;
pub mod config;
pub mod debug_draw;
pub mod logger;
pub mod physics;
pub mod registry;
pub mod validation;

// Re-export базовых типов для удобства
pub use animation::{AnimationPlugin, AnimationRequest, LastSyncedState, PlayMode};
pub use combat::{
    ActiveAttack, AttackData, AttackSet, AttackSlot, CombatPlugin, DamageDealt, DebugDamage,
    FighterKo, FighterState, HitLanded, StateKind,
};
pub use components::*;
pub use config::{spawn_fighter, FighterConfig};
pub use debug_draw::{DebugOverlay, DebugShape};
pub use logger::init_logger;
pub use physics::PhysicsPlugin;
pub use registry::FighterRegistry;
pub use validation::{validate_fighter, ValidationError};

/// Частота simulation tick (Hz)
pub const SIM_TICK_HZ: f64 = 60.0;

/// Фазы simulation tick. Порядок фиксирован и является контрактом:
/// activate → probe → logic → combat → physics → sync.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Validation Gate + уборка реестра
    Activate,
    /// Ground probe
    Probe,
    /// State machine переходы
    Logic,
    /// Attack lifecycle + hit detection + damage
    Combat,
    /// Velocity + интеграция Transform
    Physics,
    /// Animation sync, debug overlay, сброс one-shot input
    Sync,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(SIM_TICK_HZ))
            .init_resource::<FighterRegistry>()
            .init_resource::<DebugOverlay>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Activate,
                    SimSet::Probe,
                    SimSet::Logic,
                    SimSet::Combat,
                    SimSet::Physics,
                    SimSet::Sync,
                )
                    .chain(),
            )
            .add_plugins((CombatPlugin, PhysicsPlugin, AnimationPlugin))
            .add_systems(
                FixedUpdate,
                debug_draw::refresh_debug_overlay.in_set(SimSet::Sync),
            );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);
    app
}

/// Snapshot боевого состояния мира для сравнения детерминизма:
/// HP, state и позиция каждого бойца, отсортированные по Entity ID.
pub fn combat_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &Health, &FighterState, &Transform)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, ..)| entity.index());

    for (entity, health, state, transform) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(&health.current().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", state).as_bytes());
        snapshot.extend_from_slice(&transform.translation.x.to_le_bytes());
        snapshot.extend_from_slice(&transform.translation.y.to_le_bytes());
    }

    snapshot
}
