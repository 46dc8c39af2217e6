//! Animation sync: state → именованный клип для внешнего рендера.
//!
//! Симуляция headless и сама ничего не проигрывает; она лишь публикует
//! `AnimationRequest` события, ключованные именем клипа. Запрос уходит
//! ровно один раз на смену состояния (переходы, не снапшоты) — внешний
//! слой может безопасно рестартовать клип на каждое событие.
//!
//! Attack — исключение: клип ключуется слотом атаки и отправляется
//! state machine'ой в момент старта удара (см. try_start_attack).

use bevy::prelude::*;

use crate::combat::{FighterState, StateKind};
use crate::components::{Active, Disabled};
use crate::SimSet;

/// Режим проигрывания клипа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PlayMode {
    Loop,
    Once,
}

/// Запрос внешнему рендеру: проиграть клип на бойце
#[derive(Event, Debug, Clone)]
pub struct AnimationRequest {
    pub entity: Entity,
    pub clip: &'static str,
    pub mode: PlayMode,
}

/// Последнее состояние, о котором рендер был уведомлён
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct LastSyncedState(pub Option<StateKind>);

/// Generic клип для состояния (Attack ключуется слотом, не здесь)
pub fn clip_for_state(kind: StateKind) -> Option<(&'static str, PlayMode)> {
    match kind {
        StateKind::Idle => Some(("idle", PlayMode::Loop)),
        StateKind::Walk => Some(("walk", PlayMode::Loop)),
        StateKind::Jump => Some(("jump", PlayMode::Once)),
        StateKind::Fall => Some(("fall", PlayMode::Loop)),
        StateKind::Dash => Some(("dash", PlayMode::Once)),
        StateKind::Hitstun => Some(("hitstun", PlayMode::Once)),
        StateKind::Ko => Some(("ko", PlayMode::Once)),
        StateKind::Attack => None,
    }
}

/// System: публикация AnimationRequest на каждую смену состояния
pub fn sync_animation(
    mut fighters: Query<
        (Entity, &FighterState, &mut LastSyncedState),
        (With<Active>, Without<Disabled>),
    >,
    mut events: EventWriter<AnimationRequest>,
) {
    for (entity, state, mut synced) in fighters.iter_mut() {
        let kind = state.kind();
        if synced.0 == Some(kind) {
            continue;
        }
        synced.0 = Some(kind);

        if let Some((clip, mode)) = clip_for_state(kind) {
            events.write(AnimationRequest { entity, clip, mode });
        }
    }
}

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AnimationRequest>()
            .add_systems(FixedUpdate, sync_animation.in_set(SimSet::Sync));
    }
}
