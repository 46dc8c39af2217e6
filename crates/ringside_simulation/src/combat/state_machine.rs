//! Combat State Machine бойца.
//!
//! # States
//!
//! `Idle, Walk, Jump, Fall, Dash, Attack, Hitstun, Ko`
//! Начальное состояние Idle; Ko терминально (из него переходов нет).
//!
//! # Tick flow
//!
//! Переходы оцениваются один раз за logic tick в приоритетном порядке
//! (dash > jump > attack > walk/idle). Attack-lifecycle после старта
//! ведёт `update_active_attacks` (combat/hit_detection.rs); Hitstun
//! ставится resolve_hits'ом при попадании.
//!
//! Приоритет одновременных атак: heavy > medium > light.
//! Dash-cancel: атака прерывает Dash до истечения таймера.
//! Air attacks: из Jump/Fall атака разрешена, по завершении боец
//! выходит в Fall (до приземления остаётся в воздушной ветке).

use bevy::prelude::*;

use crate::animation::{AnimationRequest, PlayMode};
use crate::combat::{ActiveAttack, AttackSet, AttackSlot};
use crate::components::{
    Active, Disabled, Facing, Grounded, InputFrame, MovementTunables, PhysicsBody, GRAVITY,
};

/// Deadzone горизонтального input (Walk против Idle)
pub const INPUT_DEADZONE: f32 = 0.1;

/// Состояние бойца. Ровно одно в любой момент времени;
/// `ActiveAttack` присутствует ⇔ состояние Attack.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum FighterState {
    /// Стоит на земле без input
    Idle,
    /// Горизонтальное движение по земле
    Walk,
    /// Подъём после прыжка (до velocity-zero crossing)
    Jump,
    /// Падение (или сход с края)
    Fall,
    /// Рывок фиксированной длительности; input движения игнорируется
    Dash { time_left: f32 },
    /// Выполняет атаку (см. ActiveAttack)
    Attack,
    /// Принудительная потеря контроля после пропущенного удара
    Hitstun { remaining: f32 },
    /// Нокаут — терминальное состояние
    Ko,
}

impl Default for FighterState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Дискриминант состояния (для animation sync и read-only запросов AI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StateKind {
    Idle,
    Walk,
    Jump,
    Fall,
    Dash,
    Attack,
    Hitstun,
    Ko,
}

impl FighterState {
    pub fn kind(&self) -> StateKind {
        match self {
            FighterState::Idle => StateKind::Idle,
            FighterState::Walk => StateKind::Walk,
            FighterState::Jump => StateKind::Jump,
            FighterState::Fall => StateKind::Fall,
            FighterState::Dash { .. } => StateKind::Dash,
            FighterState::Attack => StateKind::Attack,
            FighterState::Hitstun { .. } => StateKind::Hitstun,
            FighterState::Ko => StateKind::Ko,
        }
    }

    /// Walk при |axis| > deadzone, иначе Idle
    pub fn grounded_stance(axis: f32) -> Self {
        if axis.abs() > INPUT_DEADZONE {
            FighterState::Walk
        } else {
            FighterState::Idle
        }
    }

    /// Выход из таймерного состояния: на земле → Idle/Walk, в воздухе → Fall
    pub fn landing_state(grounded: bool, axis: f32) -> Self {
        if grounded {
            Self::grounded_stance(axis)
        } else {
            FighterState::Fall
        }
    }
}

/// Импульс прыжка: apex ровно на jump_height при эффективной гравитации g_eff.
///
/// None если g_eff ≤ 0 — fatal config error для этого бойца.
pub fn jump_impulse(gravity_scale: f32, jump_height: f32) -> Option<f32> {
    let g_eff = GRAVITY * gravity_scale;
    if g_eff <= 0.0 {
        return None;
    }
    Some((2.0 * g_eff * jump_height).sqrt())
}

/// System: переходы state machine, один раз за logic tick.
pub fn tick_state_machines(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut fighters: Query<
        (
            Entity,
            &mut FighterState,
            &mut Facing,
            &mut PhysicsBody,
            &InputFrame,
            &Grounded,
            &MovementTunables,
            &AttackSet,
        ),
        (With<Active>, Without<Disabled>),
    >,
    mut anim_events: EventWriter<AnimationRequest>,
) {
    let dt = time.delta_secs();

    for (entity, mut state, mut facing, mut body, input, grounded, tunables, attacks) in
        fighters.iter_mut()
    {
        // Facing — от последнего ненулевого горизонтального input.
        // Dash/Attack/Hitstun/Ko фиксируют направление.
        if matches!(
            *state,
            FighterState::Idle | FighterState::Walk | FighterState::Jump | FighterState::Fall
        ) {
            let axis = input.axis();
            if axis > INPUT_DEADZONE {
                facing.right = true;
            } else if axis < -INPUT_DEADZONE {
                facing.right = false;
            }
        }

        let axis = input.axis();
        let next = match &mut *state {
            // Терминальное: никаких переходов
            FighterState::Ko => continue,

            // Lifecycle атаки ведёт update_active_attacks
            FighterState::Attack => continue,

            FighterState::Hitstun { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    Some(FighterState::landing_state(grounded.0, axis))
                } else {
                    None
                }
            }

            FighterState::Dash { time_left } => {
                // Dash-cancel: атака прерывает рывок
                if let Some(slot) = input.pressed_attack() {
                    try_start_attack(&mut commands, entity, slot, attacks, &mut anim_events)
                } else {
                    *time_left -= dt;
                    if *time_left <= 0.0 {
                        Some(FighterState::landing_state(grounded.0, axis))
                    } else {
                        None
                    }
                }
            }

            FighterState::Idle | FighterState::Walk => {
                if input.dash {
                    Some(FighterState::Dash {
                        time_left: tunables.dash_duration,
                    })
                } else if input.jump && grounded.0 {
                    match jump_impulse(tunables.gravity_scale, tunables.jump_height) {
                        Some(v0) => {
                            body.velocity.y = v0;
                            Some(FighterState::Jump)
                        }
                        None => {
                            disable_fighter(
                                &mut commands,
                                entity,
                                "effective gravity is non-positive, jump impulse undefined",
                            );
                            continue;
                        }
                    }
                } else if let Some(slot) = input.pressed_attack() {
                    try_start_attack(&mut commands, entity, slot, attacks, &mut anim_events)
                } else {
                    Some(FighterState::grounded_stance(axis))
                }
            }

            FighterState::Jump => {
                if let Some(slot) = input.pressed_attack() {
                    try_start_attack(&mut commands, entity, slot, attacks, &mut anim_events)
                } else if body.velocity.y <= 0.0 {
                    // Velocity-zero crossing: апекс пройден
                    if grounded.0 {
                        Some(FighterState::grounded_stance(axis))
                    } else {
                        Some(FighterState::Fall)
                    }
                } else {
                    None
                }
            }

            FighterState::Fall => {
                if let Some(slot) = input.pressed_attack() {
                    try_start_attack(&mut commands, entity, slot, attacks, &mut anim_events)
                } else if grounded.0 {
                    Some(FighterState::grounded_stance(axis))
                } else {
                    None
                }
            }
        };

        if let Some(next) = next {
            *state = next;
        }
    }
}

/// Запуск атаки. Frame data перепроверяется в момент использования:
/// невалидные данные (мутация в рантайме) → fail-fast отключение бойца,
/// а не тихое игнорирование.
fn try_start_attack(
    commands: &mut Commands,
    entity: Entity,
    slot: AttackSlot,
    attacks: &AttackSet,
    anim_events: &mut EventWriter<AnimationRequest>,
) -> Option<FighterState> {
    let attack = attacks.get(slot);
    if let Err(err) = attack.validate() {
        disable_fighter(
            commands,
            entity,
            &format!("{:?} attack data invalid at point of use: {}", slot, err),
        );
        return None;
    }

    commands.entity(entity).insert(ActiveAttack::new(slot));

    // Атакующий клип ключуется слотом, не generic state-маппингом
    anim_events.write(AnimationRequest {
        entity,
        clip: slot.clip_name(),
        mode: PlayMode::Once,
    });

    crate::logger::log(&format!(
        "⚔️ Attack `{}` started ({:?}, {:?})",
        attack.name, slot, entity
    ));

    Some(FighterState::Attack)
}

fn disable_fighter(commands: &mut Commands, entity: Entity, reason: &str) {
    commands.entity(entity).insert(Disabled);
    crate::logger::log_error(&format!(
        "❌ Fighter {:?} permanently disabled: {}",
        entity, reason
    ));
}
