//! Validation Gate — одноразовая проверка конфигурации бойца при активации.
//!
//! Политика fail-fast: любой невалидный field → конкретный,
//! field-identified лог + перманентный `Disabled`. Частично
//! сконфигурированный боец никогда не бежит на дефолтах.
//!
//! Ошибки не пропагируются наружу как panic/Result API — единственный
//! наблюдаемый эффект это отключение бойца (health queries продолжают
//! отвечать последними известными значениями).

use bevy::prelude::*;
use thiserror::Error;

use crate::combat::{AttackSet, AttackSlot};
use crate::components::{Active, ControlBindings, Disabled, Fighter, Health, MovementTunables, PendingActivation};
use crate::registry::FighterRegistry;

/// Ошибка frame data одной атаки
#[derive(Debug, Error, PartialEq)]
pub enum AttackValidationError {
    #[error("attack name is empty")]
    EmptyName,
    #[error("startup must be > 0 (got {0})")]
    NonPositiveStartup(f32),
    #[error("active must be > 0 (got {0})")]
    NonPositiveActive(f32),
    #[error("recovery must be >= 0 (got {0})")]
    NegativeRecovery(f32),
    #[error("damage must be > 0")]
    ZeroDamage,
    #[error("hitstun must be > 0 (got {0})")]
    NonPositiveHitstun(f32),
    #[error("hitbox size must be > 0 on both axes (got {0} x {1})")]
    NonPositiveHitbox(f32, f32),
}

/// Ошибка конфигурации бойца (field-identified)
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("fighter name is empty")]
    EmptyName,
    #[error("input symbol `{0}` has no binding")]
    MissingBinding(&'static str),
    #[error("movement tunable `{field}` must be > 0 (got {value})")]
    NonPositiveTunable { field: &'static str, value: f32 },
    #[error("max HP must be > 0")]
    ZeroMaxHp,
    #[error("{slot:?} attack invalid: {source}")]
    InvalidAttack {
        slot: AttackSlot,
        source: AttackValidationError,
    },
}

/// Полная проверка бойца по всем обязательным полям
pub fn validate_fighter(
    fighter: &Fighter,
    bindings: &ControlBindings,
    tunables: &MovementTunables,
    health: &Health,
    attacks: &AttackSet,
) -> Result<(), ValidationError> {
    if fighter.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    for (symbol, binding) in bindings.entries() {
        if binding.is_empty() {
            return Err(ValidationError::MissingBinding(symbol));
        }
    }

    let positives = [
        ("move_speed", tunables.move_speed),
        ("jump_height", tunables.jump_height),
        ("gravity_scale", tunables.gravity_scale),
        ("fall_gravity_scale", tunables.fall_gravity_scale),
        ("dash_speed", tunables.dash_speed),
        ("dash_duration", tunables.dash_duration),
        ("air_control", tunables.air_control),
        ("ground_check_radius", tunables.ground_check_radius),
    ];
    for (field, value) in positives {
        if value <= 0.0 {
            return Err(ValidationError::NonPositiveTunable { field, value });
        }
    }

    if health.max() == 0 {
        return Err(ValidationError::ZeroMaxHp);
    }

    for attack in attacks.iter() {
        attack
            .validate()
            .map_err(|source| ValidationError::InvalidAttack {
                slot: attack.slot,
                source,
            })?;
    }

    Ok(())
}

/// System: Validation Gate.
///
/// Выполняется ровно один раз на бойца (маркер PendingActivation
/// снимается в обе стороны). Успех → `Active` + запись в реестр;
/// провал → `Disabled`, в реестр не попадает и больше не тикается.
pub fn activate_fighters(
    mut commands: Commands,
    mut registry: ResMut<FighterRegistry>,
    pending: Query<
        (
            Entity,
            &Fighter,
            &ControlBindings,
            &MovementTunables,
            &Health,
            &AttackSet,
        ),
        With<PendingActivation>,
    >,
) {
    for (entity, fighter, bindings, tunables, health, attacks) in pending.iter() {
        match validate_fighter(fighter, bindings, tunables, health, attacks) {
            Ok(()) => {
                commands
                    .entity(entity)
                    .remove::<PendingActivation>()
                    .insert(Active);
                registry.insert(entity);
                crate::logger::log_info(&format!(
                    "✅ Fighter `{}` activated ({:?}, {} HP)",
                    fighter.name,
                    entity,
                    health.max()
                ));
            }
            Err(err) => {
                commands
                    .entity(entity)
                    .remove::<PendingActivation>()
                    .insert(Disabled);
                crate::logger::log_error(&format!(
                    "❌ Fighter `{}` failed validation, permanently disabled: {}",
                    fighter.name, err
                ));
            }
        }
    }
}
