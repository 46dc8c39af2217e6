//! Hit detection & resolution.
//!
//! Двухпроходный pipeline (overlap → damage), как и весь combat:
//! 1. `update_active_attacks` — ведёт таймер атаки; в active-окне
//!    строит facing-flipped hitbox AABB и сканирует реестр бойцов,
//!    новые жертвы попадают в per-swing victim set + `HitLanded` event
//! 2. `resolve_hits` — применяет урон/KO/hitstun/knockback к жертве,
//!    генерирует `DamageDealt`/`FighterKo` для внешних потребителей
//!
//! Гарантия: один замах наносит урон каждой жертве максимум один раз,
//! сколько бы тиков ни перекрывался hitbox (victim set).

use bevy::prelude::*;

use crate::combat::{ActiveAttack, AttackSet, AttackSlot};
use crate::combat::state_machine::FighterState;
use crate::components::{Active, Disabled, Facing, Grounded, Health, Hurtbox, InputFrame, PhysicsBody};
use crate::registry::FighterRegistry;

/// Событие: hitbox замаха перекрыл нового противника (ещё без урона)
#[derive(Event, Debug, Clone)]
pub struct HitLanded {
    pub attacker: Entity,
    pub target: Entity,
    pub slot: AttackSlot,
    /// Урон атаки (до применения)
    pub damage: u32,
    /// Hitstun атаки (секунды)
    pub hitstun: f32,
    /// Knockback атаки (до facing-flip по X)
    pub knockback: Vec2,
    /// Знак facing атакующего в момент попадания
    pub facing_sign: f32,
}

/// Событие: урон применён к Health жертвы.
/// Используется UI, звуками, victory-чекерами.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_ko: bool,
}

/// Событие: боец нокаутирован (HP == 0)
#[derive(Event, Debug, Clone)]
pub struct FighterKo {
    pub entity: Entity,
    pub by: Option<Entity>,
}

/// Debug damage hook (только для тестов/отладки): снимает HP в обход
/// hit detection, но с тем же клампом 0..max и KO-переходом.
#[derive(Event, Debug, Clone)]
pub struct DebugDamage {
    pub target: Entity,
    pub amount: u32,
}

/// AABB-overlap двух прямоугольников (центр + half-extents)
pub fn aabb_overlap(center_a: Vec2, half_a: Vec2, center_b: Vec2, half_b: Vec2) -> bool {
    (center_a.x - center_b.x).abs() <= half_a.x + half_b.x
        && (center_a.y - center_b.y).abs() <= half_a.y + half_b.y
}

/// Knockback жертвы: X перезаписывается (со знаком facing атакующего),
/// Y только поднимается, никогда не опускается.
///
/// Асимметрия сохранена как наблюдаемое поведение (см. DESIGN.md).
pub fn knockback_velocity(current: Vec2, knockback: Vec2, facing_sign: f32) -> Vec2 {
    Vec2::new(knockback.x * facing_sign, current.y.max(knockback.y))
}

/// System: lifecycle активных атак + spatial query в active-окне.
pub fn update_active_attacks(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    registry: Res<FighterRegistry>,
    mut attackers: Query<
        (
            Entity,
            &mut ActiveAttack,
            &mut FighterState,
            &Transform,
            &Facing,
            &AttackSet,
            &Grounded,
            &InputFrame,
        ),
        (With<Active>, Without<Disabled>),
    >,
    targets: Query<(&Transform, &Hurtbox), (With<Active>, Without<Disabled>)>,
    mut hit_events: EventWriter<HitLanded>,
) {
    let dt = time.delta_secs();

    for (entity, mut attack, mut state, transform, facing, attacks, grounded, input) in
        attackers.iter_mut()
    {
        let data = attacks.get(attack.slot);
        attack.elapsed += dt;

        // Hit detection только в active-окне: elapsed ∈ [startup, startup+active]
        let (window_start, window_end) = data.active_window();
        if attack.elapsed >= window_start && attack.elapsed - dt <= window_end {
            let sign = facing.sign();
            let center = transform.translation.truncate()
                + Vec2::new(data.hitbox_offset.x * sign, data.hitbox_offset.y);
            let half = data.hitbox_size * 0.5;

            // Target discovery через реестр — first come, first processed
            for target in registry.iter() {
                if target == entity || attack.victims.contains(&target) {
                    continue;
                }
                let Ok((target_tf, hurtbox)) = targets.get(target) else {
                    continue;
                };
                if aabb_overlap(
                    center,
                    half,
                    target_tf.translation.truncate(),
                    hurtbox.half_extents,
                ) {
                    attack.victims.push(target);
                    hit_events.write(HitLanded {
                        attacker: entity,
                        target,
                        slot: attack.slot,
                        damage: data.damage,
                        hitstun: data.hitstun,
                        knockback: data.knockback,
                        facing_sign: sign,
                    });
                    crate::logger::log(&format!(
                        "💥 `{}` connected ({:?} → {:?})",
                        data.name, entity, target
                    ));
                }
            }
        }

        // Атака отыграла startup+active+recovery → выход по ground contact
        if attack.elapsed >= data.total_duration() {
            commands.entity(entity).remove::<ActiveAttack>();
            *state = FighterState::landing_state(grounded.0, input.axis());
            crate::logger::log(&format!(
                "✅ Attack `{}` finished ({:?}, {} victim(s))",
                data.name,
                entity,
                attack.victims.len()
            ));
        }
    }
}

/// System: damage resolution по HitLanded событиям.
///
/// 1. Жертва уже Ko → defensive no-op
/// 2. HP = saturating_sub(damage)
/// 3. HP == 0 → Ko, velocity обнуляется, resolution останавливается
/// 4. Иначе: hitstun = max(остаток, hitstun атаки), state → Hitstun,
///    knockback velocity (см. `knockback_velocity`)
pub fn resolve_hits(
    mut commands: Commands,
    mut hit_events: EventReader<HitLanded>,
    mut damage_events: EventWriter<DamageDealt>,
    mut ko_events: EventWriter<FighterKo>,
    mut victims: Query<
        (&mut Health, &mut FighterState, &mut PhysicsBody),
        (With<Active>, Without<Disabled>),
    >,
) {
    for hit in hit_events.read() {
        let Ok((mut health, mut state, mut body)) = victims.get_mut(hit.target) else {
            continue;
        };

        // Invariant violation → no-op, не паника
        if matches!(*state, FighterState::Ko) {
            continue;
        }

        let died = health.take_damage(hit.damage);
        damage_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            damage: hit.damage,
            target_ko: died,
        });

        // Прерывание чужой атаки: инвариант ActiveAttack ⇔ Attack
        commands.entity(hit.target).remove::<ActiveAttack>();

        if died {
            *state = FighterState::Ko;
            body.velocity = Vec2::ZERO;
            ko_events.write(FighterKo {
                entity: hit.target,
                by: Some(hit.attacker),
            });
            crate::logger::log_info(&format!(
                "☠️ Fighter {:?} KO'd by {:?}",
                hit.target, hit.attacker
            ));
            continue;
        }

        // Hitstun не стакается аддитивно: берём больший из таймеров
        let remaining = match *state {
            FighterState::Hitstun { remaining } => remaining,
            _ => 0.0,
        };
        *state = FighterState::Hitstun {
            remaining: remaining.max(hit.hitstun),
        };
        body.velocity = knockback_velocity(body.velocity, hit.knockback, hit.facing_sign);

        crate::logger::log(&format!(
            "🌀 Fighter {:?} in hitstun ({:.2}s, HP {})",
            hit.target,
            remaining.max(hit.hitstun),
            health.current()
        ));
    }
}

/// System: debug damage hook (внешний интерфейс для тестового тулинга).
pub fn apply_debug_damage(
    mut commands: Commands,
    mut events: EventReader<DebugDamage>,
    mut ko_events: EventWriter<FighterKo>,
    mut victims: Query<(&mut Health, &mut FighterState, &mut PhysicsBody)>,
) {
    for event in events.read() {
        let Ok((mut health, mut state, mut body)) = victims.get_mut(event.target) else {
            continue;
        };
        if matches!(*state, FighterState::Ko) {
            continue;
        }

        let died = health.take_damage(event.amount);
        crate::logger::log_warning(&format!(
            "🔧 Debug damage: {:?} -{} (HP {})",
            event.target,
            event.amount,
            health.current()
        ));

        if died {
            commands.entity(event.target).remove::<ActiveAttack>();
            *state = FighterState::Ko;
            body.velocity = Vec2::ZERO;
            ko_events.write(FighterKo {
                entity: event.target,
                by: None,
            });
        }
    }
}
