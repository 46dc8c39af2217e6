//! Movement systems: ground probe, state-driven velocity, интеграция.
//!
//! Порядок внутри tick (см. SimSet): probe → logic → combat → physics.
//! Velocity вычисляется из текущего состояния, затем интегрируется
//! в Transform семи-неявным Эйлером. Никаких ODE-солверов: одна
//! формула на state, один шаг на tick, полный детерминизм.

use bevy::prelude::*;

use crate::combat::FighterState;
use crate::components::{
    Active, Disabled, Facing, GroundCollider, GroundLayer, Grounded, InputFrame,
    MovementTunables, PhysicsBody, GRAVITY,
};

/// Скорость набора горизонтальной скорости на земле (m/s²)
pub const GROUND_ACCEL: f32 = 40.0;

/// Доля move_speed, доступная как drift во время атаки
pub const ATTACK_DRIFT_FACTOR: f32 = 0.3;

/// Overlap круга и AABB (центр + half-extents)
pub fn circle_aabb_overlap(center: Vec2, radius: f32, aabb_center: Vec2, half: Vec2) -> bool {
    let closest = Vec2::new(
        center.x.clamp(aabb_center.x - half.x, aabb_center.x + half.x),
        center.y.clamp(aabb_center.y - half.y, aabb_center.y + half.y),
    );
    center.distance_squared(closest) <= radius * radius
}

/// Линейное приближение current к target с шагом max_delta
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + max_delta * (target - current).signum()
    }
}

/// System: ground probe. Круг (offset + radius из tunables) против
/// статической геометрии, с проверкой битовой маски слоя.
pub fn probe_ground(
    mut fighters: Query<
        (&Transform, &MovementTunables, &mut Grounded),
        (With<Active>, Without<Disabled>),
    >,
    ground: Query<(&Transform, &GroundCollider, &GroundLayer), Without<Grounded>>,
) {
    for (transform, tunables, mut grounded) in fighters.iter_mut() {
        let center = transform.translation.truncate() + tunables.ground_check_offset;
        grounded.0 = ground.iter().any(|(g_tf, collider, layer)| {
            layer.0 & tunables.ground_mask != 0
                && circle_aabb_overlap(
                    center,
                    tunables.ground_check_radius,
                    g_tf.translation.truncate(),
                    collider.half_extents,
                )
        });
    }
}

/// System: velocity из текущего состояния.
///
/// Горизонталь:
/// - Idle → к нулю, Walk → axis * move_speed (наземный accel)
/// - Jump/Fall → axis * move_speed * air_control (воздушный accel)
/// - Dash → dash_speed * facing, без разгона
/// - Attack → drift к axis * move_speed * ATTACK_DRIFT_FACTOR
/// - Hitstun → не трогаем (knockback затухает только гравитацией)
/// - Ko → полный ноль
///
/// Вертикаль: гравитация с asymmetric scale (подъём/падение);
/// на земле отрицательная vy гасится в ноль.
pub fn apply_state_velocity(
    time: Res<Time<Fixed>>,
    mut fighters: Query<
        (
            &FighterState,
            &mut PhysicsBody,
            &InputFrame,
            &Grounded,
            &Facing,
            &MovementTunables,
        ),
        (With<Active>, Without<Disabled>),
    >,
) {
    let dt = time.delta_secs();

    for (state, mut body, input, grounded, facing, tunables) in fighters.iter_mut() {
        let axis = input.axis();

        match state {
            FighterState::Ko => {
                body.velocity = Vec2::ZERO;
                continue;
            }
            FighterState::Hitstun { .. } => {}
            FighterState::Idle => {
                body.velocity.x = move_toward(body.velocity.x, 0.0, GROUND_ACCEL * dt);
            }
            FighterState::Walk => {
                body.velocity.x = move_toward(
                    body.velocity.x,
                    axis * tunables.move_speed,
                    GROUND_ACCEL * dt,
                );
            }
            FighterState::Jump | FighterState::Fall => {
                body.velocity.x = move_toward(
                    body.velocity.x,
                    axis * tunables.move_speed * tunables.air_control,
                    GROUND_ACCEL * tunables.air_control * dt,
                );
            }
            FighterState::Dash { .. } => {
                body.velocity.x = tunables.dash_speed * facing.sign();
            }
            FighterState::Attack => {
                let accel = if grounded.0 {
                    GROUND_ACCEL
                } else {
                    GROUND_ACCEL * tunables.air_control
                };
                body.velocity.x = move_toward(
                    body.velocity.x,
                    axis * tunables.move_speed * ATTACK_DRIFT_FACTOR,
                    accel * dt,
                );
            }
        }

        // Вертикаль: в воздухе (или на подъёме) действует гравитация,
        // на земле остаточное падение гасится
        if !grounded.0 || body.velocity.y > 0.0 {
            let scale = if body.velocity.y > 0.0 {
                tunables.gravity_scale
            } else {
                tunables.fall_gravity_scale
            };
            body.velocity.y -= GRAVITY * scale * dt;
        } else if body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
    }
}

/// System: интеграция velocity в Transform (один шаг за tick)
pub fn integrate_translation(
    time: Res<Time<Fixed>>,
    mut bodies: Query<(&PhysicsBody, &mut Transform), (With<Active>, Without<Disabled>)>,
) {
    let dt = time.delta_secs();
    for (body, mut transform) in bodies.iter_mut() {
        transform.translation += body.velocity.extend(0.0) * dt;
    }
}
