//! Debug-визуализация: снапшот фигур для внешнего overlay-рендера.
//!
//! Симуляция не рисует сама. Раз в tick (если overlay включен)
//! пересобирается плоский список фигур: ground probe каждого бойца
//! и hitbox каждой атаки в active-окне. Внешний слой просто рисует
//! список, без знания о фазах атак.

use bevy::prelude::*;

use crate::combat::{ActiveAttack, AttackSet};
use crate::components::{Active, Disabled, Facing, MovementTunables};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShape {
    Circle { center: Vec2, radius: f32 },
    Rect { center: Vec2, half_extents: Vec2 },
}

/// Снапшот debug-фигур текущего tick
#[derive(Resource, Debug, Default)]
pub struct DebugOverlay {
    pub enabled: bool,
    pub shapes: Vec<DebugShape>,
}

/// System: пересборка списка фигур
pub fn refresh_debug_overlay(
    mut overlay: ResMut<DebugOverlay>,
    fighters: Query<
        (
            &Transform,
            &MovementTunables,
            &Facing,
            Option<&ActiveAttack>,
            &AttackSet,
        ),
        (With<Active>, Without<Disabled>),
    >,
) {
    if !overlay.enabled {
        overlay.shapes.clear();
        return;
    }

    overlay.shapes.clear();
    for (transform, tunables, facing, attack, attacks) in fighters.iter() {
        let pos = transform.translation.truncate();

        overlay.shapes.push(DebugShape::Circle {
            center: pos + tunables.ground_check_offset,
            radius: tunables.ground_check_radius,
        });

        // Hitbox рисуется только пока он реально активен
        if let Some(attack) = attack {
            let data = attacks.get(attack.slot);
            let (start, end) = data.active_window();
            if attack.elapsed >= start && attack.elapsed <= end {
                let sign = facing.sign();
                overlay.shapes.push(DebugShape::Rect {
                    center: pos + Vec2::new(data.hitbox_offset.x * sign, data.hitbox_offset.y),
                    half_extents: data.hitbox_size * 0.5,
                });
            }
        }
    }
}
