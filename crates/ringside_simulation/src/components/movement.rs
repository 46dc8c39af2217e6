//! Movement компоненты: tunables, PhysicsBody, ground probe данные

use bevy::prelude::*;

/// Гравитационная константа (m/s²), масштабируется per-fighter gravity scale'ами
pub const GRAVITY: f32 = 9.81;

/// Movement tunables бойца (все скалярные поля обязаны быть > 0, см. Validation Gate)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MovementTunables {
    /// Скорость ходьбы (m/s)
    pub move_speed: f32,
    /// Высота прыжка (метры) — apex совпадает с этим значением
    pub jump_height: f32,
    /// Gravity scale на подъёме
    pub gravity_scale: f32,
    /// Gravity scale на падении (быстрее подъёма → асимметричная арка)
    pub fall_gravity_scale: f32,
    /// Скорость dash (m/s)
    pub dash_speed: f32,
    /// Длительность dash (секунды)
    pub dash_duration: f32,
    /// Множитель управления в воздухе (target и acceleration)
    pub air_control: f32,
    /// Offset ground probe от позиции бойца
    pub ground_check_offset: Vec2,
    /// Радиус ground probe
    pub ground_check_radius: f32,
    /// Битовая маска слоёв земли
    pub ground_mask: u32,
}

impl Default for MovementTunables {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            jump_height: 2.0,
            gravity_scale: 2.0,
            fall_gravity_scale: 3.0,
            dash_speed: 12.0,
            dash_duration: 0.2,
            air_control: 0.6,
            ground_check_offset: Vec2::new(0.0, -0.9),
            ground_check_radius: 0.2,
            ground_mask: 1,
        }
    }
}

/// Custom velocity бойца — интегрируется нашим fixed-step integrator'ом
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec2,
}

/// Результат ground probe текущего tick
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Grounded(pub bool);

/// Статическая геометрия земли: AABB half-extents вокруг Transform
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct GroundCollider {
    pub half_extents: Vec2,
}

/// Слой земли (битовая маска, сверяется с ground_mask бойца)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct GroundLayer(pub u32);
