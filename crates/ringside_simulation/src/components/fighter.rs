//! Базовые компоненты бойца: Fighter, Health, Facing, Hurtbox, lifecycle-маркеры

use bevy::prelude::*;

/// Боец — один участник боя
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Fighter {
    /// Display name (обязателен, непустой — проверяется Validation Gate)
    pub name: String,
}

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max.
/// Уменьшается только через damage application; heal-пути в этом ядре нет.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Read-only health query (для health-bar UI и victory/defeat чекеров)
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Применить урон. Возвращает true если боец умер от ЭТОГО удара.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.current > 0;
        self.current = self.current.saturating_sub(amount);
        was_alive && self.current == 0
    }
}

/// Направление взгляда: true = смотрит в положительную сторону оси X.
///
/// Обновляется от последнего ненулевого горизонтального input
/// (только в управляемых состояниях; Dash/Attack фиксируют facing).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub right: bool,
}

impl Default for Facing {
    fn default() -> Self {
        Self { right: true }
    }
}

impl Facing {
    pub fn sign(&self) -> f32 {
        if self.right { 1.0 } else { -1.0 }
    }
}

/// Hurtbox бойца — AABB half-extents вокруг позиции, цель для hit detection
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub half_extents: Vec2,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(0.4, 0.9),
        }
    }
}

/// Маркер: боец заспавнен, но ещё не прошёл Validation Gate
#[derive(Component, Debug, Default)]
pub struct PendingActivation;

/// Маркер: валидация пройдена, боец живой и симулируется
#[derive(Component, Debug, Default)]
pub struct Active;

/// Маркер: боец перманентно отключен (validation failure или fatal config error).
///
/// Остаётся инстанциированным — health queries продолжают отвечать,
/// но ни один system его больше не обрабатывает.
#[derive(Component, Debug, Default)]
pub struct Disabled;
