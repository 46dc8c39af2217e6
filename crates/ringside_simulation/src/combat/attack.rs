//! Attack frame data: статичные параметры трёх ударов бойца.
//!
//! Каждая атака — startup → active → recovery (секунды), hit detection
//! работает только в active-окне. Slot-тег хранится на самом значении,
//! чтобы анимации и события различали атаки без reference-identity сравнений.

use bevy::prelude::*;

use crate::validation::AttackValidationError;

/// Слот атаки (Light/Medium/Heavy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AttackSlot {
    Light,
    Medium,
    Heavy,
}

impl AttackSlot {
    /// Имя анимационного клипа для этого слота
    pub fn clip_name(self) -> &'static str {
        match self {
            AttackSlot::Light => "attack_light",
            AttackSlot::Medium => "attack_medium",
            AttackSlot::Heavy => "attack_heavy",
        }
    }
}

/// Frame data одной атаки. Immutable во время игры, владеет ей только боец.
#[derive(Debug, Clone, Reflect)]
pub struct AttackData {
    /// Слот, которому принадлежит атака
    pub slot: AttackSlot,
    /// Имя атаки (непустое)
    pub name: String,
    /// Startup-фаза (секунды, > 0) — удар ещё не может попасть
    pub startup: f32,
    /// Active-фаза (секунды, > 0) — hitbox включен
    pub active: f32,
    /// Recovery-фаза (секунды, ≥ 0) — боец уязвим, удар завершается
    pub recovery: f32,
    /// Урон (целый, > 0)
    pub damage: u32,
    /// Hitstun жертвы (секунды, > 0)
    pub hitstun: f32,
    /// Offset hitbox относительно бойца; X переворачивается с facing
    pub hitbox_offset: Vec2,
    /// Размеры hitbox (оба > 0)
    pub hitbox_size: Vec2,
    /// Knockback: X переворачивается с facing атакующего, Y — нет
    pub knockback: Vec2,
}

impl AttackData {
    pub fn total_duration(&self) -> f32 {
        self.startup + self.active + self.recovery
    }

    /// Active-окно: elapsed ∈ [startup, startup + active]
    pub fn active_window(&self) -> (f32, f32) {
        (self.startup, self.startup + self.active)
    }

    /// Пофилдовая проверка frame data (используется gate'ом и fail-fast
    /// проверкой в момент запуска атаки)
    pub fn validate(&self) -> Result<(), AttackValidationError> {
        if self.name.is_empty() {
            return Err(AttackValidationError::EmptyName);
        }
        if self.startup <= 0.0 {
            return Err(AttackValidationError::NonPositiveStartup(self.startup));
        }
        if self.active <= 0.0 {
            return Err(AttackValidationError::NonPositiveActive(self.active));
        }
        if self.recovery < 0.0 {
            return Err(AttackValidationError::NegativeRecovery(self.recovery));
        }
        if self.damage == 0 {
            return Err(AttackValidationError::ZeroDamage);
        }
        if self.hitstun <= 0.0 {
            return Err(AttackValidationError::NonPositiveHitstun(self.hitstun));
        }
        if self.hitbox_size.x <= 0.0 || self.hitbox_size.y <= 0.0 {
            return Err(AttackValidationError::NonPositiveHitbox(
                self.hitbox_size.x,
                self.hitbox_size.y,
            ));
        }
        Ok(())
    }

    /// Быстрый джеб
    pub fn light_jab() -> Self {
        Self {
            slot: AttackSlot::Light,
            name: "jab".into(),
            startup: 0.1,
            active: 0.05,
            recovery: 0.1,
            damage: 10,
            hitstun: 0.25,
            hitbox_offset: Vec2::new(0.8, 0.2),
            hitbox_size: Vec2::new(1.0, 0.8),
            knockback: Vec2::new(3.0, 1.5),
        }
    }

    /// Прямой удар
    pub fn medium_straight() -> Self {
        Self {
            slot: AttackSlot::Medium,
            name: "straight".into(),
            startup: 0.16,
            active: 0.08,
            recovery: 0.2,
            damage: 18,
            hitstun: 0.35,
            hitbox_offset: Vec2::new(0.9, 0.3),
            hitbox_size: Vec2::new(1.2, 0.9),
            knockback: Vec2::new(5.0, 2.5),
        }
    }

    /// Медленный размашистый удар
    pub fn heavy_haymaker() -> Self {
        Self {
            slot: AttackSlot::Heavy,
            name: "haymaker".into(),
            startup: 0.25,
            active: 0.1,
            recovery: 0.3,
            damage: 30,
            hitstun: 0.5,
            hitbox_offset: Vec2::new(1.0, 0.4),
            hitbox_size: Vec2::new(1.4, 1.0),
            knockback: Vec2::new(8.0, 4.0),
        }
    }
}

/// Набор атак бойца: ровно три, по одной на слот
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AttackSet {
    pub light: AttackData,
    pub medium: AttackData,
    pub heavy: AttackData,
}

impl Default for AttackSet {
    fn default() -> Self {
        Self {
            light: AttackData::light_jab(),
            medium: AttackData::medium_straight(),
            heavy: AttackData::heavy_haymaker(),
        }
    }
}

impl AttackSet {
    pub fn get(&self, slot: AttackSlot) -> &AttackData {
        match slot {
            AttackSlot::Light => &self.light,
            AttackSlot::Medium => &self.medium,
            AttackSlot::Heavy => &self.heavy,
        }
    }

    pub fn iter(&self) -> [&AttackData; 3] {
        [&self.light, &self.medium, &self.heavy]
    }
}

/// Текущая атака бойца.
///
/// Инвариант: компонент присутствует тогда и только тогда, когда
/// state == Attack. `victims` — per-swing victim set: каждый противник
/// получает урон от одного замаха максимум один раз, сколько бы тиков
/// ни длилось active-окно. Очищается конструированием нового ActiveAttack.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ActiveAttack {
    /// Какой слот выполняется
    pub slot: AttackSlot,
    /// Сколько секунд атака уже длится
    pub elapsed: f32,
    /// Кто уже получил урон от этого замаха
    pub victims: Vec<Entity>,
}

impl ActiveAttack {
    pub fn new(slot: AttackSlot) -> Self {
        Self {
            slot,
            elapsed: 0.0,
            victims: Vec::new(),
        }
    }
}
