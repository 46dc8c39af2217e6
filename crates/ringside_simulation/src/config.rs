//! Serde-конфигурация бойца + спавн.
//!
//! Plain-data слой (скаляры и [f32; 2]) поверх ECS компонентов:
//! внешний хост грузит конфиг откуда угодно (TOML/JSON/встроенный),
//! ядру важна только итоговая структура. Валидация остаётся за
//! Validation Gate при активации, здесь проверок нет.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{AttackData, AttackSet, AttackSlot};
use crate::components::{
    ControlBindings, Facing, Fighter, Grounded, Health, Hurtbox, InputFrame, MovementTunables,
    PendingActivation, PhysicsBody,
};
use crate::animation::LastSyncedState;
use crate::combat::FighterState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    pub move_speed: f32,
    pub jump_height: f32,
    pub gravity_scale: f32,
    pub fall_gravity_scale: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub air_control: f32,
    pub ground_check_offset: [f32; 2],
    pub ground_check_radius: f32,
    pub ground_mask: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        let t = MovementTunables::default();
        Self {
            move_speed: t.move_speed,
            jump_height: t.jump_height,
            gravity_scale: t.gravity_scale,
            fall_gravity_scale: t.fall_gravity_scale,
            dash_speed: t.dash_speed,
            dash_duration: t.dash_duration,
            air_control: t.air_control,
            ground_check_offset: t.ground_check_offset.into(),
            ground_check_radius: t.ground_check_radius,
            ground_mask: t.ground_mask,
        }
    }
}

impl MovementConfig {
    pub fn tunables(&self) -> MovementTunables {
        MovementTunables {
            move_speed: self.move_speed,
            jump_height: self.jump_height,
            gravity_scale: self.gravity_scale,
            fall_gravity_scale: self.fall_gravity_scale,
            dash_speed: self.dash_speed,
            dash_duration: self.dash_duration,
            air_control: self.air_control,
            ground_check_offset: Vec2::from(self.ground_check_offset),
            ground_check_radius: self.ground_check_radius,
            ground_mask: self.ground_mask,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackConfig {
    pub name: String,
    pub startup: f32,
    pub active: f32,
    pub recovery: f32,
    pub damage: u32,
    pub hitstun: f32,
    pub hitbox_offset: [f32; 2],
    pub hitbox_size: [f32; 2],
    pub knockback: [f32; 2],
}

impl AttackConfig {
    fn from_data(data: &AttackData) -> Self {
        Self {
            name: data.name.clone(),
            startup: data.startup,
            active: data.active,
            recovery: data.recovery,
            damage: data.damage,
            hitstun: data.hitstun,
            hitbox_offset: data.hitbox_offset.into(),
            hitbox_size: data.hitbox_size.into(),
            knockback: data.knockback.into(),
        }
    }

    pub fn data(&self, slot: AttackSlot) -> AttackData {
        AttackData {
            slot,
            name: self.name.clone(),
            startup: self.startup,
            active: self.active,
            recovery: self.recovery,
            damage: self.damage,
            hitstun: self.hitstun,
            hitbox_offset: Vec2::from(self.hitbox_offset),
            hitbox_size: Vec2::from(self.hitbox_size),
            knockback: Vec2::from(self.knockback),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSetConfig {
    pub light: AttackConfig,
    pub medium: AttackConfig,
    pub heavy: AttackConfig,
}

impl Default for AttackSetConfig {
    fn default() -> Self {
        Self {
            light: AttackConfig::from_data(&AttackData::light_jab()),
            medium: AttackConfig::from_data(&AttackData::medium_straight()),
            heavy: AttackConfig::from_data(&AttackData::heavy_haymaker()),
        }
    }
}

impl AttackSetConfig {
    pub fn attack_set(&self) -> AttackSet {
        AttackSet {
            light: self.light.data(AttackSlot::Light),
            medium: self.medium.data(AttackSlot::Medium),
            heavy: self.heavy.data(AttackSlot::Heavy),
        }
    }
}

/// Полный конфиг бойца — всё, что требует Validation Gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FighterConfig {
    pub name: String,
    pub max_hp: u32,
    #[serde(default)]
    pub bindings: ControlBindings,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub attacks: AttackSetConfig,
}

impl Default for FighterConfig {
    fn default() -> Self {
        Self {
            name: "Fighter".into(),
            max_hp: 100,
            bindings: ControlBindings::default(),
            movement: MovementConfig::default(),
            attacks: AttackSetConfig::default(),
        }
    }
}

/// Спавн бойца из конфига. Боец рождается с `PendingActivation` и
/// попадает в симуляцию только после прохождения Validation Gate
/// на следующем tick.
pub fn spawn_fighter(commands: &mut Commands, config: &FighterConfig, position: Vec2) -> Entity {
    commands
        .spawn((
            Fighter {
                name: config.name.clone(),
            },
            config.bindings.clone(),
            config.movement.tunables(),
            Health::new(config.max_hp),
            config.attacks.attack_set(),
            Transform::from_translation(position.extend(0.0)),
            FighterState::default(),
            Facing::default(),
            PhysicsBody::default(),
            Grounded::default(),
            Hurtbox::default(),
            InputFrame::default(),
            LastSyncedState::default(),
            PendingActivation,
        ))
        .id()
}
