//! Input surface бойца
//!
//! Архитектура:
//! - `ControlBindings` — семь символов управления (конфиг, валидируется gate'ом)
//! - `InputFrame` — ЕДИНСТВЕННАЯ поверхность управления бойцом:
//!   человеческий адаптер, AI-драйвер и тесты пишут сюда одинаково,
//!   никаких привилегированных ходов в обход (behavioral parity)
//!
//! Flow:
//! 1. Драйвер пишет InputFrame до logic tick
//! 2. State machine читает его один раз за tick
//! 3. `flush_input_frames` сбрасывает one-shot кнопки в конце tick
//!    (направления left/right считаются удерживаемыми — их драйвер меняет сам)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::AttackSlot;

/// Привязки управления: семь символов, каждый обязан быть привязан к чему-то.
///
/// Ядро само клавиши не читает — bindings нужны внешнему input-адаптеру
/// и проверяются Validation Gate на полноту.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct ControlBindings {
    pub left: String,
    pub right: String,
    pub jump: String,
    pub dash: String,
    pub light: String,
    pub medium: String,
    pub heavy: String,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            left: "a".into(),
            right: "d".into(),
            jump: "space".into(),
            dash: "shift".into(),
            light: "j".into(),
            medium: "k".into(),
            heavy: "l".into(),
        }
    }
}

impl ControlBindings {
    /// (имя символа, привязка) — для пофилдовой валидации
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("left", self.left.as_str()),
            ("right", self.right.as_str()),
            ("jump", self.jump.as_str()),
            ("dash", self.dash.as_str()),
            ("light", self.light.as_str()),
            ("medium", self.medium.as_str()),
            ("heavy", self.heavy.as_str()),
        ]
    }
}

/// Логический input за текущий tick (mock-able: тесты и AI пишут напрямую)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
    pub light: bool,
    pub medium: bool,
    pub heavy: bool,
}

impl InputFrame {
    /// Горизонтальная ось: right − left ∈ {-1, 0, 1}
    pub fn axis(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }

    /// Выбор атаки при одновременном нажатии: heavy > medium > light
    pub fn pressed_attack(&self) -> Option<AttackSlot> {
        if self.heavy {
            Some(AttackSlot::Heavy)
        } else if self.medium {
            Some(AttackSlot::Medium)
        } else if self.light {
            Some(AttackSlot::Light)
        } else {
            None
        }
    }

    /// Сброс one-shot кнопок (jump/dash/атаки); направления удерживаются
    pub fn clear_one_shot(&mut self) {
        self.jump = false;
        self.dash = false;
        self.light = false;
        self.medium = false;
        self.heavy = false;
    }
}

/// System: сброс one-shot input в конце tick
pub fn flush_input_frames(mut frames: Query<&mut InputFrame>) {
    for mut frame in frames.iter_mut() {
        frame.clear_one_shot();
    }
}
