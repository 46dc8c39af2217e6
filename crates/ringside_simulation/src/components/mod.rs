//! ECS Components для бойцов
//!
//! Организация по доменам:
//! - fighter: идентичность, здоровье, hurtbox, lifecycle-маркеры (PendingActivation/Active/Disabled)
//! - input: control bindings + InputFrame (единственная поверхность управления)
//! - movement: movement tunables, PhysicsBody, ground probe данные

pub mod fighter;
pub mod input;
pub mod movement;

// Re-exports для удобного импорта
pub use fighter::*;
pub use input::*;
pub use movement::*;
