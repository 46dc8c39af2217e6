//! Fighter Registry — реестр живых бойцов.
//!
//! Явная injectable коллекция, принадлежащая world'у (Resource),
//! а не скрытый process-wide static: проще тестировать изолированные
//! пары бойцов и нет скрытой связности.
//!
//! Мутации: insert при активации (Validation Gate), remove при despawn.
//! Читается hit detection'ом для target discovery.

use bevy::prelude::*;

use crate::components::Fighter;

#[derive(Resource, Debug, Default)]
pub struct FighterRegistry {
    fighters: Vec<Entity>,
}

impl FighterRegistry {
    pub fn insert(&mut self, entity: Entity) {
        if !self.fighters.contains(&entity) {
            self.fighters.push(entity);
        }
    }

    pub fn remove(&mut self, entity: Entity) {
        self.fighters.retain(|&e| e != entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.fighters.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.fighters.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }
}

/// System: убираем despawn'утых бойцов из реестра
pub fn remove_despawned_fighters(
    mut registry: ResMut<FighterRegistry>,
    mut removed: RemovedComponents<Fighter>,
) {
    for entity in removed.read() {
        registry.remove(entity);
        crate::logger::log_info(&format!("Fighter {:?} removed from registry", entity));
    }
}
