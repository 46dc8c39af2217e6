//! Headless демо-бой RINGSIDE
//!
//! Два бойца с дефолтными конфигами, боец A джебит каждую секунду.
//! Полезно для быстрой проверки детерминизма и просмотра логов боя.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use ringside_simulation::{
    create_headless_app, spawn_fighter, FighterConfig, FighterState, Health, InputFrame,
    SIM_TICK_HZ,
};

fn main() {
    println!("Starting RINGSIDE headless bout");

    let mut app = create_headless_app();
    // Ручной шаг времени: один app.update() == ровно один simulation tick.
    // Первый update лишь наполняет fixed-time accumulator, поэтому
    // прогреваем пустой мир до спавна.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / SIM_TICK_HZ,
    )));
    app.update();

    let (alice, boris) = {
        let mut commands = app.world_mut().commands();

        commands.spawn((
            Transform::from_xyz(0.0, -0.5, 0.0),
            ringside_simulation::GroundCollider {
                half_extents: Vec2::new(50.0, 0.5),
            },
            ringside_simulation::GroundLayer(1),
        ));

        let mut config = FighterConfig::default();
        config.name = "Alice".into();
        let alice = spawn_fighter(&mut commands, &config, Vec2::new(0.0, 0.9));

        config.name = "Boris".into();
        let boris = spawn_fighter(&mut commands, &config, Vec2::new(1.2, 0.9));

        (alice, boris)
    };
    app.world_mut().flush();

    for tick in 0..600u32 {
        // Alice джебит раз в секунду
        if tick % 60 == 5 {
            if let Some(mut input) = app.world_mut().get_mut::<InputFrame>(alice) {
                input.light = true;
            }
        }

        app.update();

        if tick % 60 == 0 {
            let hp = |e| {
                app.world()
                    .get::<Health>(e)
                    .map(|h| h.current())
                    .unwrap_or(0)
            };
            println!("Tick {}: Alice {} HP, Boris {} HP", tick, hp(alice), hp(boris));
        }

        if let Some(FighterState::Ko) = app.world().get::<FighterState>(boris).cloned() {
            println!("Boris is KO'd at tick {}", tick);
            break;
        }
    }

    println!("Bout complete!");
}
