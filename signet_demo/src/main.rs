//! Movement simulation driven through the signet ECS registry.

use std::error::Error;

use log::LevelFilter;

use signet_ecs::config::{ENGINE_NAME, ENGINE_VERSION};
use signet_ecs::{Config, Entity, Registry, System, SystemHandle};

mod logger;

const ENTITY_MAX: usize = 2048;
const COMPONENT_MAX: usize = 16;
const TICKS: u32 = 120;
const SPAWN_PER_TICK: u32 = 12;
const DELTA_TIME: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

/// Seconds left before the entity is destroyed.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Lifetime(f32);

/// Moves entities by their velocity and pulls them down.
struct Movement {
    gravity: f32,
}

impl System for Movement {}

/// Destroys entities whose lifetime ran out.
#[derive(Default)]
struct Aging {
    expired: usize,
}

impl System for Aging {}

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _handle = logger::init(level)?;
    log::info!("{} v{} demo started", ENGINE_NAME, *ENGINE_VERSION);

    let config = Config::new(ENTITY_MAX, COMPONENT_MAX)?;
    let mut registry = Registry::with_config(config);

    let movement = registry.system_install_with(Movement { gravity: 9.8 });
    registry.system_require::<Movement, (Position, Velocity)>();
    let aging = registry.system_install::<Aging>();
    registry.system_require::<Aging, (Lifetime,)>();

    for tick in 0..TICKS {
        for index in 0..SPAWN_PER_TICK {
            spawn(&mut registry, tick * SPAWN_PER_TICK + index);
        }
        update_movement(&mut registry, movement, DELTA_TIME);
        update_aging(&mut registry, aging, DELTA_TIME);

        if tick % 20 == 0 {
            log::info!(
                "tick {:>3}: {} alive, {} moving, {} aging",
                tick,
                registry.entity_count(),
                registry.system_entities(movement).len(),
                registry.system_entities(aging).len(),
            );
        }
    }

    let positions = registry.component_storage::<Position>();
    let lowest = positions
        .iter()
        .min_by(|(_, lhs), (_, rhs)| lhs.y.total_cmp(&rhs.y));
    if let Some((entity, position)) = lowest {
        log::info!("lowest is {} at ({:.2}, {:.2})", entity, position.x, position.y);
    }
    log::info!(
        "demo finished: {} alive, {} expired",
        registry.entity_count(),
        registry.system(aging).expired,
    );
    Ok(())
}

/// Every third entity is static, every fourth one lives forever.
fn spawn(registry: &mut Registry, seed: u32) -> Entity {
    let entity = registry.entity_create();
    let spread = (seed % 7) as f32 - 3.0;
    registry.component_add(entity, Position { x: spread, y: 10.0 });
    if seed % 3 != 0 {
        registry.component_add(entity, Velocity { x: spread, y: 2.0 });
    }
    if seed % 4 != 0 {
        let seconds = 0.25 + (seed % 5) as f32 * 0.25;
        registry.component_add(entity, Lifetime(seconds));
    }
    entity
}

fn update_movement(registry: &mut Registry, handle: SystemHandle<Movement>, dt: f32) {
    let gravity = registry.system(handle).gravity;
    let entities: Vec<Entity> = registry.system_entities(handle).iter().copied().collect();
    for entity in entities {
        let velocity = registry.component_get_mut::<Velocity>(entity);
        velocity.y -= gravity * dt;
        let velocity = *velocity;

        let position = registry.component_get_mut::<Position>(entity);
        position.x += velocity.x * dt;
        position.y += velocity.y * dt;
    }
}

fn update_aging(registry: &mut Registry, handle: SystemHandle<Aging>, dt: f32) {
    let entities: Vec<Entity> = registry.system_entities(handle).iter().copied().collect();
    let mut expired = Vec::new();
    for entity in entities {
        let lifetime = registry.component_get_mut::<Lifetime>(entity);
        lifetime.0 -= dt;
        if lifetime.0 <= 0.0 {
            expired.push(entity);
        }
    }

    for &entity in &expired {
        registry.entity_destroy(entity);
    }
    registry.system_mut(handle).expired += expired.len();
    if !expired.is_empty() {
        log::debug!("{} entities expired", expired.len());
    }
}
