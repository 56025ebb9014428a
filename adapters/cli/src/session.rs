//! Headless session that plays a scenario frame by frame.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tank_field_core::{ActorSnapshot, Command, Event};
use tank_field_system_simulation::Simulation;
use tank_field_world::{self as world, query, World};
use tracing::{debug, info, warn};

use crate::scenario::{Order, Scenario};

/// Outcome of a completed session.
#[derive(Debug)]
pub(crate) struct Summary {
    pub(crate) frames: u32,
    pub(crate) hits: usize,
    pub(crate) exits: usize,
    pub(crate) tanks: Vec<(String, ActorSnapshot)>,
}

/// Plays `scenario` for `frames` frames of length `delta`.
pub(crate) fn run(scenario: &Scenario, frames: u32, delta: f32) -> Result<Summary> {
    let mut world = World::new(scenario.field.grid()).context("failed to lay out the field")?;
    let mut events = Vec::new();

    let mut names = HashMap::with_capacity(scenario.tanks.len());
    let mut roster = Vec::with_capacity(scenario.tanks.len());
    for tank in &scenario.tanks {
        events.clear();
        world::apply(
            &mut world,
            Command::SpawnTank {
                cell: tank.cell(),
                facing: tank.facing,
                speed: tank.speed,
            },
            &mut events,
        )
        .with_context(|| format!("failed to spawn tank `{}`", tank.name))?;
        let id = events
            .iter()
            .find_map(|event| match event {
                Event::ActorSpawned { actor, .. } => Some(*actor),
                _ => None,
            })
            .with_context(|| format!("tank `{}` was not spawned", tank.name))?;
        let _ = names.insert(tank.name.as_str(), id);
        roster.push((tank.name.clone(), id));
    }

    let mut simulation = Simulation::new();
    let mut hits = 0_usize;
    let mut exits = 0_usize;

    for frame in 0..frames {
        events.clear();
        for order in scenario.orders.iter().filter(|order| order.frame() == frame) {
            let Some(&id) = names.get(order.tank()) else {
                continue;
            };
            match query::actor(&world, id) {
                Some(state) if !state.is_destroyed => {}
                _ => {
                    warn!(frame, tank = order.tank(), "order_skipped");
                    continue;
                }
            }
            let command = match order {
                Order::Move { facing, .. } => Command::MoveActor {
                    actor: id,
                    facing: *facing,
                },
                Order::Fire { speed, .. } => Command::FireMissile {
                    owner: id,
                    speed: *speed,
                },
            };
            world::apply(&mut world, command, &mut events)
                .with_context(|| format!("order for `{}` at frame {frame} failed", order.tank()))?;
        }

        simulation
            .tick(&mut world, delta, &mut events)
            .with_context(|| format!("frame {frame} failed"))?;

        let mut reactions = Vec::new();
        for event in &events {
            match event {
                Event::MissileHit { target, .. } => {
                    hits += 1;
                    let live = query::actor(&world, *target)
                        .is_some_and(|state| state.is_damagable && !state.is_destroyed);
                    if live {
                        world::apply(
                            &mut world,
                            Command::DestroyActor { actor: *target },
                            &mut reactions,
                        )?;
                    }
                }
                Event::MissileLeftField { .. } => exits += 1,
                _ => {}
            }
        }
        events.extend(reactions);

        for event in &events {
            log_event(frame, event);
        }
    }

    let tanks = roster
        .into_iter()
        .filter_map(|(name, id)| query::actor(&world, id).map(|state| (name, state)))
        .collect();

    Ok(Summary {
        frames,
        hits,
        exits,
        tanks,
    })
}

fn log_event(frame: u32, event: &Event) {
    match event {
        Event::ActorDestroyed { actor } => info!(frame, actor = actor.get(), "actor_destroyed"),
        Event::CellEntered { actor, to, .. } => debug!(
            frame,
            actor = actor.get(),
            column = to.column(),
            row = to.row(),
            "cell_entered"
        ),
        _ => {}
    }
}
