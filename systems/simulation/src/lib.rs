#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that sequences collision and movement for every moving actor.
//!
//! Actors are visited once per tick in registry order. Each visit resolves
//! collisions against the live state left by the actors visited before it,
//! then either stops the actor or commits its pending cell and moves it.

use tank_field_core::{ActorId, ActorSnapshot, Command, Event, FieldError};
use tank_field_system_collision::{detect, resolution};
use tank_field_system_movement::integrate;
use tank_field_world::{self as world, query, World};
use tracing::trace;

/// Drives the per-frame update of the world.
#[derive(Debug, Default)]
pub struct Simulation {
    actors: Vec<ActorId>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a new frame driver with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the world by one frame of length `delta`.
    ///
    /// Idle actors are skipped entirely. An actor removed earlier in the same
    /// pass, such as a consumed missile, is never visited again.
    pub fn tick(
        &mut self,
        world: &mut World,
        delta: f32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), FieldError> {
        world::apply(world, Command::Tick { delta }, out_events)?;

        self.actors.clear();
        self.actors.extend(query::actors(world).map(|actor| actor.id));

        let mut visited = 0_usize;
        for index in 0..self.actors.len() {
            let Some(subject) = query::actor(world, self.actors[index]) else {
                continue;
            };
            if !subject.is_moving {
                continue;
            }
            visited += 1;
            self.update_actor(world, &subject, delta, out_events)?;
        }

        trace!(tick = query::tick_index(world), visited, "frame_simulated");
        Ok(())
    }

    fn update_actor(
        &mut self,
        world: &mut World,
        subject: &ActorSnapshot,
        delta: f32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), FieldError> {
        let collision = detect(subject, query::actors(world), query::grid(world));
        if let Some(command) = resolution(subject, collision) {
            return world::apply(world, command, out_events);
        }

        world::apply(world, Command::EnterCell { actor: subject.id }, out_events)?;
        let committed = query::actor(world, subject.id).ok_or(FieldError::NotFound(subject.id))?;

        self.commands.clear();
        integrate(&committed, delta, query::grid(world), &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(world, command, out_events)?;
        }
        Ok(())
    }
}
