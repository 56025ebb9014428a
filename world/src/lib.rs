#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tank Field.

mod field;

use tank_field_core::{
    ActorId, ActorKind, CellCoord, Command, Direction, Event, FieldError, FieldGrid, Impact,
};
use tracing::{debug, info};

use crate::field::{Actor, Field};

const DEFAULT_COLUMNS: u32 = 10;
const DEFAULT_ROWS: u32 = 10;
const DEFAULT_CELL_SIZE: f32 = 32.0;

/// Represents the authoritative Tank Field world state.
#[derive(Debug)]
pub struct World {
    grid: FieldGrid,
    field: Field,
    tick_index: u64,
}

impl World {
    /// Creates a new world with an empty field laid out on `grid`.
    ///
    /// Fails with [`FieldError::InvalidGrid`] when the grid has no cells or
    /// an unusable cell size.
    pub fn new(grid: FieldGrid) -> Result<Self, FieldError> {
        grid.validate()?;
        Ok(Self::empty(grid))
    }

    fn empty(grid: FieldGrid) -> Self {
        Self {
            grid,
            field: Field::new(),
            tick_index: 0,
        }
    }

    fn ensure_inside(&self, cell: CellCoord) -> Result<(), FieldError> {
        if self.grid.contains(cell) {
            Ok(())
        } else {
            Err(FieldError::InvalidCell {
                cell,
                columns: self.grid.columns(),
                rows: self.grid.rows(),
            })
        }
    }

    fn start_move(
        &mut self,
        id: ActorId,
        facing: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), FieldError> {
        let grid = self.grid;
        let actor = self.field.get_mut(id)?;
        if actor.is_moving {
            debug!(actor = id.get(), "move_ignored_while_moving");
            return Ok(());
        }

        actor.begin_move(facing, &grid);
        out_events.push(Event::MovementStarted {
            actor: id,
            from: actor.position_cell,
            to: actor.move_to_cell,
        });
        Ok(())
    }

    fn spawn(
        &mut self,
        actor: Actor,
        out_events: &mut Vec<Event>,
    ) -> Result<ActorId, FieldError> {
        let kind = actor.kind;
        let cell = actor.position_cell;
        let id = self.field.insert(actor)?;
        info!(
            actor = id.get(),
            ?kind,
            column = cell.column(),
            row = cell.row(),
            "actor_spawned"
        );
        out_events.push(Event::ActorSpawned {
            actor: id,
            kind,
            cell,
        });
        Ok(id)
    }

    fn consume_missile(
        &mut self,
        missile: ActorId,
        impact: Impact,
        out_events: &mut Vec<Event>,
    ) -> Result<(), FieldError> {
        let actor = self
            .field
            .get(missile)
            .ok_or(FieldError::NotFound(missile))?;
        let Some(owner) = actor.kind.owner() else {
            return Err(FieldError::NotAMissile(missile));
        };
        let _ = self.field.remove(missile)?;

        match impact {
            Impact::Target(target) => {
                info!(
                    missile = missile.get(),
                    owner = owner.get(),
                    target = target.get(),
                    "missile_hit"
                );
                out_events.push(Event::MissileHit {
                    missile,
                    owner,
                    target,
                });
            }
            Impact::Border(cell) => {
                info!(
                    missile = missile.get(),
                    owner = owner.get(),
                    column = cell.column(),
                    row = cell.row(),
                    "missile_left_field"
                );
                out_events.push(Event::MissileLeftField {
                    missile,
                    owner,
                    cell,
                });
            }
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::empty(FieldGrid::new(DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_CELL_SIZE))
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Every command validates its inputs before touching state, so an `Err`
/// leaves the world exactly as it was.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), FieldError> {
    match command {
        Command::ConfigureField { grid } => {
            grid.validate()?;
            world.grid = grid;
            world.field.clear();
            world.tick_index = 0;
            info!(
                columns = grid.columns(),
                rows = grid.rows(),
                cell_size = grid.cell_size(),
                "field_configured"
            );
            out_events.push(Event::FieldConfigured { grid });
        }
        Command::Tick { delta } => {
            if !delta.is_finite() || delta < 0.0 {
                return Err(FieldError::InvalidDelta(delta));
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { delta });
        }
        Command::SpawnTank {
            cell,
            facing,
            speed,
        } => {
            validate_speed(speed)?;
            world.ensure_inside(cell)?;
            let tank = Actor::resting(ActorKind::Tank, cell, facing, speed, &world.grid);
            let _ = world.spawn(tank, out_events)?;
        }
        Command::FireMissile { owner, speed } => {
            validate_speed(speed)?;
            let shooter = world.field.get(owner).ok_or(FieldError::NotFound(owner))?;
            let facing = shooter.facing;
            let missile = Actor::resting(
                ActorKind::Missile { owner },
                shooter.position_cell,
                facing,
                speed,
                &world.grid,
            );
            let id = world.spawn(missile, out_events)?;
            world.start_move(id, facing, out_events)?;
        }
        Command::MoveActor { actor, facing } => {
            world.start_move(actor, facing, out_events)?;
        }
        Command::PlaceActor { actor, cell } => {
            world.ensure_inside(cell)?;
            let grid = world.grid;
            let state = world.field.get_mut(actor)?;
            if state.is_moving {
                return Err(FieldError::ActorMoving(actor));
            }
            state.place(cell, &grid);
            out_events.push(Event::ActorPlaced { actor, cell });
        }
        Command::SetDamagable { actor, damagable } => {
            world.field.get_mut(actor)?.is_damagable = damagable;
            out_events.push(Event::DamagableChanged { actor, damagable });
        }
        Command::DestroyActor { actor } => {
            world.field.get_mut(actor)?.is_destroyed = true;
            out_events.push(Event::ActorDestroyed { actor });
        }
        Command::RemoveActor { actor } => {
            let _ = world.field.remove(actor)?;
            out_events.push(Event::ActorRemoved { actor });
        }
        Command::HaltActor { actor } => {
            let state = world.field.get_mut(actor)?;
            let attempted = state.move_to_cell;
            state.move_to_cell = state.position_cell;
            state.is_moving = false;
            debug!(
                actor = actor.get(),
                column = attempted.column(),
                row = attempted.row(),
                "movement_blocked"
            );
            out_events.push(Event::MovementBlocked { actor, attempted });
        }
        Command::EnterCell { actor } => {
            let state = world.field.get_mut(actor)?;
            let from = state.position_cell;
            let to = state.move_to_cell;
            state.position_cell = to;
            if from != to {
                out_events.push(Event::CellEntered { actor, from, to });
            }
        }
        Command::SetPosition { actor, position } => {
            world.field.get_mut(actor)?.position = position;
        }
        Command::FinishMove { actor } => {
            let state = world.field.get_mut(actor)?;
            state.is_moving = false;
            let cell = state.position_cell;
            debug!(
                actor = actor.get(),
                column = cell.column(),
                row = cell.row(),
                "actor_arrived"
            );
            out_events.push(Event::ActorArrived { actor, cell });
        }
        Command::ConsumeMissile { missile, impact } => {
            world.consume_missile(missile, impact, out_events)?;
        }
    }

    Ok(())
}

fn validate_speed(speed: f32) -> Result<(), FieldError> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(FieldError::InvalidSpeed(speed))
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tank_field_core::{ActorId, ActorSnapshot, FieldGrid};

    /// Provides read-only access to the field's grid definition.
    #[must_use]
    pub fn grid(world: &World) -> &FieldGrid {
        &world.grid
    }

    /// Number of ticks applied since the field was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the state of a single actor, if it is still registered.
    #[must_use]
    pub fn actor(world: &World, id: ActorId) -> Option<ActorSnapshot> {
        world.field.get(id).map(|actor| actor.snapshot(id))
    }

    /// Lazily captures every live actor in registry order.
    pub fn actors(world: &World) -> impl Iterator<Item = ActorSnapshot> + '_ {
        world.field.iter().map(|(id, actor)| actor.snapshot(id))
    }

    /// Identifiers of every live actor in registry order.
    #[must_use]
    pub fn actor_ids(world: &World) -> Vec<ActorId> {
        world.field.iter().map(|(id, _)| id).collect()
    }

    /// Number of live actors on the field.
    #[must_use]
    pub fn actor_count(world: &World) -> usize {
        world.field.len()
    }
}
