//! Registry that owns every live actor and allocates their identifiers.

use std::collections::{btree_map::Entry, BTreeMap};

use glam::Vec2;
use tank_field_core::{
    ActorId, ActorKind, ActorSnapshot, CellCoord, Direction, FieldError, FieldGrid,
};

/// Authoritative state of a single actor stored inside the field.
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    pub(crate) kind: ActorKind,
    pub(crate) position_cell: CellCoord,
    pub(crate) move_to_cell: CellCoord,
    pub(crate) position: Vec2,
    pub(crate) facing: Direction,
    pub(crate) speed: f32,
    pub(crate) is_moving: bool,
    pub(crate) is_damagable: bool,
    pub(crate) is_destroyed: bool,
}

impl Actor {
    /// Creates an idle, damagable actor resting exactly on `cell`.
    pub(crate) fn resting(
        kind: ActorKind,
        cell: CellCoord,
        facing: Direction,
        speed: f32,
        grid: &FieldGrid,
    ) -> Self {
        Self {
            kind,
            position_cell: cell,
            move_to_cell: cell,
            position: grid.cell_to_pixel(cell),
            facing,
            speed,
            is_moving: false,
            is_damagable: true,
            is_destroyed: false,
        }
    }

    /// Turns the actor and targets the neighbouring cell along `facing`.
    ///
    /// The live position is realigned with `position_cell` on the axis the
    /// episode does not travel along, so arrival can be detected on both axes.
    pub(crate) fn begin_move(&mut self, facing: Direction, grid: &FieldGrid) {
        let resting = grid.cell_to_pixel(self.position_cell);
        if facing.is_vertical() {
            self.position.x = resting.x;
        } else {
            self.position.y = resting.y;
        }
        self.facing = facing;
        self.move_to_cell = self.position_cell.step(facing);
        self.is_moving = true;
    }

    /// Snaps the actor onto `cell`, ending any movement episode.
    pub(crate) fn place(&mut self, cell: CellCoord, grid: &FieldGrid) {
        self.position_cell = cell;
        self.move_to_cell = cell;
        self.position = grid.cell_to_pixel(cell);
    }

    pub(crate) fn snapshot(&self, id: ActorId) -> ActorSnapshot {
        ActorSnapshot {
            id,
            kind: self.kind,
            position_cell: self.position_cell,
            move_to_cell: self.move_to_cell,
            position: self.position,
            facing: self.facing,
            speed: self.speed,
            is_moving: self.is_moving,
            is_damagable: self.is_damagable,
            is_destroyed: self.is_destroyed,
        }
    }
}

/// Registry that stores actors keyed by identifier in insertion order.
///
/// Identifiers come from a monotonic counter, so iterating the ordered map
/// visits actors in the order they were inserted and no identifier is ever
/// handed out twice within a session.
#[derive(Debug)]
pub(crate) struct Field {
    entries: BTreeMap<ActorId, Actor>,
    next_actor_id: ActorId,
}

impl Field {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_actor_id: ActorId::new(1),
        }
    }

    /// Stores the actor under a freshly allocated identifier.
    pub(crate) fn insert(&mut self, actor: Actor) -> Result<ActorId, FieldError> {
        let id = self.next_actor_id;
        self.next_actor_id = ActorId::new(id.get().saturating_add(1));
        match self.entries.entry(id) {
            Entry::Occupied(_) => Err(FieldError::DuplicateId(id)),
            Entry::Vacant(slot) => {
                let _ = slot.insert(actor);
                Ok(id)
            }
        }
    }

    /// Deletes the actor, reporting `NotFound` when it is not registered.
    pub(crate) fn remove(&mut self, id: ActorId) -> Result<Actor, FieldError> {
        self.entries.remove(&id).ok_or(FieldError::NotFound(id))
    }

    pub(crate) fn get(&self, id: ActorId) -> Option<&Actor> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> Result<&mut Actor, FieldError> {
        self.entries.get_mut(&id).ok_or(FieldError::NotFound(id))
    }

    /// Lazily visits every live actor in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.entries.iter().map(|(id, actor)| (*id, actor))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drops every actor and restarts identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_actor_id = ActorId::new(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> FieldGrid {
        FieldGrid::new(10, 10, 32.0)
    }

    fn tank_at(column: i32, row: i32) -> Actor {
        Actor::resting(
            ActorKind::Tank,
            CellCoord::new(column, row),
            Direction::North,
            2.0,
            &grid(),
        )
    }

    #[test]
    fn identifiers_are_unique_and_monotonic() {
        let mut field = Field::new();
        let first = field.insert(tank_at(1, 1)).expect("insert first");
        let second = field.insert(tank_at(2, 1)).expect("insert second");
        let _ = field.remove(first).expect("remove first");
        let third = field.insert(tank_at(3, 1)).expect("insert third");

        assert!(first < second);
        assert!(second < third);
        assert_ne!(first, third, "identifiers must not be reused");
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut field = Field::new();
        let ids: Vec<ActorId> = (1..=4)
            .map(|column| field.insert(tank_at(column, 2)).expect("insert"))
            .collect();

        let visited: Vec<ActorId> = field.iter().map(|(id, _)| id).collect();
        assert_eq!(visited, ids);
    }

    #[test]
    fn removing_absent_actor_is_reported() {
        let mut field = Field::new();
        let id = field.insert(tank_at(1, 1)).expect("insert");
        assert!(field.remove(id).is_ok());
        assert_eq!(field.remove(id).unwrap_err(), FieldError::NotFound(id));
        assert_eq!(field.get_mut(id).unwrap_err(), FieldError::NotFound(id));
    }

    #[test]
    fn colliding_identifier_fails_instead_of_overwriting() {
        let mut field = Field::new();
        let id = field.insert(tank_at(1, 1)).expect("insert");
        field.next_actor_id = id;

        let error = field.insert(tank_at(5, 5)).unwrap_err();
        assert_eq!(error, FieldError::DuplicateId(id));
        let kept = field.get(id).expect("first actor kept");
        assert_eq!(kept.position_cell, CellCoord::new(1, 1));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn clear_empties_registry_and_resets_counter() {
        let mut field = Field::new();
        let first = field.insert(tank_at(1, 1)).expect("insert");
        let _ = field.insert(tank_at(2, 2)).expect("insert");
        field.clear();

        assert_eq!(field.len(), 0);
        assert_eq!(field.insert(tank_at(3, 3)).expect("insert"), first);
    }

    #[test]
    fn begin_move_realigns_orthogonal_axis() {
        let grid = grid();
        let mut actor = tank_at(5, 5);
        actor.position = Vec2::new(170.0, 160.0);

        actor.begin_move(Direction::South, &grid);

        assert_eq!(actor.position, Vec2::new(160.0, 160.0));
        assert_eq!(actor.move_to_cell, CellCoord::new(5, 6));
        assert_eq!(actor.facing, Direction::South);
        assert!(actor.is_moving);
    }

    #[test]
    fn place_snaps_onto_the_cell() {
        let grid = grid();
        let mut actor = tank_at(5, 5);

        actor.place(CellCoord::new(2, 3), &grid);

        assert_eq!(actor.position_cell, CellCoord::new(2, 3));
        assert_eq!(actor.move_to_cell, CellCoord::new(2, 3));
        assert_eq!(actor.position, Vec2::new(64.0, 96.0));
    }
}
