#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tank Field simulation.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Systems read [`ActorSnapshot`] values and respond
//! with new commands; they never mutate the world directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cardinal directions an actor can face and travel along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Reports whether travelling in this direction changes the row axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Location of a single grid cell expressed as 1-indexed column and row.
///
/// Coordinates are signed so that a step off the field edge (column or row
/// `0`, or one past the configured size) stays representable until the
/// collision resolver rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// One-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// One-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one step along `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::North => Self::new(self.column, self.row.saturating_sub(1)),
            Direction::East => Self::new(self.column.saturating_add(1), self.row),
            Direction::South => Self::new(self.column, self.row.saturating_add(1)),
            Direction::West => Self::new(self.column.saturating_sub(1), self.row),
        }
    }
}

/// Describes the discrete cell layout of the field and its pixel scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldGrid {
    columns: u32,
    rows: u32,
    cell_size: f32,
}

impl FieldGrid {
    /// Creates a new field grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Number of columns contained in the field.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the field.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total width of the field measured in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the field measured in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Checks that the grid holds at least one cell and a finite, positive
    /// cell size.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.columns == 0
            || self.rows == 0
            || !self.cell_size.is_finite()
            || self.cell_size <= 0.0
        {
            return Err(FieldError::InvalidGrid {
                columns: self.columns,
                rows: self.rows,
                cell_size: self.cell_size,
            });
        }
        Ok(())
    }

    /// Reports whether the cell lies within `[1, columns] x [1, rows]`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let within = |value: i32, limit: u32| value >= 1 && i64::from(value) <= i64::from(limit);
        within(cell.column(), self.columns) && within(cell.row(), self.rows)
    }

    /// Converts a cell coordinate into the pixel position actors rest at.
    #[must_use]
    pub fn cell_to_pixel(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_size,
            cell.row() as f32 * self.cell_size,
        )
    }
}

/// Unique identifier assigned to an actor by the field registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Discriminates the behaviours attached to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Player or enemy tank that moves cell by cell on request.
    Tank,
    /// Projectile that keeps travelling until it hits something.
    Missile {
        /// Actor that fired the missile. Never treated as a collision target.
        owner: ActorId,
    },
}

impl ActorKind {
    /// Returns the firing actor when this kind is a missile.
    #[must_use]
    pub const fn owner(self) -> Option<ActorId> {
        match self {
            Self::Tank => None,
            Self::Missile { owner } => Some(owner),
        }
    }

    /// Reports whether the kind is a missile.
    #[must_use]
    pub const fn is_missile(self) -> bool {
        matches!(self, Self::Missile { .. })
    }

    /// Z-ordering hint for renderers. Missiles are drawn behind tanks.
    #[must_use]
    pub const fn render_layer(self) -> i32 {
        match self {
            Self::Tank => 0,
            Self::Missile { .. } => -1,
        }
    }
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Identifier allocated to the actor by the registry.
    pub id: ActorId,
    /// Behaviours attached to the actor.
    pub kind: ActorKind,
    /// Cell the actor currently occupies.
    pub position_cell: CellCoord,
    /// Cell the actor is travelling toward. Equals `position_cell` when idle.
    pub move_to_cell: CellCoord,
    /// Live pixel position, possibly between cells.
    pub position: Vec2,
    /// Direction the actor faces and travels along.
    pub facing: Direction,
    /// Pixels advanced per frame before the frame delta is added.
    pub speed: f32,
    /// Whether the actor is mid-way through a movement episode.
    pub is_moving: bool,
    /// Whether other actors may collide with this one.
    pub is_damagable: bool,
    /// Whether the actor has been destroyed by an external collaborator.
    pub is_destroyed: bool,
}

/// Terminal outcome of a missile that stopped travelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// The missile ran into another actor.
    Target(ActorId),
    /// The missile tried to leave the field through the given cell.
    Border(CellCoord),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a new session on a freshly configured grid, clearing all actors.
    ConfigureField {
        /// Layout of the new field.
        grid: FieldGrid,
    },
    /// Advances the simulation clock by the provided frame delta.
    Tick {
        /// Frame delta supplied by the host clock.
        delta: f32,
    },
    /// Inserts a tank resting at the provided cell.
    SpawnTank {
        /// Cell the tank occupies after spawning.
        cell: CellCoord,
        /// Initial facing of the tank.
        facing: Direction,
        /// Movement speed of the tank.
        speed: f32,
    },
    /// Inserts a missile at its owner's cell and launches it along the owner's facing.
    FireMissile {
        /// Actor firing the missile.
        owner: ActorId,
        /// Movement speed of the missile.
        speed: f32,
    },
    /// Turns an actor and starts moving it one cell along the new facing.
    MoveActor {
        /// Actor to move.
        actor: ActorId,
        /// Direction of travel.
        facing: Direction,
    },
    /// Snaps an actor to the provided cell without travelling.
    PlaceActor {
        /// Actor to place.
        actor: ActorId,
        /// Destination cell. Must lie within the field.
        cell: CellCoord,
    },
    /// Toggles whether other actors can collide with this actor.
    SetDamagable {
        /// Actor to update.
        actor: ActorId,
        /// New collision participation flag.
        damagable: bool,
    },
    /// Marks an actor as destroyed so it no longer blocks movement.
    DestroyActor {
        /// Actor to destroy.
        actor: ActorId,
    },
    /// Deletes an actor from the registry.
    RemoveActor {
        /// Actor to remove.
        actor: ActorId,
    },
    /// Cancels an actor's pending move because the target cell is blocked.
    HaltActor {
        /// Actor whose move was blocked.
        actor: ActorId,
    },
    /// Commits the actor's pending move so it occupies its target cell.
    EnterCell {
        /// Actor entering its target cell.
        actor: ActorId,
    },
    /// Writes a new live pixel position for an actor.
    SetPosition {
        /// Actor to reposition.
        actor: ActorId,
        /// New live pixel position.
        position: Vec2,
    },
    /// Ends the actor's movement episode after reaching its target.
    FinishMove {
        /// Actor that reached its target.
        actor: ActorId,
    },
    /// Removes a missile that hit another actor or the field border.
    ConsumeMissile {
        /// Missile to consume.
        missile: ActorId,
        /// What the missile hit.
        impact: Impact,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new session started on the provided grid.
    FieldConfigured {
        /// Layout of the new field.
        grid: FieldGrid,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Frame delta applied by the tick.
        delta: f32,
    },
    /// Confirms that an actor was inserted into the registry.
    ActorSpawned {
        /// Identifier assigned to the actor.
        actor: ActorId,
        /// Behaviours attached to the actor.
        kind: ActorKind,
        /// Cell the actor occupies after spawning.
        cell: CellCoord,
    },
    /// Confirms that an actor started travelling toward a neighbouring cell.
    MovementStarted {
        /// Actor that started moving.
        actor: ActorId,
        /// Cell the actor departs from.
        from: CellCoord,
        /// Cell the actor travels toward. May lie outside the field.
        to: CellCoord,
    },
    /// Reports that an actor's pending move was cancelled.
    MovementBlocked {
        /// Actor whose move was blocked.
        actor: ActorId,
        /// Cell the actor attempted to enter.
        attempted: CellCoord,
    },
    /// Confirms that an actor now occupies a new cell.
    CellEntered {
        /// Actor that entered the cell.
        actor: ActorId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Confirms that an actor's live position reached its target cell.
    ActorArrived {
        /// Actor that arrived.
        actor: ActorId,
        /// Cell the actor rests at.
        cell: CellCoord,
    },
    /// Confirms that an actor was snapped to a new cell.
    ActorPlaced {
        /// Actor that was placed.
        actor: ActorId,
        /// Cell the actor occupies after placement.
        cell: CellCoord,
    },
    /// Reports that a missile struck another actor and was consumed.
    MissileHit {
        /// Missile that was consumed.
        missile: ActorId,
        /// Actor that fired the missile.
        owner: ActorId,
        /// Actor the missile struck.
        target: ActorId,
    },
    /// Reports that a missile crossed the field border and was consumed.
    MissileLeftField {
        /// Missile that was consumed.
        missile: ActorId,
        /// Actor that fired the missile.
        owner: ActorId,
        /// Off-field cell the missile tried to enter.
        cell: CellCoord,
    },
    /// Confirms that an actor's collision participation changed.
    DamagableChanged {
        /// Actor that was updated.
        actor: ActorId,
        /// New collision participation flag.
        damagable: bool,
    },
    /// Confirms that an actor was marked destroyed.
    ActorDestroyed {
        /// Actor that was destroyed.
        actor: ActorId,
    },
    /// Confirms that an actor was deleted from the registry.
    ActorRemoved {
        /// Actor that was removed.
        actor: ActorId,
    },
}

/// Contract violations reported by the world.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum FieldError {
    /// No live actor carries the provided identifier.
    #[error("actor {} is not registered on the field", .0.get())]
    NotFound(ActorId),
    /// The grid has no cells or a cell size that is not finite and positive.
    #[error("grid {columns}x{rows} with cell size {cell_size} is not a usable field")]
    InvalidGrid {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
        /// Requested cell size in pixels.
        cell_size: f32,
    },
    /// The requested cell lies outside the configured field.
    #[error("cell ({}, {}) lies outside the {columns}x{rows} field", .cell.column(), .cell.row())]
    InvalidCell {
        /// Rejected cell.
        cell: CellCoord,
        /// Configured number of columns.
        columns: u32,
        /// Configured number of rows.
        rows: u32,
    },
    /// The registry already holds an actor under the generated identifier.
    #[error("actor {} is already registered on the field", .0.get())]
    DuplicateId(ActorId),
    /// A missile-only command was addressed at another kind of actor.
    #[error("actor {} is not a missile", .0.get())]
    NotAMissile(ActorId),
    /// The command requires an idle actor but the actor is mid-move.
    #[error("actor {} is still moving", .0.get())]
    ActorMoving(ActorId),
    /// The frame delta was negative or not finite.
    #[error("frame delta {0} must be finite and non-negative")]
    InvalidDelta(f32),
    /// The actor speed was negative or not finite.
    #[error("speed {0} must be finite and non-negative")]
    InvalidSpeed(f32),
}

#[cfg(test)]
mod tests {
    use super::{ActorId, ActorKind, CellCoord, Direction, FieldError, FieldGrid, Impact};
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_to_pixel_scales_by_cell_size() {
        let grid = FieldGrid::new(10, 10, 32.0);
        assert_eq!(grid.cell_to_pixel(CellCoord::new(5, 5)), Vec2::new(160.0, 160.0));
        assert_eq!(grid.cell_to_pixel(CellCoord::new(6, 5)), Vec2::new(192.0, 160.0));
    }

    #[test]
    fn field_extent_spans_every_cell() {
        let grid = FieldGrid::new(10, 8, 32.0);
        assert_eq!(grid.width(), 320.0);
        assert_eq!(grid.height(), 256.0);
    }

    #[test]
    fn unusable_grids_are_rejected() {
        assert_eq!(FieldGrid::new(10, 10, 32.0).validate(), Ok(()));
        for grid in [
            FieldGrid::new(0, 10, 32.0),
            FieldGrid::new(10, 0, 32.0),
            FieldGrid::new(10, 10, 0.0),
            FieldGrid::new(10, 10, -4.0),
            FieldGrid::new(10, 10, f32::INFINITY),
        ] {
            assert!(
                matches!(grid.validate(), Err(FieldError::InvalidGrid { .. })),
                "{grid:?} accepted"
            );
        }
        assert!(FieldGrid::new(10, 10, f32::NAN).validate().is_err());
    }

    #[test]
    fn contains_uses_one_based_inclusive_bounds() {
        let grid = FieldGrid::new(4, 3, 16.0);
        assert!(grid.contains(CellCoord::new(1, 1)));
        assert!(grid.contains(CellCoord::new(4, 3)));
        assert!(!grid.contains(CellCoord::new(0, 1)));
        assert!(!grid.contains(CellCoord::new(1, 0)));
        assert!(!grid.contains(CellCoord::new(5, 3)));
        assert!(!grid.contains(CellCoord::new(4, 4)));
        assert!(!grid.contains(CellCoord::new(-2, 2)));
    }

    #[test]
    fn steps_follow_screen_axes() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(origin.step(Direction::North), CellCoord::new(3, 2));
        assert_eq!(origin.step(Direction::South), CellCoord::new(3, 4));
        assert_eq!(origin.step(Direction::East), CellCoord::new(4, 3));
        assert_eq!(origin.step(Direction::West), CellCoord::new(2, 3));
    }

    #[test]
    fn step_off_the_edge_stays_representable() {
        let corner = CellCoord::new(1, 1);
        assert_eq!(corner.step(Direction::West), CellCoord::new(0, 1));
        assert_eq!(corner.step(Direction::North), CellCoord::new(1, 0));
    }

    #[test]
    fn missiles_render_behind_tanks() {
        let missile = ActorKind::Missile {
            owner: ActorId::new(1),
        };
        assert!(missile.render_layer() < ActorKind::Tank.render_layer());
        assert_eq!(missile.owner(), Some(ActorId::new(1)));
        assert_eq!(ActorKind::Tank.owner(), None);
    }

    #[test]
    fn field_error_messages_name_the_actor() {
        let message = FieldError::NotFound(ActorId::new(7)).to_string();
        assert_eq!(message, "actor 7 is not registered on the field");

        let message = FieldError::InvalidCell {
            cell: CellCoord::new(11, 0),
            columns: 10,
            rows: 10,
        }
        .to_string();
        assert_eq!(message, "cell (11, 0) lies outside the 10x10 field");
    }

    #[test]
    fn field_grid_round_trips_through_bincode() {
        assert_round_trip(&FieldGrid::new(12, 8, 24.0));
    }

    #[test]
    fn actor_kind_round_trips_through_bincode() {
        assert_round_trip(&ActorKind::Missile {
            owner: ActorId::new(3),
        });
    }

    #[test]
    fn impact_round_trips_through_bincode() {
        assert_round_trip(&Impact::Border(CellCoord::new(0, 4)));
    }
}
