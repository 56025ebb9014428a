#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure collision system that decides whether an actor's pending move is blocked.
//!
//! Detection reads immutable [`ActorSnapshot`] values and never touches the
//! world. The caller turns a blocking [`Collision`] into the command that
//! resolves it with [`resolution`]: missiles are consumed, every other actor
//! is halted in place.

use tank_field_core::{ActorId, ActorSnapshot, CellCoord, Command, FieldGrid, Impact};

/// Outcome of testing one actor's pending move against the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    /// The target cell is free and lies inside the field.
    Clear,
    /// The target cell lies outside the field.
    Border {
        /// Off-field cell the actor attempted to enter.
        cell: CellCoord,
    },
    /// Another actor occupies or is travelling into the target cell.
    Occupied {
        /// First actor found in the way.
        other: ActorId,
    },
}

impl Collision {
    /// Reports whether the pending move must not be committed.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        !matches!(self, Self::Clear)
    }
}

/// Tests `subject`'s pending move to `move_to_cell` against the field.
///
/// The border is checked first and independently of other actors, so an
/// actor alone on the field is still contained. The remaining actors are
/// scanned in the order provided and the first overlap wins.
#[must_use]
pub fn detect<I>(subject: &ActorSnapshot, others: I, grid: &FieldGrid) -> Collision
where
    I: IntoIterator<Item = ActorSnapshot>,
{
    let target = subject.move_to_cell;
    if !grid.contains(target) {
        return Collision::Border { cell: target };
    }

    let owner = subject.kind.owner();
    others
        .into_iter()
        .filter(|other| can_collide(subject, owner, other))
        .find(|other| target == other.position_cell || target == other.move_to_cell)
        .map_or(Collision::Clear, |other| Collision::Occupied { other: other.id })
}

fn can_collide(subject: &ActorSnapshot, owner: Option<ActorId>, other: &ActorSnapshot) -> bool {
    other.id != subject.id
        && other.is_damagable
        && !other.is_destroyed
        && owner != Some(other.id)
}

/// Produces the command that resolves a blocking collision for `subject`.
///
/// Returns `None` for [`Collision::Clear`].
#[must_use]
pub fn resolution(subject: &ActorSnapshot, collision: Collision) -> Option<Command> {
    let impact = match collision {
        Collision::Clear => return None,
        Collision::Border { cell } => Impact::Border(cell),
        Collision::Occupied { other } => Impact::Target(other),
    };

    if subject.kind.is_missile() {
        Some(Command::ConsumeMissile {
            missile: subject.id,
            impact,
        })
    } else {
        Some(Command::HaltActor { actor: subject.id })
    }
}
