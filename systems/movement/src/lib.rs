#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that tweens actors toward their target cell.
//!
//! Each frame an actor's live pixel position advances by `speed + delta`
//! along the axis its facing selects. A step that would pass the target is
//! clamped onto it exactly, which keeps the exact-equality arrival test
//! reliable without an epsilon.

use glam::Vec2;
use tank_field_core::{ActorSnapshot, Command, Direction, FieldGrid};

/// Result of integrating one actor for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The live position already equals the target cell's pixel position.
    Arrived,
    /// The live position moved toward the target cell.
    Advanced {
        /// Live position after this frame.
        position: Vec2,
    },
}

/// Computes the next live position of `subject` for a frame of length `delta`.
#[must_use]
pub fn advance(subject: &ActorSnapshot, delta: f32, grid: &FieldGrid) -> Step {
    let target = grid.cell_to_pixel(subject.move_to_cell);
    let current = subject.position;
    if current == target {
        return Step::Arrived;
    }

    let distance = subject.speed + delta;
    let mut next = current;
    match subject.facing {
        Direction::North => next.y = (current.y - distance).max(target.y),
        Direction::South => next.y = (current.y + distance).min(target.y),
        Direction::West => next.x = (current.x - distance).max(target.x),
        Direction::East => next.x = (current.x + distance).min(target.x),
    }

    Step::Advanced { position: next }
}

/// Emits the commands that apply one frame of movement to `subject`.
///
/// On arrival the movement episode ends; missiles are immediately relaunched
/// along their facing so they keep travelling until they hit something.
pub fn integrate(subject: &ActorSnapshot, delta: f32, grid: &FieldGrid, out: &mut Vec<Command>) {
    match advance(subject, delta, grid) {
        Step::Arrived => {
            out.push(Command::FinishMove { actor: subject.id });
            if subject.kind.is_missile() {
                out.push(Command::MoveActor {
                    actor: subject.id,
                    facing: subject.facing,
                });
            }
        }
        Step::Advanced { position } => out.push(Command::SetPosition {
            actor: subject.id,
            position,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tank_field_core::{ActorId, ActorKind, CellCoord};

    fn grid() -> FieldGrid {
        FieldGrid::new(10, 10, 32.0)
    }

    fn moving_tank(from: CellCoord, facing: Direction, speed: f32) -> ActorSnapshot {
        ActorSnapshot {
            id: ActorId::new(1),
            kind: ActorKind::Tank,
            position_cell: from,
            move_to_cell: from.step(facing),
            position: grid().cell_to_pixel(from),
            facing,
            speed,
            is_moving: true,
            is_damagable: true,
            is_destroyed: false,
        }
    }

    fn run_until_arrival(mut subject: ActorSnapshot, delta: f32) -> (ActorSnapshot, usize) {
        for frame in 0..1_000 {
            match advance(&subject, delta, &grid()) {
                Step::Arrived => return (subject, frame),
                Step::Advanced { position } => subject.position = position,
            }
        }
        panic!("actor never arrived");
    }

    #[test]
    fn single_frame_advances_by_speed_plus_delta() {
        let tank = moving_tank(CellCoord::new(5, 5), Direction::East, 4.0);

        let step = advance(&tank, 1.0, &grid());

        assert_eq!(
            step,
            Step::Advanced {
                position: Vec2::new(165.0, 160.0)
            }
        );
    }

    #[test]
    fn converges_exactly_on_target_without_overshoot() {
        let tank = moving_tank(CellCoord::new(5, 5), Direction::East, 4.0);

        let (arrived, frames) = run_until_arrival(tank, 1.0);

        assert_eq!(arrived.position, Vec2::new(192.0, 160.0));
        // 32px at 5px per frame: six full steps and one clamped step.
        assert_eq!(frames, 7);
    }

    #[test]
    fn overshooting_step_is_clamped_onto_target() {
        let mut tank = moving_tank(CellCoord::new(3, 3), Direction::North, 10.0);
        tank.position.y = 68.0;

        let step = advance(&tank, 0.5, &grid());

        assert_eq!(
            step,
            Step::Advanced {
                position: Vec2::new(96.0, 64.0)
            }
        );
    }

    #[test]
    fn only_the_facing_axis_changes() {
        for facing in [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ] {
            let tank = moving_tank(CellCoord::new(5, 5), facing, 3.0);
            let Step::Advanced { position } = advance(&tank, 0.25, &grid()) else {
                panic!("expected movement for {facing:?}");
            };

            if facing.is_vertical() {
                assert_eq!(position.x, tank.position.x, "{facing:?} moved the column axis");
                assert_ne!(position.y, tank.position.y);
            } else {
                assert_eq!(position.y, tank.position.y, "{facing:?} moved the row axis");
                assert_ne!(position.x, tank.position.x);
            }
        }
    }

    #[test]
    fn every_direction_reaches_its_neighbour() {
        for facing in [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ] {
            let tank = moving_tank(CellCoord::new(5, 5), facing, 1.5);
            let (arrived, _) = run_until_arrival(tank, 0.75);
            assert_eq!(arrived.position, grid().cell_to_pixel(tank.move_to_cell));
        }
    }

    #[test]
    fn arriving_tank_finishes_its_move() {
        let mut tank = moving_tank(CellCoord::new(5, 5), Direction::West, 2.0);
        tank.position = grid().cell_to_pixel(tank.move_to_cell);
        let mut out = Vec::new();

        integrate(&tank, 1.0, &grid(), &mut out);

        assert_eq!(out, vec![Command::FinishMove { actor: tank.id }]);
    }

    #[test]
    fn arriving_missile_is_relaunched_along_its_facing() {
        let mut missile = moving_tank(CellCoord::new(5, 5), Direction::South, 8.0);
        missile.kind = ActorKind::Missile {
            owner: ActorId::new(9),
        };
        missile.position = grid().cell_to_pixel(missile.move_to_cell);
        let mut out = Vec::new();

        integrate(&missile, 1.0, &grid(), &mut out);

        assert_eq!(
            out,
            vec![
                Command::FinishMove { actor: missile.id },
                Command::MoveActor {
                    actor: missile.id,
                    facing: Direction::South,
                },
            ]
        );
    }

    #[test]
    fn travelling_actor_emits_position_update() {
        let tank = moving_tank(CellCoord::new(2, 2), Direction::South, 4.0);
        let mut out = Vec::new();

        integrate(&tank, 1.0, &grid(), &mut out);

        assert_eq!(
            out,
            vec![Command::SetPosition {
                actor: tank.id,
                position: Vec2::new(64.0, 69.0),
            }]
        );
    }
}
