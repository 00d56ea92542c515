//! Greedy single-step corridor walker.
//!
//! Each step moves to an admissible neighbor with the smallest Manhattan
//! distance to the target. Ties are broken uniformly at random, which shapes
//! the corridor distribution, so the first-best neighbor is never preferred.

use rand_chacha::rand_core::Rng;

use crate::error::GenerationFailure;
use crate::types::Coord;

use super::seed::choose;

/// Walks from `start` to `target`, calling `on_step(state, previous, next)`
/// for every move. `admissible` sees the state as mutated by earlier steps and
/// must reject out-of-bounds coordinates. Returns the number of steps taken.
pub fn walk<T, R, A, S>(
    state: &mut T,
    start: Coord,
    target: Coord,
    rng: &mut R,
    admissible: A,
    mut on_step: S,
) -> Result<usize, GenerationFailure>
where
    T: ?Sized,
    R: Rng + ?Sized,
    A: Fn(&T, Coord) -> bool,
    S: FnMut(&mut T, Coord, Coord),
{
    let mut current = start;
    let mut steps = 0;
    while current != target {
        let candidates: Vec<Coord> =
            current.neighbors().into_iter().filter(|&next| admissible(&*state, next)).collect();
        let Some(best_distance) = candidates.iter().map(|next| next.manhattan(target)).min()
        else {
            return Err(GenerationFailure::BlockedCorridor { at: current, target });
        };
        let closest: Vec<Coord> = candidates
            .into_iter()
            .filter(|next| next.manhattan(target) == best_distance)
            .collect();
        let Some(next) = choose(rng, &closest) else {
            return Err(GenerationFailure::BlockedCorridor { at: current, target });
        };
        on_step(state, current, next);
        current = next;
        steps += 1;
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::mapgen::seed::seeded_rng;

    struct Board {
        width: i32,
        height: i32,
        blocked: BTreeSet<Coord>,
        trail: Vec<(Coord, Coord)>,
    }

    impl Board {
        fn open(width: i32, height: i32) -> Self {
            Self { width, height, blocked: BTreeSet::new(), trail: Vec::new() }
        }

        fn allows(&self, coord: Coord) -> bool {
            coord.x >= 0
                && coord.y >= 0
                && coord.x < self.width
                && coord.y < self.height
                && !self.blocked.contains(&coord)
        }
    }

    fn carve(board: &mut Board, from: Coord, to: Coord) {
        board.trail.push((from, to));
        board.blocked.insert(to);
    }

    #[test]
    fn open_board_walk_takes_a_shortest_route() {
        let mut rng = seeded_rng(3);
        let mut board = Board::open(8, 8);
        let start = Coord::new(0, 0);
        let target = Coord::new(5, 3);
        board.blocked.insert(start);

        let steps = walk(&mut board, start, target, &mut rng, Board::allows, carve)
            .expect("open board never blocks");

        assert_eq!(steps, 8);
        assert_eq!(board.trail.len(), 8);
        assert_eq!(board.trail.first().map(|step| step.0), Some(start));
        assert_eq!(board.trail.last().map(|step| step.1), Some(target));
        for (from, to) in &board.trail {
            assert_eq!(from.manhattan(*to), 1);
        }
    }

    #[test]
    fn walk_to_own_position_takes_no_steps() {
        let mut rng = seeded_rng(1);
        let mut board = Board::open(4, 4);
        let steps = walk(&mut board, Coord::new(2, 2), Coord::new(2, 2), &mut rng, Board::allows, carve)
            .expect("degenerate walk");
        assert_eq!(steps, 0);
        assert!(board.trail.is_empty());
    }

    #[test]
    fn boxed_in_start_reports_blocked_corridor() {
        let mut rng = seeded_rng(1);
        let mut board = Board::open(3, 3);
        let start = Coord::new(0, 0);
        board.blocked.extend([Coord::new(1, 0), Coord::new(0, 1)]);

        let result = walk(&mut board, start, Coord::new(2, 2), &mut rng, Board::allows, carve);
        assert_eq!(
            result,
            Err(GenerationFailure::BlockedCorridor { at: start, target: Coord::new(2, 2) })
        );
    }

    #[test]
    fn walker_detours_when_closer_cells_are_blocked() {
        let mut rng = seeded_rng(11);
        let mut board = Board::open(3, 3);
        let start = Coord::new(0, 1);
        board.blocked.extend([start, Coord::new(1, 1)]);

        walk(&mut board, start, Coord::new(2, 1), &mut rng, Board::allows, carve)
            .expect("detour exists around the block");
        assert_eq!(board.trail.len(), 4);
        assert!(board.trail.iter().all(|(_, to)| *to != Coord::new(1, 1)));
    }

    #[test]
    fn ties_are_broken_across_all_closest_neighbors() {
        let mut seen_first_steps = BTreeSet::new();
        for seed in 0..64 {
            let mut rng = seeded_rng(seed);
            let mut board = Board::open(4, 4);
            walk(&mut board, Coord::new(0, 0), Coord::new(3, 3), &mut rng, Board::allows, carve)
                .expect("open board");
            seen_first_steps.insert(board.trail[0].1);
        }
        assert_eq!(
            seen_first_steps,
            BTreeSet::from([Coord::new(1, 0), Coord::new(0, 1)]),
            "both equally close first steps should be chosen for some seed"
        );
    }
}
