//! Corridor carving between coordinates and greedy nearest-pair spanning.

use rand_chacha::rand_core::Rng;

use crate::error::GenerationFailure;
use crate::types::{Coord, CorridorKind, Room};

use super::model::Map;
use super::walker::walk;

/// Carves a corridor from `from` to `to` through empty rooms only. Every step
/// is recorded as an edge of `kind`; rooms entered for the first time become
/// occupied. Returns the number of steps carved.
pub fn connect<R: Rng + ?Sized>(
    map: &mut Map,
    from: Coord,
    to: Coord,
    kind: CorridorKind,
    rng: &mut R,
) -> Result<usize, GenerationFailure> {
    if from == to {
        return Ok(0);
    }
    walk(map, from, to, rng, Map::is_vacant, |map, previous, current| {
        map.record_edge(kind, previous, current);
        if map.is_vacant(current) {
            map.occupy(current, Room::for_corridor(kind));
        }
    })
}

/// Attaches every coordinate in `not_yet_connected` to the growing
/// `connected` set, always carving the globally closest pair next.
/// Consumes both inputs and returns the final connected set.
pub fn span<R: Rng + ?Sized>(
    map: &mut Map,
    mut not_yet_connected: Vec<Coord>,
    mut connected: Vec<Coord>,
    kind: CorridorKind,
    rng: &mut R,
) -> Result<Vec<Coord>, GenerationFailure> {
    if connected.is_empty() {
        let Some(seed) = not_yet_connected.pop() else {
            return Ok(connected);
        };
        connected.push(seed);
    }

    while let Some((from, index)) = closest_pair(&connected, &not_yet_connected) {
        let to = not_yet_connected.swap_remove(index);
        connect(map, from, to, kind, rng)?;
        connected.push(to);
    }
    Ok(connected)
}

/// Full scan over both sets; the first strictly closer pair in scan order wins.
fn closest_pair(connected: &[Coord], candidates: &[Coord]) -> Option<(Coord, usize)> {
    let mut best: Option<(Coord, usize, u32)> = None;
    for &from in connected {
        for (index, &to) in candidates.iter().enumerate() {
            let distance = from.manhattan(to);
            if best.is_none_or(|(_, _, best_distance)| distance < best_distance) {
                best = Some((from, index, distance));
            }
        }
    }
    best.map(|(from, index, _)| (from, index))
}
