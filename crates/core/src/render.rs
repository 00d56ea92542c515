//! Plain-text picture of a generated map. Rooms sit on even columns and rows,
//! corridors fill the gaps between them. The top line is the largest `y`.

use crate::mapgen::Map;
use crate::types::{Coord, Edge, Room};

pub const BASE: char = 'B';
pub const BOSS: char = 'X';
pub const CRITICAL: char = 'C';
pub const BONUS: char = 'o';
pub const EMPTY: char = '.';

pub fn room_glyph(room: Room) -> char {
    if room.empty {
        EMPTY
    } else if room.base {
        BASE
    } else if room.boss {
        BOSS
    } else if room.critical {
        CRITICAL
    } else {
        BONUS
    }
}

pub fn render_text(map: &Map) -> String {
    let columns = (map.width() * 2).saturating_sub(1);
    let rows = (map.height() * 2).saturating_sub(1);
    let mut canvas = vec![vec![' '; columns]; rows];

    for edge in map.bonus_edges() {
        draw_edge(&mut canvas, map.height(), edge, '-', '|');
    }
    for edge in map.critical_edges() {
        draw_edge(&mut canvas, map.height(), edge, '=', 'H');
    }
    for y in 0..map.height() {
        for x in 0..map.width() {
            let Ok(room) = map.get(Coord::new(x as i32, y as i32)) else {
                continue;
            };
            canvas[(map.height() - 1 - y) * 2][x * 2] = room_glyph(room);
        }
    }

    let mut text = String::with_capacity(rows * (columns + 1));
    for row in canvas {
        let line: String = row.into_iter().collect();
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

fn draw_edge(canvas: &mut [Vec<char>], height: usize, edge: &Edge, across: char, along: char) {
    let (from, to) = (edge.from, edge.to);
    if from.manhattan(to) != 1 {
        return;
    }
    let flipped = |y: i32| 2 * (height as i32 - 1) - y;
    let (row, column, glyph) = if from.y == to.y {
        (flipped(2 * from.y), from.x + to.x, across)
    } else {
        (flipped(from.y + to.y), 2 * from.x, along)
    };
    if let Some(cell) = canvas.get_mut(row as usize).and_then(|line| line.get_mut(column as usize))
    {
        *cell = glyph;
    }
}
