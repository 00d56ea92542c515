//! Bounded room grid with corridor records and cached landmark coordinates.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::MapError;
use crate::types::{Coord, CorridorKind, Edge, Room};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Map {
    width: usize,
    height: usize,
    rooms: Vec<Room>,
    critical_edges: Vec<Edge>,
    bonus_edges: Vec<Edge>,
    base_coord: Option<Coord>,
    boss_coord: Option<Coord>,
    occupied_count: usize,
}

impl Map {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rooms: vec![Room::EMPTY; width * height],
            critical_edges: Vec::new(),
            bonus_edges: Vec::new(),
            base_coord: None,
            boss_coord: None,
            occupied_count: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    fn index_of(&self, coord: Coord) -> Result<usize, MapError> {
        if !self.in_bounds(coord) {
            return Err(MapError::OutOfBounds { coord, width: self.width, height: self.height });
        }
        Ok((coord.y as usize) * self.width + (coord.x as usize))
    }

    fn coord_at(&self, index: usize) -> Coord {
        Coord { x: (index % self.width) as i32, y: (index / self.width) as i32 }
    }

    pub fn get(&self, coord: Coord) -> Result<Room, MapError> {
        Ok(self.rooms[self.index_of(coord)?])
    }

    /// True only for in-bounds coordinates whose room is still empty.
    pub fn is_vacant(&self, coord: Coord) -> bool {
        self.get(coord).is_ok_and(|room| room.empty)
    }

    pub fn set(&mut self, coord: Coord, room: Room) -> Result<(), MapError> {
        let index = self.index_of(coord)?;
        if room.boss
            && let Some(existing) = self.boss_coord.filter(|&existing| existing != coord)
        {
            return Err(MapError::DuplicateBoss { existing, attempted: coord });
        }
        if room.base {
            if !room.critical {
                return Err(MapError::BaseNotCritical { coord });
            }
            if let Some(existing) = self.base_coord.filter(|&existing| existing != coord) {
                return Err(MapError::DuplicateBase { existing, attempted: coord });
            }
        }

        let previous = self.rooms[index];
        if previous.is_occupied() && room.empty {
            return Err(MapError::RoomVacated { coord });
        }
        if (previous.boss && !room.boss) || (previous.base && !room.base) {
            return Err(MapError::LandmarkOverwritten { coord });
        }

        if previous.empty {
            self.occupied_count += 1;
        }
        if room.boss {
            self.boss_coord = Some(coord);
        }
        if room.base {
            self.base_coord = Some(coord);
        }
        self.rooms[index] = room;
        Ok(())
    }

    /// Promotes an existing critical room to the base.
    pub fn mark_base(&mut self, coord: Coord) -> Result<(), MapError> {
        let room = self.get(coord)?;
        if room.empty || !room.critical {
            return Err(MapError::BaseNotCritical { coord });
        }
        self.set(coord, Room { base: true, ..room })
    }

    /// Fills a vacant in-bounds slot with a corridor room. Occupied and
    /// out-of-bounds coordinates are left untouched.
    pub(crate) fn occupy(&mut self, coord: Coord, room: Room) {
        debug_assert!(!room.boss && !room.base && room.is_occupied());
        if let Ok(index) = self.index_of(coord)
            && self.rooms[index].empty
        {
            self.rooms[index] = room;
            self.occupied_count += 1;
        }
    }

    pub(crate) fn record_edge(&mut self, kind: CorridorKind, from: Coord, to: Coord) {
        let edge = Edge { from, to };
        match kind {
            CorridorKind::Critical => self.critical_edges.push(edge),
            CorridorKind::Bonus => self.bonus_edges.push(edge),
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied_count
    }

    pub fn critical_count(&self) -> usize {
        self.rooms.iter().filter(|room| room.is_occupied() && room.critical).count()
    }

    pub fn critical_coords(&self) -> Vec<Coord> {
        self.coords_where(|room| room.is_occupied() && room.critical)
    }

    /// Occupied coordinates that new branches may attach to. The boss is a
    /// path endpoint and never a hub.
    pub fn branchable(&self) -> Vec<Coord> {
        self.coords_where(|room| room.is_occupied() && !room.boss)
    }

    pub fn empty_coords(&self) -> Vec<Coord> {
        self.coords_where(|room| room.empty)
    }

    fn coords_where(&self, predicate: impl Fn(&Room) -> bool) -> Vec<Coord> {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| predicate(room))
            .map(|(index, _)| self.coord_at(index))
            .collect()
    }

    pub fn critical_edges(&self) -> &[Edge] {
        &self.critical_edges
    }

    pub fn bonus_edges(&self) -> &[Edge] {
        &self.bonus_edges
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.critical_edges.iter().chain(self.bonus_edges.iter())
    }

    pub fn base_coord(&self) -> Option<Coord> {
        self.base_coord
    }

    pub fn boss_coord(&self) -> Option<Coord> {
        self.boss_coord
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.push(
                u8::from(room.empty)
                    | (u8::from(room.critical) << 1)
                    | (u8::from(room.base) << 2)
                    | (u8::from(room.boss) << 3),
            );
        }
        for landmark in [self.base_coord, self.boss_coord] {
            match landmark {
                Some(coord) => {
                    bytes.push(1);
                    bytes.extend(coord.x.to_le_bytes());
                    bytes.extend(coord.y.to_le_bytes());
                }
                None => bytes.push(0),
            }
        }
        for edges in [&self.critical_edges, &self.bonus_edges] {
            bytes.extend((edges.len() as u32).to_le_bytes());
            for edge in edges {
                bytes.extend(edge.from.x.to_le_bytes());
                bytes.extend(edge.from.y.to_le_bytes());
                bytes.extend(edge.to.x.to_le_bytes());
                bytes.extend(edge.to.y.to_le_bytes());
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
