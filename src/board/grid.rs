//! The deployment grid.
//!
//! A rectangular grid of slots stored row-major. Every query that yields
//! multiple positions returns them in row-major order (row ascending, then
//! column ascending) so that effect resolution is deterministic; the only
//! randomness on the board goes through the session RNG explicitly.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::slot::{PositionClass, Slot, SlotPos};
use crate::core::{GameRng, InstanceId};

/// All eight neighbor offsets in row-major order.
const NEIGHBOR_OFFSETS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The four diagonal offsets in row-major order.
const DIAGONAL_OFFSETS: [(i16, i16); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// A `width` x `height` grid of slots.
///
/// Cloning a board is the snapshot mechanism for redeploys; slot modifier
/// tables share structure, so clones are cheap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    width: u8,
    height: u8,
    slots: Vec<Slot>,
}

impl Board {
    /// Create an empty board. Zero dimensions yield a board with no slots.
    #[must_use]
    pub fn new(width: u8, height: u8) -> Self {
        let mut slots = Vec::with_capacity(usize::from(width) * usize::from(height));
        for row in 0..height {
            for col in 0..width {
                slots.push(Slot::new(SlotPos::new(row, col)));
            }
        }
        Self { width, height, slots }
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u8 {
        self.height
    }

    fn index(&self, pos: SlotPos) -> Option<usize> {
        if pos.row < self.height && pos.col < self.width {
            Some(usize::from(pos.row) * usize::from(self.width) + usize::from(pos.col))
        } else {
            None
        }
    }

    #[must_use]
    pub fn get(&self, pos: SlotPos) -> Option<&Slot> {
        self.index(pos).map(|i| &self.slots[i])
    }

    pub fn get_mut(&mut self, pos: SlotPos) -> Option<&mut Slot> {
        self.index(pos).map(move |i| &mut self.slots[i])
    }

    /// Place an occupant. Returns false if the position is off-board or
    /// already occupied.
    pub fn place(&mut self, pos: SlotPos, occupant: InstanceId) -> bool {
        match self.get_mut(pos) {
            Some(slot) if slot.is_empty() => {
                slot.set_occupant(Some(occupant));
                true
            }
            _ => false,
        }
    }

    /// Clear a slot, returning the previous occupant if any.
    pub fn remove(&mut self, pos: SlotPos) -> Option<InstanceId> {
        let slot = self.get_mut(pos)?;
        let occupant = slot.occupant();
        slot.set_occupant(None);
        occupant
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = SlotPos> + '_ {
        self.slots.iter().map(Slot::pos)
    }

    /// Positions of row `row`, column ascending.
    pub fn row(&self, row: u8) -> impl Iterator<Item = SlotPos> + '_ {
        (0..self.width)
            .map(move |col| SlotPos::new(row, col))
            .filter(move |_| row < self.height)
    }

    /// Positions of column `col`, row ascending.
    pub fn column(&self, col: u8) -> impl Iterator<Item = SlotPos> + '_ {
        (0..self.height)
            .map(move |row| SlotPos::new(row, col))
            .filter(move |_| col < self.width)
    }

    /// The up-to-eight neighbors of `pos`, in row-major order.
    #[must_use]
    pub fn neighbors(&self, pos: SlotPos) -> SmallVec<[SlotPos; 8]> {
        self.offsets_of(pos, &NEIGHBOR_OFFSETS)
    }

    /// The up-to-four diagonal neighbors of `pos`, in row-major order.
    #[must_use]
    pub fn diagonal_neighbors(&self, pos: SlotPos) -> SmallVec<[SlotPos; 8]> {
        self.offsets_of(pos, &DIAGONAL_OFFSETS)
    }

    fn offsets_of(&self, pos: SlotPos, offsets: &[(i16, i16)]) -> SmallVec<[SlotPos; 8]> {
        let mut out = SmallVec::new();
        for &(dr, dc) in offsets {
            let row = i16::from(pos.row) + dr;
            let col = i16::from(pos.col) + dc;
            if row >= 0 && col >= 0 {
                let candidate = SlotPos::new(row as u8, col as u8);
                if self.index(candidate).is_some() {
                    out.push(candidate);
                }
            }
        }
        out
    }

    /// Positions falling in a region, row-major.
    #[must_use]
    pub fn positions_in_class(&self, class: PositionClass) -> Vec<SlotPos> {
        self.positions()
            .filter(|&pos| class.matches(pos, self.width, self.height))
            .collect()
    }

    /// Occupants in row-major board order.
    #[must_use]
    pub fn occupants(&self) -> Vec<InstanceId> {
        self.slots.iter().filter_map(Slot::occupant).collect()
    }

    /// Occupied positions in row-major board order.
    #[must_use]
    pub fn occupied_positions(&self) -> Vec<SlotPos> {
        self.slots
            .iter()
            .filter(|slot| !slot.is_empty())
            .map(Slot::pos)
            .collect()
    }

    /// A uniformly random empty slot, or `None` if the board is full.
    pub fn random_empty_slot(&self, rng: &mut GameRng) -> Option<SlotPos> {
        let empty: Vec<SlotPos> = self
            .slots
            .iter()
            .filter(|slot| slot.is_empty())
            .map(Slot::pos)
            .collect();
        rng.choose(&empty).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::new(3, 3);
        let pos = SlotPos::new(1, 1);

        assert!(board.place(pos, InstanceId::new(1)));
        assert_eq!(board.get(pos).and_then(Slot::occupant), Some(InstanceId::new(1)));

        // Occupied slot rejects a second occupant
        assert!(!board.place(pos, InstanceId::new(2)));

        assert_eq!(board.remove(pos), Some(InstanceId::new(1)));
        assert!(board.get(pos).is_some_and(Slot::is_empty));
    }

    #[test]
    fn test_place_off_board() {
        let mut board = Board::new(2, 2);
        assert!(!board.place(SlotPos::new(5, 0), InstanceId::new(1)));
    }

    #[test]
    fn test_row_and_column_order() {
        let board = Board::new(3, 4);

        let row: Vec<_> = board.row(2).collect();
        assert_eq!(
            row,
            vec![SlotPos::new(2, 0), SlotPos::new(2, 1), SlotPos::new(2, 2)]
        );

        let col: Vec<_> = board.column(1).collect();
        assert_eq!(
            col,
            vec![
                SlotPos::new(0, 1),
                SlotPos::new(1, 1),
                SlotPos::new(2, 1),
                SlotPos::new(3, 1)
            ]
        );
    }

    #[test]
    fn test_neighbors_center() {
        let board = Board::new(3, 3);
        let neighbors = board.neighbors(SlotPos::new(1, 1));

        assert_eq!(
            neighbors.as_slice(),
            &[
                SlotPos::new(0, 0),
                SlotPos::new(0, 1),
                SlotPos::new(0, 2),
                SlotPos::new(1, 0),
                SlotPos::new(1, 2),
                SlotPos::new(2, 0),
                SlotPos::new(2, 1),
                SlotPos::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_neighbors_corner_clipped() {
        let board = Board::new(3, 3);
        let neighbors = board.neighbors(SlotPos::new(0, 0));

        assert_eq!(
            neighbors.as_slice(),
            &[SlotPos::new(0, 1), SlotPos::new(1, 0), SlotPos::new(1, 1)]
        );
    }

    #[test]
    fn test_diagonal_neighbors() {
        let board = Board::new(3, 3);
        let diagonals = board.diagonal_neighbors(SlotPos::new(1, 1));

        assert_eq!(
            diagonals.as_slice(),
            &[
                SlotPos::new(0, 0),
                SlotPos::new(0, 2),
                SlotPos::new(2, 0),
                SlotPos::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_occupants_row_major() {
        let mut board = Board::new(3, 3);
        board.place(SlotPos::new(2, 0), InstanceId::new(3));
        board.place(SlotPos::new(0, 1), InstanceId::new(1));
        board.place(SlotPos::new(1, 2), InstanceId::new(2));

        assert_eq!(
            board.occupants(),
            vec![InstanceId::new(1), InstanceId::new(2), InstanceId::new(3)]
        );
    }

    #[test]
    fn test_random_empty_slot() {
        let mut rng = GameRng::new(42);
        let mut board = Board::new(2, 1);
        board.place(SlotPos::new(0, 0), InstanceId::new(1));

        assert_eq!(board.random_empty_slot(&mut rng), Some(SlotPos::new(0, 1)));

        board.place(SlotPos::new(0, 1), InstanceId::new(2));
        assert_eq!(board.random_empty_slot(&mut rng), None);
    }

    #[test]
    fn test_snapshot_restore_via_clone() {
        let mut board = Board::new(2, 2);
        board.place(SlotPos::new(0, 0), InstanceId::new(1));

        let snapshot = board.clone();
        board.place(SlotPos::new(1, 1), InstanceId::new(2));
        board.remove(SlotPos::new(0, 0));

        let restored = snapshot;
        assert_eq!(restored.occupants(), vec![InstanceId::new(1)]);
    }
}
