//! Board positions and slots.

use serde::{Deserialize, Serialize};

use crate::cards::ModifierStore;
use crate::core::InstanceId;

/// A board coordinate. Row 0 is the front rank; column 0 is the left edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotPos {
    pub row: u8,
    pub col: u8,
}

impl SlotPos {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for SlotPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Named regions of the board a position can belong to.
///
/// Classes overlap: a slot can be Front and Corner and Edge at once. Each
/// class is checked independently against the board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionClass {
    /// Row 0.
    Front,
    /// Any row strictly between front and back.
    Middle,
    /// The last row.
    Back,
    /// The exact center slot; only exists when both dimensions are odd.
    Center,
    /// One of the four corner slots.
    Corner,
    /// On the boundary but not a corner.
    Edge,
}

impl PositionClass {
    /// Whether `pos` falls in this region of a `width` x `height` board.
    #[must_use]
    pub fn matches(self, pos: SlotPos, width: u8, height: u8) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let last_row = height - 1;
        let last_col = width - 1;
        let on_row_boundary = pos.row == 0 || pos.row == last_row;
        let on_col_boundary = pos.col == 0 || pos.col == last_col;

        match self {
            PositionClass::Front => pos.row == 0,
            PositionClass::Middle => pos.row > 0 && pos.row < last_row,
            PositionClass::Back => pos.row == last_row,
            PositionClass::Center => {
                width % 2 == 1
                    && height % 2 == 1
                    && pos.row == height / 2
                    && pos.col == width / 2
            }
            PositionClass::Corner => on_row_boundary && on_col_boundary,
            PositionClass::Edge => (on_row_boundary || on_col_boundary) && !(on_row_boundary && on_col_boundary),
        }
    }
}

/// One board cell: an optional occupant plus slot-local modifiers.
///
/// Slot modifiers persist across occupants; a card deployed into a
/// modified slot picks up the bonus for as long as it stands there.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Slot {
    pos: SlotPos,
    occupant: Option<InstanceId>,
    pub modifiers: ModifierStore,
}

impl Slot {
    #[must_use]
    pub fn new(pos: SlotPos) -> Self {
        Self {
            pos,
            occupant: None,
            modifiers: ModifierStore::new(),
        }
    }

    #[must_use]
    pub fn pos(&self) -> SlotPos {
        self.pos
    }

    #[must_use]
    pub fn occupant(&self) -> Option<InstanceId> {
        self.occupant
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn set_occupant(&mut self, occupant: Option<InstanceId>) {
        self.occupant = occupant;
    }
}
