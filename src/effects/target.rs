//! Target resolution.
//!
//! A `TargetSpec` pairs a spatial range with an optional card filter and
//! resolves, relative to a source card, to the occupants of the matching
//! slots. Resolution is deterministic: candidate slots are visited in
//! row-major order and empty slots are dropped before filtering. Only the
//! Random range consumes session randomness.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{PositionClass, SlotPos};
use crate::cards::{CardTrait, Rarity};
use crate::core::{CardId, InstanceId};
use crate::world::World;

/// Spatial range of a targeted effect, relative to the source card's slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRange {
    /// The eight slots surrounding the source.
    Adjacent,
    /// The source's entire row.
    Row,
    /// The source's entire column.
    Column,
    /// The front rank.
    Front,
    /// Rows strictly between front and back.
    Middle,
    /// The back rank.
    Back,
    /// The center slot, when the board has one.
    Center,
    /// The four diagonal neighbors of the source.
    Diagonal,
    /// The four corner slots.
    Corner,
    /// Boundary slots that are not corners.
    Edge,
    /// One uniformly random occupied slot.
    Random,
    /// Every slot on the board.
    All,
}

/// Card-level filter applied after range resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TargetFilter {
    /// Match a specific card definition.
    Id(CardId),
    /// Match by exact template name.
    Name(String),
    /// Match templates whose name contains the fragment.
    NameContains(String),
    /// Match by rarity.
    Rarity(Rarity),
    /// Match cards carrying the trait. The `None` trait matches nothing.
    Trait(CardTrait),
}

impl TargetFilter {
    fn matches(&self, world: &World, id: InstanceId) -> bool {
        let Some(instance) = world.card(id) else {
            return false;
        };
        let Some(template) = world.registry.get(instance.card()) else {
            return false;
        };
        match self {
            TargetFilter::Id(card) => instance.card() == *card,
            TargetFilter::Name(name) => template.name() == name,
            TargetFilter::NameContains(fragment) => template.name().contains(fragment.as_str()),
            TargetFilter::Rarity(rarity) => template.rarity() == *rarity,
            TargetFilter::Trait(CardTrait::None) => false,
            TargetFilter::Trait(card_trait) => template.has_trait(*card_trait),
        }
    }
}

/// A complete target specification: range plus optional filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub range: TargetRange,
    pub filter: Option<TargetFilter>,
}

impl TargetSpec {
    #[must_use]
    pub fn new(range: TargetRange) -> Self {
        Self { range, filter: None }
    }

    /// Attach a filter (builder pattern).
    #[must_use]
    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Resolve to the occupants of the matching slots, in row-major order.
    ///
    /// Source-relative ranges resolve to nothing when the source card has
    /// no slot. The source itself is a valid target when its slot falls in
    /// range (a card in the front rank is hit by its own Front effect).
    #[must_use]
    pub fn resolve(&self, world: &mut World, source: InstanceId) -> SmallVec<[InstanceId; 8]> {
        let positions = self.candidate_positions(world, source);

        let mut targets: SmallVec<[InstanceId; 8]> = positions
            .into_iter()
            .filter_map(|pos| world.board.get(pos).and_then(|slot| slot.occupant()))
            .collect();

        if let Some(filter) = &self.filter {
            targets.retain(|&mut id| filter.matches(world, id));
        }
        targets
    }

    fn candidate_positions(&self, world: &mut World, source: InstanceId) -> Vec<SlotPos> {
        let source_slot = world.card(source).and_then(|card| card.slot());

        match self.range {
            TargetRange::Adjacent => source_slot
                .map(|pos| world.board.neighbors(pos).to_vec())
                .unwrap_or_default(),
            TargetRange::Diagonal => source_slot
                .map(|pos| world.board.diagonal_neighbors(pos).to_vec())
                .unwrap_or_default(),
            TargetRange::Row => source_slot
                .map(|pos| world.board.row(pos.row).collect())
                .unwrap_or_default(),
            TargetRange::Column => source_slot
                .map(|pos| world.board.column(pos.col).collect())
                .unwrap_or_default(),
            TargetRange::Front => world.board.positions_in_class(PositionClass::Front),
            TargetRange::Middle => world.board.positions_in_class(PositionClass::Middle),
            TargetRange::Back => world.board.positions_in_class(PositionClass::Back),
            TargetRange::Center => world.board.positions_in_class(PositionClass::Center),
            TargetRange::Corner => world.board.positions_in_class(PositionClass::Corner),
            TargetRange::Edge => world.board.positions_in_class(PositionClass::Edge),
            TargetRange::All => world.board.positions().collect(),
            TargetRange::Random => {
                let occupied = world.board.occupied_positions();
                world.rng.choose(&occupied).copied().into_iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardTemplate, Rarity};
    use crate::world::World;

    fn world_with_cards() -> (World, Vec<InstanceId>) {
        let mut world = World::new(3, 3, 42);
        world.registry.register(
            CardTemplate::new(CardId::new(1), "Scout Drone", Rarity::Common)
                .with_trait(CardTrait::Mechanical),
        );
        world
            .registry
            .register(CardTemplate::new(CardId::new(2), "War Golem", Rarity::Epic));

        let mut ids = Vec::new();
        for (card, pos) in [
            (1, SlotPos::new(0, 0)),
            (1, SlotPos::new(0, 2)),
            (2, SlotPos::new(1, 1)),
            (2, SlotPos::new(2, 1)),
        ] {
            let id = world.spawn(CardId::new(card)).unwrap();
            assert!(world.deploy(id, pos).unwrap());
            ids.push(id);
        }
        (world, ids)
    }

    #[test]
    fn test_row_targets_in_column_order() {
        let (mut world, ids) = world_with_cards();
        // Source at (0, 2); its row holds (0, 0) and (0, 2)
        let spec = TargetSpec::new(TargetRange::Row);
        let targets = spec.resolve(&mut world, ids[1]);
        assert_eq!(targets.as_slice(), &[ids[0], ids[1]]);
    }

    #[test]
    fn test_column_targets_in_row_order() {
        let (mut world, ids) = world_with_cards();
        let spec = TargetSpec::new(TargetRange::Column);
        let targets = spec.resolve(&mut world, ids[2]);
        assert_eq!(targets.as_slice(), &[ids[2], ids[3]]);
    }

    #[test]
    fn test_adjacent_drops_empty_slots() {
        let (mut world, ids) = world_with_cards();
        let spec = TargetSpec::new(TargetRange::Adjacent);
        let targets = spec.resolve(&mut world, ids[2]);
        // Neighbors of (1, 1): occupied are (0, 0), (0, 2), (2, 1)
        assert_eq!(targets.as_slice(), &[ids[0], ids[1], ids[3]]);
    }

    #[test]
    fn test_undeployed_source_has_no_relative_targets() {
        let (mut world, _) = world_with_cards();
        let loose = world.spawn(CardId::new(1)).unwrap();
        for range in [TargetRange::Adjacent, TargetRange::Row, TargetRange::Column] {
            assert!(TargetSpec::new(range).resolve(&mut world, loose).is_empty());
        }
    }

    #[test]
    fn test_filter_by_trait() {
        let (mut world, ids) = world_with_cards();
        let spec = TargetSpec::new(TargetRange::All)
            .with_filter(TargetFilter::Trait(CardTrait::Mechanical));
        let targets = spec.resolve(&mut world, ids[0]);
        assert_eq!(targets.as_slice(), &[ids[0], ids[1]]);
    }

    #[test]
    fn test_none_trait_matches_nothing() {
        let (mut world, ids) = world_with_cards();
        let spec =
            TargetSpec::new(TargetRange::All).with_filter(TargetFilter::Trait(CardTrait::None));
        assert!(spec.resolve(&mut world, ids[0]).is_empty());
    }

    #[test]
    fn test_filter_by_name_contains() {
        let (mut world, ids) = world_with_cards();
        let spec = TargetSpec::new(TargetRange::All)
            .with_filter(TargetFilter::NameContains("Golem".to_string()));
        let targets = spec.resolve(&mut world, ids[0]);
        assert_eq!(targets.as_slice(), &[ids[2], ids[3]]);
    }

    #[test]
    fn test_random_picks_one_occupant() {
        let (mut world, _) = world_with_cards();
        let spec = TargetSpec::new(TargetRange::Random);
        let source = world.board.get(SlotPos::new(1, 1)).unwrap().occupant().unwrap();
        let targets = spec.resolve(&mut world, source);
        assert_eq!(targets.len(), 1);
        assert!(world.card(targets[0]).is_some());
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let (mut world_a, _) = world_with_cards();
        let (mut world_b, _) = world_with_cards();
        let source_a = world_a.board.occupants()[0];
        let source_b = world_b.board.occupants()[0];

        let spec = TargetSpec::new(TargetRange::Random);
        for _ in 0..5 {
            assert_eq!(
                spec.resolve(&mut world_a, source_a),
                spec.resolve(&mut world_b, source_b)
            );
        }
    }
}
