//! Static type × rarity cost lookup.

use super::definition::{CardType, Rarity};

/// Cost lookup. Card cost is always derived from here, never trusted from
/// content.
///
/// | type   | common | uncommon | rare | legendary |
/// |--------|--------|----------|------|-----------|
/// | ATTACK | 2      | 3        | 4    | 5         |
/// | MEDIA  | 3      | 4        | 5    | 6         |
/// | ZONE   | 4      | 5        | 6    | 7         |
pub struct CostTable;

impl CostTable {
    const TABLE: [[u32; 4]; 3] = [[2, 3, 4, 5], [3, 4, 5, 6], [4, 5, 6, 7]];

    #[must_use]
    pub const fn cost(card_type: CardType, rarity: Rarity) -> u32 {
        let row = match card_type {
            CardType::Attack => 0,
            CardType::Media => 1,
            CardType::Zone => 2,
        };
        let col = match rarity {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Legendary => 3,
        };
        Self::TABLE[row][col]
    }
}
