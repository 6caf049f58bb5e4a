use crate::config::{ItemWeight, ItemWeights};
use crate::snapshot::ShopItem;

/// Result of scoring the shop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemChoice {
    /// Index of the first maximal item (0 for an empty shop).
    pub index: usize,
    /// Weight of that item; 0 means nothing worth taking.
    pub weight: u32,
    /// Identifiers neither in the table nor ball-like, for later curation.
    pub unknown: Vec<String>,
}

impl ItemChoice {
    pub fn is_worth_taking(&self) -> bool {
        self.weight > 0
    }
}

/// Picks the highest-weighted shop item.
///
/// Ties resolve to the first maximal index. Unknown identifiers weigh 0 and
/// are reported in [`ItemChoice::unknown`].
pub fn select_item(items: &[ShopItem], weights: &ItemWeights) -> ItemChoice {
    let mut choice = ItemChoice::default();

    for (index, item) in items.iter().enumerate() {
        let lookup = weights.lookup(&item.id);
        if lookup == ItemWeight::Unknown {
            tracing::debug!(item = %item.id, "unknown shop item");
            choice.unknown.push(item.id.clone());
        }

        let weight = lookup.value();
        if weight > choice.weight {
            choice.index = index;
            choice.weight = weight;
        }
    }

    choice
}
