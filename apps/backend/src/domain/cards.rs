//! Demand cards and the built-in card catalog.
//!
//! A demand card carries three demands; each names a city, a load and the
//! payment earned by delivering that load there. Card ids index into a
//! process-wide catalog; the deck itself (draw/discard/dealt tracking)
//! lives in `services::decks`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Commodity kinds that can be carried and delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadKind {
    Coal,
    Steel,
    Lumber,
    Grain,
    Cattle,
    Oil,
    Wine,
    Machinery,
}

impl LoadKind {
    pub const ALL: [LoadKind; 8] = [
        LoadKind::Coal,
        LoadKind::Steel,
        LoadKind::Lumber,
        LoadKind::Grain,
        LoadKind::Cattle,
        LoadKind::Oil,
        LoadKind::Wine,
        LoadKind::Machinery,
    ];
}

/// One demand on a card: deliver `load` to `city` for `payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub city: String,
    pub load: LoadKind,
    pub payment: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandCard {
    pub id: i64,
    pub demands: [Demand; 3],
}

/// Cities appearing on demand cards.
pub const CITIES: [&str; 12] = [
    "Northport",
    "Easton",
    "South Junction",
    "Westbrook",
    "Coalton",
    "Ridgefield",
    "Harborview",
    "Millbrae",
    "Fairmont",
    "Granger",
    "Oakdale",
    "Silver Creek",
];

/// Number of cards in the standard deck.
pub const DECK_SIZE: usize = 60;

static CATALOG: Lazy<Vec<DemandCard>> = Lazy::new(build_catalog);

// Deterministic catalog: stride through cities/loads with coprime steps so
// every card gets three distinct-looking demands without a data file.
fn build_catalog() -> Vec<DemandCard> {
    (0..DECK_SIZE)
        .map(|i| {
            let demands = [0usize, 1, 2].map(|k| {
                let city = CITIES[(i * 3 + k * 5) % CITIES.len()];
                let load = LoadKind::ALL[(i * 5 + k * 7) % LoadKind::ALL.len()];
                let payment = 8 + ((i * 7 + k * 11) % 28) as i64;
                Demand {
                    city: city.to_string(),
                    load,
                    payment,
                }
            });
            DemandCard {
                id: (i + 1) as i64,
                demands,
            }
        })
        .collect()
}

/// All card ids of the standard deck, in catalog order.
pub fn standard_deck() -> Vec<i64> {
    CATALOG.iter().map(|c| c.id).collect()
}

/// Look up a card definition by id.
pub fn card_by_id(id: i64) -> Option<&'static DemandCard> {
    if id < 1 || id as usize > CATALOG.len() {
        return None;
    }
    CATALOG.get(id as usize - 1)
}

/// Find the demand on `card` matching `(city, load)`, if any.
pub fn demand_for<'a>(card: &'a DemandCard, city: &str, load: LoadKind) -> Option<&'a Demand> {
    card.demands
        .iter()
        .find(|d| d.city == city && d.load == load)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_expected_size_and_ids() {
        let ids = standard_deck();
        assert_eq!(ids.len(), DECK_SIZE);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&(DECK_SIZE as i64)));
    }

    #[test]
    fn card_lookup_round_trips() {
        for id in standard_deck() {
            let card = card_by_id(id).expect("catalog card");
            assert_eq!(card.id, id);
            for demand in &card.demands {
                assert!(demand.payment > 0);
                assert!(CITIES.contains(&demand.city.as_str()));
            }
        }
        assert!(card_by_id(0).is_none());
        assert!(card_by_id(DECK_SIZE as i64 + 1).is_none());
    }

    #[test]
    fn demand_for_finds_matching_demand() {
        let card = card_by_id(1).unwrap();
        let demand = &card.demands[0];
        let found = demand_for(card, &demand.city, demand.load).expect("demand");
        assert_eq!(found.payment, demand.payment);
        assert!(demand_for(card, "Nowhere", demand.load).is_none());
    }
}
