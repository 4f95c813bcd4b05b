//! Players and their disc stock

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::disc::DiscKind;

/// Player seat. Serialized as the numeric id (1 or 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerId {
    One = 1,
    Two = 2,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Numeric id (1 or 2)
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Slot in two-element arrays indexed by player
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(format!("player id must be 1 or 2, got {}", other)),
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> u8 {
        id.number()
    }
}

/// Disc stock per kind. Counts only change through `consume` and `add`,
/// so they can never go negative.
///
/// Loaded keys go through [`DiscKind::from_name_lenient`]; entries that map
/// to the same kind are summed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "FxHashMap<String, u32>", into = "FxHashMap<DiscKind, u32>")]
pub struct Inventory {
    counts: FxHashMap<DiscKind, u32>,
}

impl Inventory {
    /// Empty stock (zero of every kind)
    pub fn new() -> Self {
        let counts = DiscKind::ALL.iter().map(|&kind| (kind, 0)).collect();
        Self { counts }
    }

    pub fn count(&self, kind: DiscKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn can_use(&self, kind: DiscKind) -> bool {
        self.count(kind) > 0
    }

    /// Take one disc of `kind`. Returns false (and changes nothing) when none are left.
    pub fn consume(&mut self, kind: DiscKind) -> bool {
        match self.counts.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Credit `amount` discs of `kind`; saturates at `u32::MAX`
    pub fn add(&mut self, kind: DiscKind, amount: u32) {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Total discs across all kinds
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Kinds with at least one disc, in `DiscKind::ALL` order
    pub fn available_kinds(&self) -> impl Iterator<Item = DiscKind> + '_ {
        DiscKind::ALL.into_iter().filter(|&kind| self.can_use(kind))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        DiscKind::ALL
            .iter()
            .all(|&kind| self.count(kind) == other.count(kind))
    }
}

impl Eq for Inventory {}

impl From<FxHashMap<DiscKind, u32>> for Inventory {
    fn from(loaded: FxHashMap<DiscKind, u32>) -> Self {
        let mut inventory = Inventory::new();
        for (kind, count) in loaded {
            inventory.add(kind, count);
        }
        inventory
    }
}

impl From<FxHashMap<String, u32>> for Inventory {
    fn from(loaded: FxHashMap<String, u32>) -> Self {
        let mut inventory = Inventory::new();
        for (name, count) in loaded {
            inventory.add(DiscKind::from_name_lenient(&name), count);
        }
        inventory
    }
}

impl From<Inventory> for FxHashMap<DiscKind, u32> {
    fn from(inventory: Inventory) -> Self {
        inventory.counts
    }
}

/// A seat at the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub inventory: Inventory,
    pub is_computer: bool,
}

impl Player {
    pub fn human(id: PlayerId) -> Self {
        Self {
            id,
            inventory: Inventory::new(),
            is_computer: false,
        }
    }

    pub fn computer(id: PlayerId) -> Self {
        Self {
            id,
            inventory: Inventory::new(),
            is_computer: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
        assert_eq!(PlayerId::Two.number(), 2);
    }

    #[test]
    fn test_player_id_from_number() {
        assert_eq!(PlayerId::try_from(1), Ok(PlayerId::One));
        assert!(PlayerId::try_from(3).is_err());
    }

    #[test]
    fn test_consume_never_goes_negative() {
        let mut inv = Inventory::new();
        inv.add(DiscKind::Boring, 1);
        assert!(inv.consume(DiscKind::Boring));
        assert!(!inv.consume(DiscKind::Boring));
        assert_eq!(inv.count(DiscKind::Boring), 0);
        assert!(!inv.consume(DiscKind::Magnetic));
    }

    #[test]
    fn test_inventory_equality_ignores_missing_zero_entries() {
        let mut sparse = FxHashMap::default();
        sparse.insert(DiscKind::Ordinary, 3);
        let loaded = Inventory::from(sparse);

        let mut built = Inventory::new();
        built.add(DiscKind::Ordinary, 3);
        assert_eq!(loaded, built);
        assert_eq!(loaded.total(), 3);
    }

    #[test]
    fn test_inventory_json_with_unknown_kind() {
        let inv: Inventory =
            serde_json::from_str(r#"{"Ordinary": 2, "Sparkly": 1, "boring": 4}"#).unwrap();
        assert_eq!(inv.count(DiscKind::Ordinary), 3);
        assert_eq!(inv.count(DiscKind::Boring), 4);
    }

    #[test]
    fn test_unknown_kind_adds_to_ordinary_stock() {
        let inv: Inventory = serde_json::from_str(r#"{"Ordinary": 20, "Sparkly": 1}"#).unwrap();
        assert_eq!(inv.count(DiscKind::Ordinary), 21);

        let inv: Inventory = serde_json::from_str(r#"{"Sparkly": 1, "0": 4, "ORDINARY": 5}"#).unwrap();
        assert_eq!(inv.count(DiscKind::Ordinary), 10);
        assert_eq!(inv.total(), 10);
    }

    #[test]
    fn test_add_saturates() {
        let mut inv: Inventory = serde_json::from_str(r#"{"Ordinary": 4294967295}"#).unwrap();
        inv.add(DiscKind::Ordinary, 1);
        assert_eq!(inv.count(DiscKind::Ordinary), u32::MAX);
    }

    #[test]
    fn test_player_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PlayerId::Two).unwrap(), "2");
        let id: PlayerId = serde_json::from_str("1").unwrap();
        assert_eq!(id, PlayerId::One);
    }
}
