//! The Snowball cell embedded in each Avalanche conflict set (§3).
use std::collections::HashMap;

/// Per-`sender` Snowball state. `size` (the number of distinct tx ids ever
/// admitted) is exposed via [`ConflictCell::size`] rather than stored
/// separately, since it equals `confidence.len()` by construction.
#[derive(Debug, Clone)]
pub struct ConflictCell {
    pub pref: u64,
    pub last: u64,
    pub cnt: u32,
    pub confidence: HashMap<u64, u32>,
}

impl ConflictCell {
    /// A new singleton cell seeded by the first transaction observed for
    /// this sender.
    pub fn new(first_tx: u64) -> Self {
        let mut confidence = HashMap::new();
        confidence.insert(first_tx, 0);
        ConflictCell { pref: first_tx, last: first_tx, cnt: 0, confidence }
    }

    /// Registers a (possibly reissued) transaction with this cell. Does
    /// not disturb `pref`/`last`/`cnt` — a transaction can be reissued
    /// without causing a new conflict.
    pub fn register(&mut self, tx: u64) {
        self.confidence.entry(tx).or_insert(0);
    }

    pub fn size(&self) -> usize {
        self.confidence.len()
    }

    pub fn is_preferred(&self, tx: u64) -> bool {
        self.pref == tx
    }

    pub fn confidence_of(&self, tx: u64) -> u32 {
        *self.confidence.get(&tx).unwrap_or(&0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_cell_is_a_preferred_singleton() {
        let cell = ConflictCell::new(42);
        assert_eq!(cell.size(), 1);
        assert!(cell.is_preferred(42));
        assert_eq!(cell.confidence_of(42), 0);
    }

    #[test]
    fn registering_a_conflict_grows_size_without_moving_pref() {
        let mut cell = ConflictCell::new(1);
        cell.register(2);
        assert_eq!(cell.size(), 2);
        assert!(cell.is_preferred(1));
    }
}
