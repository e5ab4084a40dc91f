//! Per-participant registry mapping a `sender` (UTXO key) to its Snowball
//! cell (§3, §9 Design Notes "Conflict cells ownership"). Each participant
//! owns one of these; cells are created lazily on first use and never
//! removed.
use std::collections::HashMap;

use super::conflict_set::ConflictCell;
use super::tx::Transaction;

#[derive(Debug, Default)]
pub struct ConflictRegistry {
    cells: HashMap<u64, ConflictCell>,
}

impl ConflictRegistry {
    pub fn new() -> Self {
        ConflictRegistry { cells: HashMap::new() }
    }

    pub fn get(&self, sender: &u64) -> Option<&ConflictCell> {
        self.cells.get(sender)
    }

    pub fn get_mut(&mut self, sender: &u64) -> Option<&mut ConflictCell> {
        self.cells.get_mut(sender)
    }

    /// Registers `tx` with the cell for its sender, creating the cell
    /// lazily if this is the first transaction seen for that sender.
    pub fn register_tx(&mut self, tx: Transaction) -> &mut ConflictCell {
        self.cells
            .entry(tx.sender)
            .and_modify(|cell| cell.register(tx.id))
            .or_insert_with(|| ConflictCell::new(tx.id))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_tx_for_a_sender_becomes_preferred() {
        let mut reg = ConflictRegistry::new();
        let tx = Transaction { id: 1, sender: 100, receiver: 200 };
        reg.register_tx(tx);
        let cell = reg.get(&100).unwrap();
        assert!(cell.is_preferred(1));
    }

    #[test]
    fn second_tx_for_same_sender_conflicts_without_moving_pref() {
        let mut reg = ConflictRegistry::new();
        reg.register_tx(Transaction { id: 1, sender: 100, receiver: 200 });
        reg.register_tx(Transaction { id: 2, sender: 100, receiver: 201 });
        let cell = reg.get(&100).unwrap();
        assert_eq!(cell.size(), 2);
        assert!(cell.is_preferred(1));
    }
}
