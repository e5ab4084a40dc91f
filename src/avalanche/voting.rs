//! Voting predicates (§4.3): `is_preferred`, `is_strongly_preferred`,
//! `is_accepted`. Free functions over a `Dag` + `ConflictRegistry` rather
//! than methods on `Block`, since the predicates need state the block
//! itself does not carry (§9, "Conflict cells ownership").
use super::conflict_map::ConflictRegistry;
use super::dag::Dag;

/// True for no-op blocks; else true iff the block's transaction is the
/// preferred one in its conflict cell.
pub fn is_preferred(dag: &Dag, conflicts: &ConflictRegistry, id: u64) -> bool {
    let block = match dag.get(id) {
        Some(block) => block,
        None => return false,
    };
    let tx = match &block.body {
        None => return true,
        Some(tx) => *tx,
    };
    match conflicts.get(&tx.sender) {
        Some(cell) => cell.is_preferred(tx.id),
        None => true,
    }
}

/// True if `id` is accepted; false if not preferred; else true iff every
/// block yielded by `dag.dag_head(id)` is preferred.
pub fn is_strongly_preferred(dag: &Dag, conflicts: &ConflictRegistry, id: u64) -> bool {
    if dag.is_accepted(id) {
        return true;
    }
    if !is_preferred(dag, conflicts, id) {
        return false;
    }
    dag.dag_head(id).into_iter().all(|ancestor| is_preferred(dag, conflicts, ancestor))
}

/// Evaluates the acceptance rules for `id` (§4.3). Does not mutate
/// `dag` — the caller is responsible for calling [`Dag::accept`] when
/// this returns true.
pub fn is_accepted(
    dag: &Dag,
    conflicts: &ConflictRegistry,
    id: u64,
    beta1: u32,
    beta2: u32,
) -> bool {
    if dag.is_accepted(id) {
        return true;
    }
    let block = match dag.get(id) {
        Some(block) => block,
        None => return false,
    };
    let tx = match &block.body {
        None => {
            return block.parents.iter().all(|p| dag.is_accepted(*p));
        }
        Some(tx) => *tx,
    };
    let cell = match conflicts.get(&tx.sender) {
        Some(cell) => cell,
        None => return false,
    };
    let consecutive_counter = cell.pref == tx.id && cell.cnt >= beta2;
    let no_conflict = cell.size() == 1;
    let safe_early = no_conflict
        && cell.confidence_of(tx.id) >= beta1
        && block.parents.iter().all(|p| dag.is_accepted(*p));
    consecutive_counter || safe_early
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::avalanche::block::{Block, GENESIS_ID};
    use crate::avalanche::tx::Transaction;

    fn tx(id: u64, sender: u64) -> Transaction {
        Transaction { id, sender, receiver: id + 1000 }
    }

    #[test]
    fn noop_block_is_always_preferred() {
        let mut dag = Dag::new();
        let conflicts = ConflictRegistry::new();
        dag.on_receive(Block::new(1, None, vec![GENESIS_ID])).unwrap();
        assert!(is_preferred(&dag, &conflicts, 1));
    }

    #[test]
    fn preference_follows_conflict_cell_pref() {
        let mut dag = Dag::new();
        let mut conflicts = ConflictRegistry::new();
        let t1 = tx(1, 10);
        let t2 = tx(2, 10);
        conflicts.register_tx(t1);
        conflicts.register_tx(t2);
        dag.on_receive(Block::new(1, Some(t1), vec![GENESIS_ID])).unwrap();
        dag.on_receive(Block::new(2, Some(t2), vec![GENESIS_ID])).unwrap();
        assert!(is_preferred(&dag, &conflicts, 1));
        assert!(!is_preferred(&dag, &conflicts, 2));
    }

    #[test]
    fn strongly_preferred_requires_ancestors_preferred() {
        let mut dag = Dag::new();
        let mut conflicts = ConflictRegistry::new();
        let t1 = tx(1, 10);
        let t2 = tx(2, 10);
        conflicts.register_tx(t1);
        conflicts.register_tx(t2);
        dag.on_receive(Block::new(1, Some(t2), vec![GENESIS_ID])).unwrap();
        dag.on_receive(Block::new(2, Some(t1), vec![1])).unwrap();
        assert!(!is_strongly_preferred(&dag, &conflicts, 2));
    }

    #[test]
    fn safe_early_commitment_requires_accepted_parents() {
        let mut dag = Dag::new();
        let mut conflicts = ConflictRegistry::new();
        let t1 = tx(1, 10);
        conflicts.register_tx(t1);
        if let Some(cell) = conflicts.get_mut(&10) {
            cell.confidence.insert(1, 5);
        }
        dag.on_receive(Block::new(1, Some(t1), vec![GENESIS_ID])).unwrap();
        assert!(is_accepted(&dag, &conflicts, 1, 3, 100));
    }

    #[test]
    fn consecutive_counter_accepts_regardless_of_parents() {
        let mut dag = Dag::new();
        let mut conflicts = ConflictRegistry::new();
        let t1 = tx(1, 10);
        conflicts.register_tx(t1);
        if let Some(cell) = conflicts.get_mut(&10) {
            cell.cnt = 200;
            cell.last = 1;
        }
        dag.on_receive(Block::new(1, Some(t1), vec![GENESIS_ID])).unwrap();
        assert!(is_accepted(&dag, &conflicts, 1, 100, 120));
    }
}
