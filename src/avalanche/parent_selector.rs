//! Parent selection (§4.4): produces a minimal set of currently known,
//! strongly-preferred blocks with none an ancestor of another.
//!
//! The spec calls for iterating in "reverse-topological order (children
//! first)", but membership in `strongly_preferred` must already hold for
//! a block's parents by the time that block is visited (its eligibility
//! test reads `all parents ∈ strongly_preferred`). [`Dag::topological_order`]
//! already yields children before parents, so the order this routine
//! actually needs is [`Dag::parents_first_order`] — its reverse.
use std::collections::HashSet;

use super::conflict_map::ConflictRegistry;
use super::dag::Dag;

/// Always returns a non-empty set; genesis satisfies every eligibility
/// condition and is the fallback when nothing else qualifies (§9,
/// "Parent selector retreat").
pub fn select_parents(dag: &Dag, conflicts: &ConflictRegistry) -> Vec<u64> {
    let mut strongly_preferred: HashSet<u64> = HashSet::new();
    let mut parents: Vec<u64> = Vec::new();

    for id in dag.parents_first_order() {
        let block = match dag.get(id) {
            Some(block) => block,
            None => continue,
        };

        if dag.is_accepted(id) {
            strongly_preferred.insert(id);
            if !parents.contains(&id) {
                parents.push(id);
            }
            continue;
        }

        let preferred = match &block.body {
            None => true,
            Some(tx) => conflicts.get(&tx.sender).map_or(true, |cell| cell.is_preferred(tx.id)),
        };
        if !preferred {
            continue;
        }

        let all_parents_strongly_preferred =
            block.parents.iter().all(|p| strongly_preferred.contains(p));
        if !all_parents_strongly_preferred {
            continue;
        }

        strongly_preferred.insert(id);

        let eligible = match &block.body {
            None => true,
            Some(tx) => conflicts
                .get(&tx.sender)
                .map_or(true, |cell| cell.size() == 1 || cell.confidence_of(tx.id) > 0),
        };
        if eligible {
            parents.retain(|p| !block.parents.contains(p));
            parents.push(id);
        }
    }

    if parents.is_empty() {
        parents.push(super::block::GENESIS_ID);
    }
    parents
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
    fn empty_dag_retreats_to_genesis() {
        let dag = Dag::new();
        let conflicts = ConflictRegistry::new();
        assert_eq!(select_parents(&dag, &conflicts), vec![GENESIS_ID]);
    }

    #[test]
    fn single_preferred_block_becomes_sole_parent() {
        let mut dag = Dag::new();
        let mut conflicts = ConflictRegistry::new();
        let t1 = tx(1, 10);
        conflicts.register_tx(t1);
        dag.on_receive(Block::new(1, Some(t1), vec![GENESIS_ID])).unwrap();
        let parents = select_parents(&dag, &conflicts);
        assert_eq!(parents, vec![1]);
    }

    #[test]
    fn losing_side_of_a_conflict_is_excluded() {
        let mut dag = Dag::new();
        let mut conflicts = ConflictRegistry::new();
        let t1 = tx(1, 10);
        let t2 = tx(2, 10);
        conflicts.register_tx(t1);
        conflicts.register_tx(t2);
        dag.on_receive(Block::new(1, Some(t1), vec![GENESIS_ID])).unwrap();
        dag.on_receive(Block::new(2, Some(t2), vec![GENESIS_ID])).unwrap();
        let parents = select_parents(&dag, &conflicts);
        assert!(parents.contains(&1));
        assert!(!parents.contains(&2));
    }

    #[test]
    fn child_parent_is_dropped_in_favor_of_the_tip() {
        let mut dag = Dag::new();
        let mut conflicts = ConflictRegistry::new();
        let t1 = tx(1, 10);
        let t2 = tx(2, 11);
        conflicts.register_tx(t1);
        conflicts.register_tx(t2);
        dag.on_receive(Block::new(1, Some(t1), vec![GENESIS_ID])).unwrap();
        dag.on_receive(Block::new(2, Some(t2), vec![1])).unwrap();
        let parents = select_parents(&dag, &conflicts);
        assert_eq!(parents, vec![2]);
    }
}
