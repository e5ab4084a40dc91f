//! An honest Avalanche participant (§4.5). Owns its DAG store and
//! conflict registry; the scheduler (`Master`) drives `step`-equivalent
//! behavior by calling these methods in sequence so it can borrow peer
//! participants alongside the active one.
use std::collections::VecDeque;

use tracing::debug;

use super::block::Block;
use super::conflict_map::ConflictRegistry;
use super::dag::Dag;
use super::parent_selector;
use super::tx::Transaction;
use super::voting;
use super::Result;
use crate::event_log::Event;
use crate::rng::Rng;

pub struct Participant {
    pub id: u64,
    dag: Dag,
    conflicts: ConflictRegistry,
    pending: VecDeque<u64>,
    /// Events produced by this participant since the last drain, tagged
    /// with its own id by the scheduler when flushed to the log.
    log_buffer: Vec<Event>,
}

impl Participant {
    pub fn new(id: u64) -> Self {
        Participant {
            id,
            dag: Dag::new(),
            conflicts: ConflictRegistry::new(),
            pending: VecDeque::new(),
            log_buffer: Vec::new(),
        }
    }

    /// Drains buffered log events, for the scheduler to write out tagged
    /// with this participant's id.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log_buffer)
    }

    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    pub fn accepted_blocks_count(&self) -> usize {
        self.dag.accepted_count()
    }

    /// A copy of the locally known block, for a peer's `sync` to admit.
    /// Acceptance is never carried on `Block` itself, so the copy is
    /// already the "fresh, unaccepted" view the protocol requires.
    pub fn get_block(&self, id: u64) -> Option<Block> {
        self.dag.get(id).map(|rc| (**rc).clone())
    }

    /// Admits `block` locally; if it carries a transaction, registers it
    /// with the conflict registry and enqueues it for processing.
    pub fn on_receive(&mut self, block: Block) -> Result<()> {
        if self.dag.contains(block.id) {
            return Ok(());
        }
        let tx = block.body;
        let id = block.id;
        let parents = block.parents.clone();
        self.dag.on_receive(block)?;
        if let Some(tx) = tx {
            self.conflicts.register_tx(tx);
            self.pending.push_back(id);
        }
        if let Some(block) = self.dag.get(id) {
            debug!("participant {} received {}", self.id, block.describe(self.dag.is_accepted(id)));
        }
        self.log_buffer.push(Event::ReceiveBlock { block_id: id, parents });
        Ok(())
    }

    /// Recursively pulls `id` and all its ancestors from `peer` into the
    /// local store. Idempotent: a locally-known id is a no-op.
    pub fn sync(&mut self, id: u64, peer: &Participant) -> Result<()> {
        if self.dag.contains(id) {
            return Ok(());
        }
        let block = match peer.get_block(id) {
            Some(block) => block,
            None => return Ok(()),
        };
        for parent in block.parents.clone() {
            self.sync(parent, peer)?;
        }
        self.on_receive(block)
    }

    /// Responds to a chit request with this participant's own view of
    /// whether `id` is strongly preferred.
    pub fn query(&self, id: u64) -> bool {
        self.dag.contains(id) && voting::is_strongly_preferred(&self.dag, &self.conflicts, id)
    }

    pub fn dequeue_pending(&mut self) -> Option<u64> {
        self.pending.pop_front()
    }

    /// Synthesizes a new transaction, selects parents from the current
    /// frontier, and admits the resulting block locally.
    pub fn generate_tx(&mut self, rng: &mut Rng) -> Block {
        let tx = Transaction::new(rng);
        let parents = parent_selector::select_parents(&self.dag, &self.conflicts);
        let block = Block::new(rng.next_id(), Some(tx), parents);
        self.on_receive(block.clone()).expect("freshly generated block always admits");
        block
    }

    /// Propagates a successful chit along `dag_head(id)`'s conflict
    /// cells, then re-runs acceptance over the whole local DAG in
    /// parents-first order. Returns the ids newly accepted this call.
    pub fn on_success(&mut self, id: u64, beta1: u32, beta2: u32) -> Vec<u64> {
        for ancestor in self.dag.dag_head(id) {
            let tx = match self.dag.get(ancestor).and_then(|b| b.body) {
                Some(tx) => tx,
                None => continue,
            };
            if let Some(cell) = self.conflicts.get_mut(&tx.sender) {
                let confidence = cell.confidence.entry(tx.id).or_insert(0);
                *confidence += 1;
                let cur_confidence = *confidence;
                let pref_confidence = cell.confidence_of(cell.pref);
                if cur_confidence > pref_confidence {
                    cell.pref = tx.id;
                }
                if tx.id != cell.last {
                    cell.last = tx.id;
                    cell.cnt = 0;
                } else {
                    cell.cnt += 1;
                }
            }
        }

        let mut newly_accepted = Vec::new();
        for candidate in self.dag.parents_first_order() {
            if self.dag.is_accepted(candidate) {
                continue;
            }
            if voting::is_accepted(&self.dag, &self.conflicts, candidate, beta1, beta2) {
                self.dag.accept(candidate);
                newly_accepted.push(candidate);
            }
        }
        newly_accepted
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::avalanche::block::GENESIS_ID;

    #[test]
    fn generate_tx_is_admitted_locally_with_genesis_parent() {
        let mut rng = Rng::new(1);
        let mut p = Participant::new(0);
        let block = p.generate_tx(&mut rng);
        assert!(p.dag.contains(block.id));
        assert_eq!(block.parents, vec![GENESIS_ID]);
    }

    #[test]
    fn sync_pulls_full_ancestry_from_peer() {
        let mut rng = Rng::new(2);
        let mut a = Participant::new(0);
        let b1 = a.generate_tx(&mut rng);
        let b2 = Block::new(rng.next_id(), None, vec![b1.id]);
        a.on_receive(b2.clone()).unwrap();

        let mut b = Participant::new(1);
        b.sync(b2.id, &a).unwrap();
        assert!(b.dag.contains(b1.id));
        assert!(b.dag.contains(b2.id));
        assert!(b.dag.contains(GENESIS_ID));
    }

    #[test]
    fn on_success_raises_confidence_and_can_accept_a_noop_block() {
        let mut p = Participant::new(0);
        let block = Block::new(5, None, vec![GENESIS_ID]);
        p.on_receive(block).unwrap();
        let accepted = p.on_success(5, 10, 10);
        assert_eq!(accepted, vec![5]);
        assert!(p.dag.is_accepted(5));
    }

    #[test]
    fn query_false_for_unknown_block() {
        let p = Participant::new(0);
        assert!(!p.query(12345));
    }
}
