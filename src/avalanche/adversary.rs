//! The Avalanche Byzantine adversary (§4.7). Unlike Snowball's
//! strategy-driven adversary, Avalanche's is a single fixed behavior:
//! issue one balanced fork at tick 0, then withhold chits forever.
use super::block::{Block, GENESIS_ID};
use super::dag::Dag;
use super::parent_selector;
use super::tx::Transaction;
use crate::event_log::{Event, EventLog};
use crate::rng::Rng;

pub struct Adversary {
    /// A minimal private DAG, genesis-only, used solely to run the
    /// parent selector for the one fork this adversary ever issues.
    dag: Dag,
    started: bool,
}

impl Adversary {
    pub fn new() -> Self {
        Adversary { dag: Dag::new(), started: false }
    }

    /// True every tick except the first.
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Always withholds chits (§9, Open Question (b)).
    pub fn query(&self, _block_id: u64) -> bool {
        false
    }

    /// Synthesizes `(b0, b1)`, two transactions sharing a sender (and
    /// thus conflicting) with distinct receivers, on shared parents from
    /// this adversary's own frontier.
    fn generate_conflict(&mut self, rng: &mut Rng) -> (Block, Block) {
        let parents = parent_selector::select_parents(&self.dag, &Default::default());
        let sender = rng.next_id();
        let tx0 = Transaction { id: rng.next_id(), sender, receiver: rng.next_id() };
        let tx1 = Transaction { id: rng.next_id(), sender, receiver: rng.next_id() };
        let b0 = Block::new(rng.next_id(), Some(tx0), parents.clone());
        let b1 = Block::new(rng.next_id(), Some(tx1), parents);
        (b0, b1)
    }

    /// At tick 0 only: builds the fork and pushes one side to each honest
    /// participant by parity, logging the block and conflict creation.
    /// A no-op on every subsequent tick.
    pub fn pre_step(
        &mut self,
        rng: &mut Rng,
        honest: &mut [super::Participant],
        log: &mut EventLog,
    ) {
        if self.started {
            return;
        }
        self.started = true;

        let (b0, b1) = self.generate_conflict(rng);
        self.dag.on_receive(b0.clone()).expect("fork parents are always locally known");
        self.dag.on_receive(b1.clone()).expect("fork parents are always locally known");

        log.record(usize::MAX, Event::CreateBlock { block_id: b0.id, parents: b0.parents.clone() });
        log.record(usize::MAX, Event::CreateBlock { block_id: b1.id, parents: b1.parents.clone() });
        log.record(usize::MAX, Event::CreateConflict { block_a: b0.id, block_b: b1.id });

        for (i, participant) in honest.iter_mut().enumerate() {
            let side = if i % 2 == 0 { &b0 } else { &b1 };
            participant.on_receive(side.clone()).expect("fork block admits cleanly into fresh honest dag");
        }
    }
}

impl Default for Adversary {
    fn default() -> Self {
        Adversary::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::avalanche::participant::Participant;
    use crate::config::AvalancheConfig;

    #[test]
    fn pre_step_only_fires_once_and_splits_by_parity() {
        let mut rng = Rng::new(7);
        let mut adversary = Adversary::new();
        let mut log = EventLog::discard();
        let mut honest: Vec<Participant> = (0..4u64).map(Participant::new).collect();

        adversary.pre_step(&mut rng, &mut honest, &mut log);
        assert!(adversary.has_started());
        for p in &honest {
            assert_eq!(p.dag().len(), 2);
        }

        adversary.pre_step(&mut rng, &mut honest, &mut log);
        for p in &honest {
            assert_eq!(p.dag().len(), 2);
        }
    }

    #[test]
    fn query_always_withholds_a_chit() {
        let _ = AvalancheConfig::default();
        let adversary = Adversary::new();
        assert!(!adversary.query(GENESIS_ID));
    }
}
