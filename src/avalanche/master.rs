//! The Avalanche round scheduler (§4.8). Drives honest participants and
//! gives the shared adversary a `pre_step` before each tick, mirroring
//! `AvalancheMaster.run` in structure: an open-ended loop driven by an
//! external stop condition rather than a convergence test (Avalanche has
//! no termination predicate of its own).
use crate::config::AvalancheConfig;
use crate::event_log::{Event, EventLog};
use crate::rng::Rng;

use super::adversary::Adversary;
use super::participant::Participant;

pub struct Master {
    config: AvalancheConfig,
    honest: Vec<Participant>,
    adversary: Adversary,
    rng: Rng,
    ticks: u64,
}

impl Master {
    pub fn new(config: AvalancheConfig) -> Self {
        let honest = (0..config.honest_count() as u64).map(Participant::new).collect();
        let rng = Rng::new(config.seed);
        Master { config, honest, adversary: Adversary::new(), rng, ticks: 0 }
    }

    pub fn honest(&self) -> &[Participant] {
        &self.honest
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one scheduler tick: picks an honest participant uniformly,
    /// grants the adversary a pre-step, then steps the chosen
    /// participant. Returns the ids the stepped participant newly
    /// accepted, for callers tracking liveness.
    pub fn tick(&mut self, log: &mut EventLog) -> Vec<u64> {
        self.ticks += 1;
        let active = self.rng.pick_index(self.honest.len());
        self.adversary.pre_step(&mut self.rng, &mut self.honest, log);
        for (i, participant) in self.honest.iter_mut().enumerate() {
            flush_events(i, participant, log);
        }
        self.step_participant(active, log)
    }

    fn step_participant(&mut self, active: usize, log: &mut EventLog) -> Vec<u64> {
        if self.rng.chance(self.config.transaction_spawn) {
            let block = self.honest[active].generate_tx(&mut self.rng);
            log.record(active, Event::CreateBlock { block_id: block.id, parents: block.parents });
        }
        flush_events(active, &mut self.honest[active], log);

        let block_id = match self.honest[active].dequeue_pending() {
            Some(id) => id,
            None => return Vec::new(),
        };

        let honest_count = self.honest.len();
        let peers = self.rng.sample(self.config.node_count, self.config.k, active);
        let success = self.config.success();

        let mut chits = 0;
        // The active node is the source of truth; each sampled peer pulls
        // the block from it via `sync`, then answers its own `query`
        // (mirrors `part.sync(block.id, self); value += part.query(...)`
        // in the original, where `part` is the peer being asked).
        for peer_index in peers {
            if peer_index < honest_count {
                let (peer_mut, source): (&mut Participant, &Participant) = if peer_index < active {
                    let (left, right) = self.honest.split_at_mut(active);
                    (&mut left[peer_index], &right[0])
                } else {
                    let (left, right) = self.honest.split_at_mut(peer_index);
                    (&mut right[0], &left[active])
                };
                peer_mut.sync(block_id, source).expect("sync from a peer with a well-formed dag never fails");
                if peer_mut.query(block_id) {
                    chits += 1;
                }
                flush_events(peer_index, &mut self.honest[peer_index], log);
            } else if self.adversary.query(block_id) {
                chits += 1;
            }
            if chits >= success {
                break;
            }
        }

        if chits < success {
            return Vec::new();
        }

        let accepted = self.honest[active].on_success(block_id, self.config.beta1, self.config.beta2);
        for id in &accepted {
            log.record(active, Event::AcceptBlock { block_id: *id });
        }
        accepted
    }
}

fn flush_events(id: usize, participant: &mut Participant, log: &mut EventLog) {
    for event in participant.drain_events() {
        log.record(id, event);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tick_advances_the_counter() {
        let config = AvalancheConfig { node_count: 10, k: 3, ..AvalancheConfig::default() };
        let mut master = Master::new(config);
        let mut log = EventLog::discard();
        master.tick(&mut log);
        assert_eq!(master.ticks(), 1);
    }

    #[test]
    fn honest_only_run_eventually_accepts_a_non_genesis_block() {
        let config = AvalancheConfig {
            node_count: 20,
            byzantine_percent: 0.0,
            k: 5,
            alpha: 0.6,
            beta1: 5,
            beta2: 5,
            transaction_spawn: 0.2,
            seed: 3,
            ..AvalancheConfig::default()
        };
        let mut master = Master::new(config);
        let mut log = EventLog::discard();
        let mut any_accepted = false;
        for _ in 0..2000 {
            master.tick(&mut log);
            if master.honest().iter().any(|p| p.accepted_blocks_count() > 1) {
                any_accepted = true;
                break;
            }
        }
        assert!(any_accepted);
    }
}
