//! The Snowball scheduler (§4.8): a single-threaded loop driving many
//! independent binary-agreement participants to termination.
use tracing::debug;

use crate::config::SnowballConfig;
use crate::rng::Rng;

use super::adversary::Adversary;
use super::participant::Participant;
use super::{Error, Result};

pub struct Protocol {
    config: SnowballConfig,
    participants: Vec<Participant>,
    adversary: Adversary,
    rng: Rng,
    iteration: u64,
    /// Indices (into `participants`) of honest participants that are not
    /// yet finished; the scheduler only ever picks from here.
    running: Vec<usize>,
}

impl Protocol {
    pub fn new(config: SnowballConfig) -> Result<Self> {
        config.validate().map_err(Error::Configuration)?;

        let mut rng = Rng::new(config.seed);
        let honest_count = config.honest_count();
        let mut participants: Vec<Participant> = (0..honest_count)
            .map(|i| Participant::new(i, config.alpha, config.beta, config.k))
            .collect();
        // A single global RNG draw per participant in id order, so two runs
        // with the same seed assign identical initial colors (§9 Open
        // Questions (c)).
        for p in participants.iter_mut() {
            let color = rng.initial_color(config.balance);
            p.set_initial_color(color);
        }

        let adversary = Adversary::new(config.adversary_strategy);
        let running = (0..honest_count).collect();

        Ok(Protocol { config, participants, adversary, rng, iteration: 0, running })
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    fn honest_count(&self) -> usize {
        self.participants.len()
    }

    pub fn top_iterations(&self) -> u64 {
        self.config.part_iterations * self.config.num_participants as u64
    }

    /// Counts of (color=false, color=true) across every honest participant,
    /// finished or not — the reporting view (§8 scenario 1/2/3).
    pub fn snowball_map(&self) -> (usize, usize) {
        let mut counts = (0usize, 0usize);
        for p in &self.participants {
            match p.color {
                Some(false) => counts.0 += 1,
                Some(true) => counts.1 += 1,
                None => (),
            }
        }
        counts
    }

    /// `true` when every honest participant that is still running shares
    /// the same color — an early, reportable consensus among the
    /// not-yet-terminated population.
    fn converged_among_running(&self) -> bool {
        let mut seen = [false; 2];
        for &idx in &self.running {
            if let Some(c) = self.participants[idx].color {
                seen[c as usize] = true;
            }
        }
        !(seen[0] && seen[1])
    }

    pub fn consensus(&self) -> bool {
        let (false_count, true_count) = self.snowball_map();
        false_count == 0 || true_count == 0
    }

    /// Runs a single scheduler tick. Returns `true` once the protocol has
    /// terminated (all honest participants finished, the running
    /// population has converged to one color, or the iteration cap was
    /// reached).
    pub fn step(&mut self) -> bool {
        if self.running.is_empty() {
            return true;
        }
        self.iteration += 1;

        let pick = self.rng.pick_index(self.running.len());
        let u = self.running[pick];

        let total = self.config.num_participants;
        let self_color = self.participants[u].color.expect("a running participant has a color");
        let peers = self.rng.sample(total, self.participants[u].k(), u);

        let mut responses = Vec::with_capacity(peers.len());
        for peer in peers {
            let response = if peer < self.honest_count() {
                Some(self.participants[peer].respond_to_query(u, self_color))
            } else {
                self.adversary.respond_to_query(u, self_color, &self.participants, self.iteration)
            };
            responses.push(response);
        }

        self.participants[u].update(&responses);
        debug!(
            "participant {} updated: color={:?} count={} confidence={}",
            u,
            self.participants[u].color,
            self.participants[u].count(),
            self.participants[u].confidence()
        );

        if self.participants[u].is_finished() {
            self.running.retain(|&x| x != u);
        }

        if self.running.is_empty() {
            return true;
        }
        if self.converged_among_running() {
            return true;
        }
        self.iteration >= self.top_iterations()
    }

    /// Runs to termination.
    pub fn run(&mut self) {
        while !self.step() {}
    }
}
