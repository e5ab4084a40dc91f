//! Snowball adversarial strategies (§4.7).
//!
//! A single shared [`Adversary`] answers every Byzantine slot; from an
//! honest participant's perspective each slot looks like an ordinary peer.
use serde::Deserialize;
use tracing::info;

use crate::oracle::{ActionOracle, NoopOracle, ParticipantSnapshot};

use super::participant::Participant;

/// The point at which `BREAK_LIVENESS` and the first phase of
/// `BREAK_SAFETY` change behavior.
const PHASE_SHIFT_ITERATION: u64 = 100_000;

/// The observable Snowball adversarial behaviors (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    TryBalance,
    IncreaseConfidence,
    EqualSplit,
    NonAnswer,
    Rl,
    BreakLiveness,
    BreakSafety,
}

/// A single logical adversary instance shared across all Byzantine slots.
/// Must never mutate honest participants' state (a contract, not enforced
/// by the type system, per the concurrency/resource model).
pub struct Adversary {
    strategy: Strategy,
    oracle: Box<dyn ActionOracle + Send + Sync>,
}

impl Adversary {
    pub fn new(strategy: Strategy) -> Self {
        Adversary { strategy, oracle: Box::new(NoopOracle) }
    }

    pub fn with_oracle(strategy: Strategy, oracle: Box<dyn ActionOracle + Send + Sync>) -> Self {
        Adversary { strategy, oracle }
    }

    /// Answers a query, per the configured strategy. `honest` is the full
    /// set of honest participants (the adversary's private view of the
    /// network); `iteration` is the global tick counter.
    pub fn respond_to_query(
        &self,
        from_id: usize,
        color: bool,
        honest: &[Participant],
        iteration: u64,
    ) -> Option<bool> {
        match self.strategy {
            Strategy::TryBalance => Some(least_frequent_color(honest)),
            Strategy::IncreaseConfidence => Some(color),
            Strategy::EqualSplit => Some(from_id % 2 == 0),
            Strategy::NonAnswer => {
                // Simulate a timeout only when it would have voted against the caller.
                let least = least_frequent_color(honest);
                if least == color {
                    Some(color)
                } else {
                    None
                }
            }
            Strategy::BreakLiveness => {
                if iteration < PHASE_SHIFT_ITERATION {
                    Some(least_frequent_color(honest))
                } else {
                    Some(color)
                }
            }
            Strategy::BreakSafety => Some(self.break_safety(from_id, honest, iteration)),
            Strategy::Rl => {
                let snapshot: Vec<ParticipantSnapshot> =
                    honest.iter().map(|p| snapshot_of(p)).collect();
                Some(self.oracle.pick_action(&snapshot, from_id))
            }
        }
    }

    fn break_safety(&self, from_id: usize, honest: &[Participant], iteration: u64) -> bool {
        if iteration < PHASE_SHIFT_ITERATION {
            from_id % 200 >= 100
        } else {
            let has_finished = honest.iter().take(10).any(|p| p.is_finished());
            if !has_finished {
                from_id % 200 >= 110
            } else {
                // Open Question (a): the original prints a dot and answers
                // `true` here unconditionally; intent is unclear and this
                // is reproduced literally rather than reinterpreted.
                info!(".");
                true
            }
        }
    }
}

fn least_frequent_color(honest: &[Participant]) -> bool {
    let mut counts = [0usize; 2];
    for p in honest {
        if let Some(c) = p.color {
            counts[c as usize] += 1;
        }
    }
    counts[1] < counts[0]
}

fn snapshot_of(p: &Participant) -> ParticipantSnapshot {
    ParticipantSnapshot {
        adversary: false,
        color: p.color,
        count: p.count(),
        confidence: p.confidence(),
        id_low_bits: (p.id & 0xff) as u8,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn honest_with_colors(colors: &[bool]) -> Vec<Participant> {
        colors
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut p = Participant::new(i, 0.8, 120, 10);
                p.set_initial_color(c);
                p
            })
            .collect()
    }

    #[test]
    fn try_balance_answers_the_minority_color() {
        let honest = honest_with_colors(&[true, true, false]);
        let adv = Adversary::new(Strategy::TryBalance);
        assert_eq!(adv.respond_to_query(0, true, &honest, 0), Some(false));
    }

    #[test]
    fn increase_confidence_echoes_caller() {
        let adv = Adversary::new(Strategy::IncreaseConfidence);
        assert_eq!(adv.respond_to_query(0, true, &[], 0), Some(true));
        assert_eq!(adv.respond_to_query(0, false, &[], 0), Some(false));
    }

    #[test]
    fn equal_split_partitions_by_id_parity() {
        let adv = Adversary::new(Strategy::EqualSplit);
        assert_eq!(adv.respond_to_query(4, false, &[], 0), Some(true));
        assert_eq!(adv.respond_to_query(5, false, &[], 0), Some(false));
    }

    #[test]
    fn non_answer_only_times_out_against_the_caller() {
        let honest = honest_with_colors(&[true, true, false]);
        let adv = Adversary::new(Strategy::NonAnswer);
        // Minority is `false`; querying with `false` gets an honest answer...
        assert_eq!(adv.respond_to_query(0, false, &honest, 0), Some(false));
        // ...querying with `true` (the majority) gets a simulated timeout.
        assert_eq!(adv.respond_to_query(0, true, &honest, 0), None);
    }

    #[test]
    fn break_liveness_switches_phase_at_threshold() {
        let honest = honest_with_colors(&[true, true, false]);
        let adv = Adversary::new(Strategy::BreakLiveness);
        assert_eq!(adv.respond_to_query(0, true, &honest, 0), Some(false));
        assert_eq!(adv.respond_to_query(0, true, &honest, PHASE_SHIFT_ITERATION), Some(true));
    }

    #[test]
    fn break_safety_splits_by_modulus_in_first_phase() {
        let adv = Adversary::new(Strategy::BreakSafety);
        assert_eq!(adv.respond_to_query(50, true, &[], 0), Some(false));
        assert_eq!(adv.respond_to_query(150, true, &[], 0), Some(true));
    }
}
