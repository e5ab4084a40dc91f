//! The RL action oracle is an external collaborator (§1, Out of scope):
//! the simulator only consumes its decisions, never trains it. The actual
//! network, dataset generation, and training loops live outside this
//! crate's core.
use tracing::warn;

/// A snapshot of one honest participant's publicly-observable Snowball
/// state, as handed to the action oracle.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantSnapshot {
    pub adversary: bool,
    pub color: Option<bool>,
    pub count: u32,
    pub confidence: u32,
    pub id_low_bits: u8,
}

/// A pure function from a global snapshot and a querying participant id to
/// a response color. Implementations are expected to be side-effect free.
pub trait ActionOracle {
    fn pick_action(&self, snapshot: &[ParticipantSnapshot], from_id: usize) -> bool;
}

/// The default oracle used when no trained policy is supplied. It always
/// answers `false` and logs once per call that RL policy evaluation is out
/// of scope for this crate; the `RL` adversary strategy still exercises the
/// full code path, it just never behaves intelligently.
pub struct NoopOracle;

impl ActionOracle for NoopOracle {
    fn pick_action(&self, _snapshot: &[ParticipantSnapshot], _from_id: usize) -> bool {
        warn!("RL action oracle is a stub in this build; returning a fixed response");
        false
    }
}
