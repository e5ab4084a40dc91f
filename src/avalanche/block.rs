//! Blocks (§3). A block's `body` is either a transaction or a no-op; its
//! `parents` are an ordered, duplicate-free list of parent block ids. The
//! `accepted` latch lives outside this type entirely (see [`super::dag`]):
//! a `Block` is an immutable record that may be freely shared by value
//! between participants, with each participant tracking its own acceptance
//! state for the same block id (§9 Design Notes, "Block sharing").
use super::tx::Transaction;

/// The well-known genesis id. Every participant's store contains the
/// genesis block from initialization, already accepted.
pub const GENESIS_ID: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: u64,
    pub body: Option<Transaction>,
    pub parents: Vec<u64>,
}

impl Block {
    pub fn new(id: u64, body: Option<Transaction>, parents: Vec<u64>) -> Self {
        Block { id, body, parents }
    }

    pub fn genesis() -> Self {
        Block { id: GENESIS_ID, body: None, parents: vec![] }
    }

    pub fn is_noop(&self) -> bool {
        self.body.is_none()
    }

    /// A trace-friendly rendering mirroring the original's
    /// `Block.__repr__`: kind, id, parent count, accepted flag. Acceptance
    /// lives on `Dag`, not `Block`, so callers with store access pass it
    /// in explicitly rather than this being a plain `Display` impl.
    pub fn describe(&self, accepted: bool) -> String {
        let kind = if self.is_noop() { "NoP" } else { "TX" };
        format!("Block({},{},{},{})", kind, self.id, self.parents.len(), accepted)
    }
}
