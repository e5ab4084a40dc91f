//! Avalanche: the DAG-structured multi-decision protocol built on
//! Snowball-style conflict sets (§3, §4.2–§4.5, §4.7).

pub mod adversary;
pub mod block;
pub mod conflict_map;
pub mod conflict_set;
pub mod dag;
pub mod master;
pub mod parent_selector;
pub mod participant;
pub mod tx;
pub mod voting;

pub use adversary::Adversary;
pub use block::Block;
pub use master::Master;
pub use participant::Participant;
pub use tx::Transaction;

#[derive(Debug)]
pub enum Error {
    /// `k >= honest_count`, fatal at startup.
    Configuration(String),
    /// A block was admitted whose parent is not locally known — an
    /// implementation bug, since `sync` is supposed to guarantee this never
    /// happens.
    MissingParent(u64),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
