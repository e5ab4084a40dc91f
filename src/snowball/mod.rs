//! Snowball: the single-decision binary agreement protocol (§4.6).
//!
//! Many independent [`Participant`](participant::Participant) instances run
//! to termination or an iteration cap under a [`Protocol`](protocol::Protocol)
//! scheduler, with a subset of slots answered by a single shared
//! [`Adversary`](adversary::Adversary).

pub mod adversary;
pub mod participant;
pub mod protocol;

pub use adversary::{Adversary, Strategy};
pub use participant::Participant;
pub use protocol::Protocol;

#[derive(Debug)]
pub enum Error {
    /// `k >= num_participants`, or fewer honest participants than `k + 1`.
    Configuration(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
