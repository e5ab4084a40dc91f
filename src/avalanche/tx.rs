//! Transactions (§3): `sender` is the UTXO conflict key; two transactions
//! conflict iff they share a `sender`.
use crate::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transaction {
    pub id: u64,
    pub sender: u64,
    pub receiver: u64,
}

impl Transaction {
    pub fn new(rng: &mut Rng) -> Self {
        Transaction { id: rng.next_id(), sender: rng.next_id(), receiver: rng.next_id() }
    }
}
