use rand::Rng;

use crate::ds::{Keyspace, ValueTable};

mod epsilon_greedy;
mod softmax;

pub use epsilon_greedy::EpsilonGreedy;
pub use softmax::Softmax;

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

/// A stateless strategy that picks a key from a value table
pub trait Exploration {
    /// Whether every key must be sampled once before the policy is first consulted
    fn requires_warm_up(&self) -> bool {
        false
    }

    /// Choose a key given the current estimates
    fn select<S, R>(&self, table: &ValueTable<S>, rng: &mut R) -> S::Key
    where
        S: Keyspace,
        R: Rng + ?Sized;
}
