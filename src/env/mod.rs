pub mod blackjack;

use crate::{
    ds::Keyspace,
    error::{Error, Result},
};

/// A source of sampled rewards for a chosen action
///
/// Reward sources own their randomness so that independent runs never share a generator.
pub trait RewardSource {
    /// The action context a reward is requested for
    type Key;

    /// Sample a reward for `key`
    ///
    /// **Errors** with [`Error::KeyOutOfRange`] if `key` addresses an action the source does not have.
    /// Callers must treat this as fatal for the current run.
    fn reward(&mut self, key: Self::Key) -> Result<f64>;
}

/// A source of playing cards for the episodic setting
pub trait CardSource {
    /// Draw one card with a value in `1..=10` (face cards count as 10, aces as 1)
    fn draw(&mut self) -> u8;

    /// Deal two cards to the player, then two to the dealer
    ///
    /// **Returns** `(player_hand, dealer_hand)`
    fn initial_hands(&mut self) -> ([u8; 2], [u8; 2]) {
        let player = [self.draw(), self.draw()];
        let dealer = [self.draw(), self.draw()];
        (player, dealer)
    }
}

/// A single arm of a multi-machine bandit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArmKey {
    pub machine: usize,
    pub lever: usize,
}

/// The arm layout of a bandit: `machines` machines with `levers` levers each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    machines: usize,
    levers: usize,
}

impl Shape {
    /// **Errors** if either dimension is zero
    pub fn new(machines: usize, levers: usize) -> Result<Self> {
        if machines == 0 || levers == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "shape must have at least one machine and one lever, got {machines}x{levers}"
            )));
        }
        Ok(Self { machines, levers })
    }

    pub fn machines(&self) -> usize {
        self.machines
    }

    pub fn levers(&self) -> usize {
        self.levers
    }

    pub fn contains(&self, key: ArmKey) -> bool {
        key.machine < self.machines && key.lever < self.levers
    }
}

impl Keyspace for Shape {
    type Key = ArmKey;

    fn len(&self) -> usize {
        self.machines * self.levers
    }

    fn offset(&self, key: ArmKey) -> Option<usize> {
        self.contains(key)
            .then_some(key.machine * self.levers + key.lever)
    }

    fn key(&self, offset: usize) -> ArmKey {
        ArmKey {
            machine: offset / self.levers,
            lever: offset % self.levers,
        }
    }
}
