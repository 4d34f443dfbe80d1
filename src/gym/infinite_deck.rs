use rand::Rng;

use crate::env::{blackjack::MAX_CARD, CardSource};

/// A deck that never runs out: every card is drawn uniformly from ace to king
///
/// Jacks, queens, and kings count as 10.
#[derive(Debug, Clone)]
pub struct InfiniteDeck<R> {
    rng: R,
}

impl<R: Rng> InfiniteDeck<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CardSource for InfiniteDeck<R> {
    fn draw(&mut self) -> u8 {
        self.rng.gen_range(1..=13u8).min(MAX_CARD)
    }
}
