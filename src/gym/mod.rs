pub mod infinite_deck;
pub mod k_armed_bandit;

pub use infinite_deck::InfiniteDeck;
pub use k_armed_bandit::BanditWorld;
