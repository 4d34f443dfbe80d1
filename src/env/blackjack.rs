//! A simplified blackjack played against a dealer with a fixed policy
//!
//! Cards come from a [`CardSource`]. Only player totals of 12 to 21 are decision
//! states; below that the player always draws, since no card can bust the hand.

use crate::{ds::Keyspace, memory::Trajectory};

use super::CardSource;

/// Lowest player total that is a decision state under the default rules
pub const MIN_DECISION_TOTAL: u8 = 12;
/// Highest non-bust total
pub const MAX_TOTAL: u8 = 21;
/// Card values range from ace (1) to ten (10)
pub const MAX_CARD: u8 = 10;

/// A player decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Stand = 0,
    Draw = 1,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Stand, Action::Draw];
}

/// What the player observes at a decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    /// Value of the player's hand, counting a usable ace as 11
    pub player_total: u8,
    /// The dealer's face-up card
    pub dealer_card: u8,
    /// Whether the player holds an ace counted as 11
    pub usable_ace: bool,
}

/// A hand of cards, tracked by its hard total and whether it holds an ace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    hard_total: u8,
    has_ace: bool,
}

impl Hand {
    pub fn from_cards(cards: &[u8]) -> Self {
        let mut hand = Self::default();
        for &card in cards {
            hand.add(card);
        }
        hand
    }

    /// A hand worth exactly `total` whose ace flag is `usable_ace`
    pub fn with_value(total: u8, usable_ace: bool) -> Self {
        if usable_ace {
            Self {
                hard_total: total.saturating_sub(10),
                has_ace: true,
            }
        } else {
            Self {
                hard_total: total,
                has_ace: false,
            }
        }
    }

    pub fn add(&mut self, card: u8) {
        self.hard_total = self.hard_total.saturating_add(card);
        self.has_ace |= card == 1;
    }

    /// An ace can count as 11 without busting
    pub fn usable_ace(&self) -> bool {
        self.has_ace && self.hard_total.saturating_add(10) <= MAX_TOTAL
    }

    pub fn value(&self) -> u8 {
        if self.usable_ace() {
            self.hard_total + 10
        } else {
            self.hard_total
        }
    }

    pub fn is_bust(&self) -> bool {
        self.value() > MAX_TOTAL
    }
}

/// Terminal reward for a finished hand: +1 win, 0 push, -1 loss
pub fn outcome(player_total: u8, dealer_total: u8) -> f64 {
    if player_total > MAX_TOTAL {
        -1.0
    } else if dealer_total > MAX_TOTAL || player_total > dealer_total {
        1.0
    } else if player_total == dealer_total {
        0.0
    } else {
        -1.0
    }
}

/// The space of `(State, Action)` pairs over all decision states
///
/// Player totals 12–21, dealer cards 1–10, both ace flags, both actions: 400 keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlackjackSpace;

impl BlackjackSpace {
    /// Number of decision states
    pub const STATES: usize = 200;

    /// All decision states in key order
    pub fn states() -> impl Iterator<Item = State> {
        (MIN_DECISION_TOTAL..=MAX_TOTAL).flat_map(|player_total| {
            (1..=MAX_CARD).flat_map(move |dealer_card| {
                [false, true].map(move |usable_ace| State {
                    player_total,
                    dealer_card,
                    usable_ace,
                })
            })
        })
    }
}

impl Keyspace for BlackjackSpace {
    type Key = (State, Action);

    fn len(&self) -> usize {
        Self::STATES * Action::ALL.len()
    }

    fn offset(&self, (state, action): (State, Action)) -> Option<usize> {
        let State {
            player_total,
            dealer_card,
            usable_ace,
        } = state;
        if !(MIN_DECISION_TOTAL..=MAX_TOTAL).contains(&player_total)
            || !(1..=MAX_CARD).contains(&dealer_card)
        {
            return None;
        }
        let row = (player_total - MIN_DECISION_TOTAL) as usize * MAX_CARD as usize
            + (dealer_card - 1) as usize;
        Some((row * 2 + usable_ace as usize) * 2 + action as usize)
    }

    fn key(&self, offset: usize) -> (State, Action) {
        let action = Action::ALL[offset % 2];
        let usable_ace = (offset / 2) % 2 == 1;
        let row = offset / 4;
        let state = State {
            player_total: MIN_DECISION_TOTAL + (row / MAX_CARD as usize) as u8,
            dealer_card: 1 + (row % MAX_CARD as usize) as u8,
            usable_ace,
        };
        (state, action)
    }
}

/// Table rules, injected as predicates over hand totals
#[derive(Debug, Clone, Copy)]
pub struct Rules {
    /// Player totals at which drawing is forced and no decision is recorded
    ///
    /// **Default**: `|total| total < 12`
    pub forced_draw: fn(u8) -> bool,
    /// Dealer totals at which the dealer draws another card
    ///
    /// **Default**: `|total| total < 17`
    pub dealer_draws: fn(u8) -> bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            forced_draw: |total| total < MIN_DECISION_TOTAL,
            dealer_draws: |total| total < 17,
        }
    }
}

/// Plays single episodes under a behavior policy
#[derive(Debug, Clone, Copy, Default)]
pub struct EpisodeGenerator {
    rules: Rules,
}

impl EpisodeGenerator {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Play one episode and record every decision
    ///
    /// ### Parameters
    /// - `deck` - Where cards come from
    /// - `policy` - Behavior policy consulted at each decision
    /// - `start_state` - Forced initial state; the dealer then receives `dealer_card` plus one drawn card
    /// - `start_action` - Forced action for the first decision only
    pub fn generate<D, P>(
        &self,
        deck: &mut D,
        policy: P,
        start_state: Option<State>,
        mut start_action: Option<Action>,
    ) -> Trajectory<State, Action>
    where
        D: CardSource + ?Sized,
        P: Fn(State) -> Action,
    {
        let (mut player, mut dealer, dealer_card) = match start_state {
            Some(s) => (
                Hand::with_value(s.player_total, s.usable_ace),
                Hand::from_cards(&[s.dealer_card, deck.draw()]),
                s.dealer_card,
            ),
            None => {
                let (p, d) = deck.initial_hands();
                (Hand::from_cards(&p), Hand::from_cards(&d), d[0])
            }
        };

        let mut trajectory = Trajectory::new();
        loop {
            let player_total = player.value();
            let action = if (self.rules.forced_draw)(player_total) {
                Action::Draw
            } else {
                let state = State {
                    player_total,
                    dealer_card,
                    usable_ace: player.usable_ace(),
                };
                let action = start_action.take().unwrap_or_else(|| policy(state));
                trajectory.push(state, action);
                action
            };

            match action {
                Action::Draw => {
                    player.add(deck.draw());
                    if player.is_bust() {
                        trajectory.reward = -1.0;
                        return trajectory;
                    }
                }
                Action::Stand => break,
            }
        }

        while !dealer.is_bust() && (self.rules.dealer_draws)(dealer.value()) {
            dealer.add(deck.draw());
        }

        trajectory.reward = outcome(player.value(), dealer.value());
        trajectory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::tests::ScriptedDeck;

    fn state(player_total: u8, dealer_card: u8, usable_ace: bool) -> State {
        State {
            player_total,
            dealer_card,
            usable_ace,
        }
    }

    #[test]
    fn hand_arithmetic() {
        let mut hand = Hand::from_cards(&[1, 6]);
        assert!(hand.usable_ace(), "soft 17");
        assert_eq!(hand.value(), 17);

        hand.add(10);
        assert!(!hand.usable_ace(), "ace drops to 1");
        assert_eq!(hand.value(), 17);
        assert!(!hand.is_bust());

        hand.add(5);
        assert!(hand.is_bust(), "22 busts");

        assert_eq!(Hand::from_cards(&[1, 10]).value(), 21, "natural");
        assert_eq!(Hand::from_cards(&[1, 1]).value(), 12, "only one ace counts 11");
    }

    #[test]
    fn forced_start_hands_match_state() {
        for s in BlackjackSpace::states() {
            let hand = Hand::with_value(s.player_total, s.usable_ace);
            assert_eq!(hand.value(), s.player_total, "value for {s:?}");
            assert_eq!(hand.usable_ace(), s.usable_ace, "ace flag for {s:?}");
        }
    }

    #[test]
    fn outcome_rules() {
        assert_eq!(outcome(20, 18), 1.0, "higher total wins");
        assert_eq!(outcome(15, 22), 1.0, "dealer bust");
        assert_eq!(outcome(19, 19), 0.0, "push");
        assert_eq!(outcome(17, 20), -1.0, "lower total loses");
        assert_eq!(outcome(22, 22), -1.0, "player bust loses first");
    }

    #[test]
    fn keyspace_order_matches_key_order() {
        let space = BlackjackSpace;
        let keys = (0..space.len()).map(|ix| space.key(ix)).collect::<Vec<_>>();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted, "offset order equals Ord");
        assert!(keys.iter().enumerate().all(|(ix, &k)| space.offset(k) == Some(ix)));
        assert_eq!(BlackjackSpace::states().count(), BlackjackSpace::STATES);
        assert_eq!(space.offset((state(11, 5, false), Action::Draw)), None);
        assert_eq!(space.offset((state(15, 11, false), Action::Draw)), None);
    }

    #[test]
    fn forced_stand_resolves_against_dealer() {
        let generator = EpisodeGenerator::default();
        // dealer: 5 + 10 = 15, draws 3 -> 18
        let mut deck = ScriptedDeck::new([10, 3, 9]);
        let start = state(20, 5, false);
        let trajectory = generator.generate(&mut deck, |_| Action::Draw, Some(start), Some(Action::Stand));

        assert_eq!(trajectory.steps, [(start, Action::Stand)], "single decision");
        assert_eq!(trajectory.reward, 1.0, "20 beats 18");
        assert_eq!(deck.0, [9], "dealer stopped at 18");
    }

    #[test]
    fn draw_into_bust_is_recorded() {
        let generator = EpisodeGenerator::default();
        // dealer second card, then the player's draw
        let mut deck = ScriptedDeck::new([10, 5]);
        let start = state(20, 5, false);
        let trajectory = generator.generate(&mut deck, |_| Action::Stand, Some(start), Some(Action::Draw));

        assert_eq!(trajectory.steps, [(start, Action::Draw)]);
        assert_eq!(trajectory.reward, -1.0, "bust loses");
    }

    #[test]
    fn policy_takes_over_after_start_action() {
        let generator = EpisodeGenerator::default();
        // dealer 10 + 7 = 17, player soft 13 draws 2 -> soft 15
        let mut deck = ScriptedDeck::new([7, 2]);
        let start = state(13, 10, true);
        let trajectory = generator.generate(&mut deck, |_| Action::Stand, Some(start), Some(Action::Draw));

        assert_eq!(
            trajectory.steps,
            [(start, Action::Draw), (state(15, 10, true), Action::Stand)]
        );
        assert_eq!(trajectory.reward, -1.0, "15 loses to 17");
    }

    #[test]
    fn low_totals_are_not_decisions() {
        let generator = EpisodeGenerator::default();
        // player 2+3, dealer 10+7, then forced draws 4, 2, 5 -> 16
        let mut deck = ScriptedDeck::new([2, 3, 10, 7, 4, 2, 5]);
        let trajectory = generator.generate(&mut deck, |_| Action::Stand, None, None);

        assert_eq!(trajectory.steps, [(state(16, 10, false), Action::Stand)]);
        assert_eq!(trajectory.reward, -1.0);
    }

    #[test]
    fn injected_rules_move_boundaries() {
        // default: 11 is forced, 12 is a decision
        let generator = EpisodeGenerator::default();
        let mut deck = ScriptedDeck::new([5, 6, 10, 7, 1]);
        let trajectory = generator.generate(&mut deck, |_| Action::Stand, None, None);
        assert_eq!(trajectory.steps[0].0.player_total, 12, "11 drew an ace");

        let generator = EpisodeGenerator::new(Rules {
            forced_draw: |total| total < 11,
            ..Rules::default()
        });
        let mut deck = ScriptedDeck::new([5, 6, 10, 7]);
        let trajectory = generator.generate(&mut deck, |_| Action::Stand, None, None);
        assert_eq!(trajectory.steps, [(state(11, 10, false), Action::Stand)], "11 is a decision");

        // dealer draws on 16, stands on 17
        let generator = EpisodeGenerator::default();
        let mut deck = ScriptedDeck::new([6, 10]);
        let trajectory = generator.generate(&mut deck, |_| Action::Stand, Some(state(18, 10, false)), None);
        assert_eq!(trajectory.reward, 1.0, "dealer 16 draws and busts");

        let mut deck = ScriptedDeck::new([7, 10]);
        let trajectory = generator.generate(&mut deck, |_| Action::Stand, Some(state(18, 10, false)), None);
        assert_eq!(trajectory.reward, 1.0, "18 beats 17");
        assert_eq!(deck.0, [10], "dealer stood on 17");
    }
}
