use std::{collections::HashMap, ops::Range};

use log::{debug, info};
use rand::Rng;

use crate::{
    ds::ValueTable,
    env::{
        blackjack::{
            Action, BlackjackSpace, EpisodeGenerator, Rules, State, MAX_CARD, MAX_TOTAL,
            MIN_DECISION_TOTAL,
        },
        CardSource,
    },
    error::Result,
    memory::Trajectory,
};

/// Configuration for the [`MonteCarloES`] agent
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloESConfig {
    /// Rules the episodes are played under
    ///
    /// Forced draws must cover every total below 12, since only totals 12–21 have Q values.
    ///
    /// **Default**: [`Rules::default`]
    pub rules: Rules,
    /// Lowest player total the initial policy stands on
    ///
    /// **Default**: `20`
    pub stand_threshold: u8,
}

impl Default for MonteCarloESConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            stand_threshold: 20,
        }
    }
}

/// Per-episode statistics collected by [`MonteCarloES::train`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingReport {
    /// Number of states whose greedy action changed in each episode
    pub policy_changes: Vec<usize>,
}

impl TrainingReport {
    pub fn episodes(&self) -> usize {
        self.policy_changes.len()
    }

    /// Total policy changes over a range of episodes, clamped to the episodes recorded
    pub fn churn(&self, episodes: Range<usize>) -> usize {
        let end = episodes.end.min(self.policy_changes.len());
        let start = episodes.start.min(end);
        self.policy_changes[start..end].iter().sum()
    }
}

/// Monte Carlo control with exploring starts
///
/// Every episode starts from a uniformly random decision state and first action, then
/// follows the current greedy policy. The return of the episode is averaged into the Q value of
/// each `(state, action)` pair on its first visit, and the policy at that state is immediately
/// made greedy with respect to the new values. Ties go to [`Action::Stand`].
///
/// Returns are kept as running means, so each Q value is exactly the average of the returns
/// observed for its pair.
pub struct MonteCarloES {
    q_table: ValueTable<BlackjackSpace>,
    policy: HashMap<State, Action>,
    generator: EpisodeGenerator,
    stand_threshold: u8,
    episode: u32,
}

impl MonteCarloES {
    /// Initialize a new agent with zeroed Q values and a threshold policy
    pub fn new(config: MonteCarloESConfig) -> Self {
        let policy = BlackjackSpace::states()
            .map(|s| (s, prior(s, config.stand_threshold)))
            .collect();
        Self {
            q_table: ValueTable::new(BlackjackSpace),
            policy,
            generator: EpisodeGenerator::new(config.rules),
            stand_threshold: config.stand_threshold,
            episode: 0,
        }
    }

    pub fn q_table(&self) -> &ValueTable<BlackjackSpace> {
        &self.q_table
    }

    pub fn policy(&self) -> &HashMap<State, Action> {
        &self.policy
    }

    /// The greedy action at `state`, if it is a decision state
    pub fn action(&self, state: State) -> Option<Action> {
        self.policy.get(&state).copied()
    }

    /// Number of episodes played so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Draw a uniformly random decision state and first action
    fn exploring_start<R: Rng + ?Sized>(rng: &mut R) -> (State, Action) {
        let state = State {
            player_total: rng.gen_range(MIN_DECISION_TOTAL..=MAX_TOTAL),
            dealer_card: rng.gen_range(1..=MAX_CARD),
            usable_ace: rng.gen_bool(0.5),
        };
        let action = Action::ALL[rng.gen_range(0..Action::ALL.len())];
        (state, action)
    }

    /// Average the episode's return into every first-visited pair and improve the policy
    ///
    /// **Returns** the number of states whose greedy action changed
    fn learn(&mut self, trajectory: &Trajectory<State, Action>) -> Result<usize> {
        let mut changes = 0;
        for (state, action) in trajectory.first_visits() {
            self.q_table.update((state, action), trajectory.reward)?;

            let greedy = self
                .q_table
                .best_among(Action::ALL.map(|a| (state, a)))?
                .map_or(Action::Stand, |(_, a)| a);
            if self.policy.insert(state, greedy) != Some(greedy) {
                changes += 1;
            }
        }
        Ok(changes)
    }

    /// Play and learn from a single episode
    ///
    /// **Returns** the number of states whose greedy action changed
    pub fn go<D, R>(&mut self, deck: &mut D, rng: &mut R) -> Result<usize>
    where
        D: CardSource + ?Sized,
        R: Rng + ?Sized,
    {
        let (start_state, start_action) = Self::exploring_start(rng);
        let policy = &self.policy;
        let threshold = self.stand_threshold;
        let trajectory = self.generator.generate(
            deck,
            |s| policy.get(&s).copied().unwrap_or_else(|| prior(s, threshold)),
            Some(start_state),
            Some(start_action),
        );

        let changes = self.learn(&trajectory)?;
        self.episode += 1;
        Ok(changes)
    }

    /// Play and learn from `episodes` episodes
    pub fn train<D, R>(&mut self, episodes: usize, deck: &mut D, rng: &mut R) -> Result<TrainingReport>
    where
        D: CardSource + ?Sized,
        R: Rng + ?Sized,
    {
        let mut report = TrainingReport {
            policy_changes: Vec::with_capacity(episodes),
        };
        let tenth = (episodes / 10).max(1);
        for i in 1..=episodes {
            report.policy_changes.push(self.go(deck, rng)?);
            if i % tenth == 0 {
                debug!(
                    "episode {i}/{episodes}: {} policy changes in the last {tenth}",
                    report.churn(i - tenth..i)
                );
            }
        }

        info!(
            "trained {episodes} episodes with {} policy changes",
            report.churn(0..episodes)
        );
        Ok(report)
    }
}

/// Stand at or above `threshold`, draw below it
fn prior(state: State, threshold: u8) -> Action {
    if state.player_total >= threshold {
        Action::Stand
    } else {
        Action::Draw
    }
}
