use log::{debug, trace};
use rand::Rng;

use crate::{
    ds::{Keyspace, ValueTable},
    env::{ArmKey, RewardSource, Shape},
    error::{Error, Result},
    exploration::{EpsilonGreedy, Exploration},
};

/// Configuration for the [`SampleAverageAgent`]
#[derive(Debug, Clone)]
pub struct SampleAverageAgentConfig<X> {
    /// Selection policy used at every step
    ///
    /// **Default**: [`EpsilonGreedy`] with `epsilon = 0.1`
    pub exploration: X,
    /// Number of policy-driven steps per run, not counting any warm-up sweep
    ///
    /// **Default**: `1000`
    pub steps: usize,
}

impl Default for SampleAverageAgentConfig<EpsilonGreedy> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::default(),
            steps: 1000,
        }
    }
}

/// Everything a run produced, in the order it happened
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    /// Sum of every reward fetched, warm-up included
    pub cumulative_reward: f64,
    /// Reward received at each step
    pub rewards: Vec<f64>,
    /// Arm pulled at each step
    pub choices: Vec<ArmKey>,
    /// How many leading entries come from the warm-up sweep
    pub warm_up_steps: usize,
}

impl History {
    fn record(&mut self, key: ArmKey, reward: f64) {
        self.cumulative_reward += reward;
        self.rewards.push(reward);
        self.choices.push(key);
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// The simplest tabular agent for a stateless bandit
///
/// This agent keeps a sample-average estimate for every arm in a [`ValueTable`] and
/// picks arms with its exploration policy. Policies that need a warm-up (such as
/// [`Softmax`](crate::exploration::Softmax)) get one pull of every arm before the first
/// decision.
pub struct SampleAverageAgent<X: Exploration> {
    table: ValueTable<Shape>,
    exploration: X,
    steps: usize,
    history: History,
    warmed_up: bool,
}

impl<X: Exploration> SampleAverageAgent<X> {
    /// Initialize a new `SampleAverageAgent` for a bandit of the given shape
    ///
    /// **Errors** if `config.steps` is zero
    pub fn new(config: SampleAverageAgentConfig<X>, shape: Shape) -> Result<Self> {
        if config.steps == 0 {
            return Err(Error::InvalidConfiguration(
                "action budget `steps` must be at least 1".into(),
            ));
        }
        Ok(Self {
            table: ValueTable::new(shape),
            exploration: config.exploration,
            steps: config.steps,
            history: History::default(),
            warmed_up: false,
        })
    }

    pub fn table(&self) -> &ValueTable<Shape> {
        &self.table
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Consume the agent, keeping its history
    pub fn into_history(self) -> History {
        self.history
    }

    /// Choose an arm based on the current estimates and exploration policy
    fn act<R: Rng + ?Sized>(&self, rng: &mut R) -> ArmKey {
        self.exploration.select(&self.table, rng)
    }

    /// Learn from a reward and record it
    fn learn(&mut self, key: ArmKey, reward: f64) -> Result<()> {
        self.table.update(key, reward)?;
        self.history.record(key, reward);
        Ok(())
    }

    /// Pull every arm once in row-major order
    fn warm_up<W>(&mut self, world: &mut W) -> Result<()>
    where
        W: RewardSource<Key = ArmKey> + ?Sized,
    {
        for ix in 0..self.table.len() {
            let key = self.table.space().key(ix);
            let reward = world.reward(key)?;
            self.learn(key, reward)?;
        }
        self.history.warm_up_steps += self.table.len();
        self.warmed_up = true;
        debug!(
            "warm-up pulled {} arms for {:.2} total reward",
            self.table.len(),
            self.history.cumulative_reward
        );
        Ok(())
    }

    /// Run the agent against the given reward source for its full step budget
    ///
    /// **Errors** with whatever the reward source fails with; the run stops at the failing step.
    pub fn go<W, R>(&mut self, world: &mut W, rng: &mut R) -> Result<()>
    where
        W: RewardSource<Key = ArmKey> + ?Sized,
        R: Rng + ?Sized,
    {
        if self.exploration.requires_warm_up() && !self.warmed_up {
            self.warm_up(world)?;
        }

        for step in 0..self.steps {
            let key = self.act(rng);
            let reward = world.reward(key)?;
            trace!("step {step}: pulled {key:?} for {reward}");
            self.learn(key, reward)?;
        }

        debug!(
            "run finished after {} pulls with {:.2} cumulative reward",
            self.history.len(),
            self.history.cumulative_reward
        );
        Ok(())
    }
}
