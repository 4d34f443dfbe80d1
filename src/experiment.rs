//! Side-by-side comparison of epsilon greedy and softmax agents on random bandits
//!
//! Every episode builds a fresh [`BanditWorld`] and lets one agent of each kind play it.
//! The resulting summaries are what reward curves and distribution plots are drawn from.

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    algo::tabular::sample_average::{History, SampleAverageAgent, SampleAverageAgentConfig},
    env::Shape,
    error::{Error, Result},
    exploration::{EpsilonGreedy, Exploration, Softmax},
    gym::{k_armed_bandit::validate_std_dev, BanditWorld},
};

/// Configuration for [`run`]
#[derive(Debug, Clone, PartialEq)]
pub struct BanditExperimentConfig {
    /// **Default**: `5`
    pub machines: usize,
    /// Levers per machine
    ///
    /// **Default**: `5`
    pub levers: usize,
    /// Policy-driven pulls per agent and episode
    ///
    /// **Default**: `1000`
    pub steps: usize,
    /// Standard deviation of every arm's reward distribution
    ///
    /// **Default**: `10.0`
    pub std_dev: f64,
    /// Number of independent worlds
    ///
    /// **Default**: `100`
    pub episodes: usize,
    /// **Default**: `0.1`
    pub epsilon: f64,
    /// **Default**: `0.6`
    pub temperature: f64,
    /// Seed all worlds and agents are derived from
    ///
    /// **Default**: `0`
    pub seed: u64,
}

impl Default for BanditExperimentConfig {
    fn default() -> Self {
        Self {
            machines: 5,
            levers: 5,
            steps: 1000,
            std_dev: 10.0,
            episodes: 100,
            epsilon: 0.1,
            temperature: 0.6,
            seed: 0,
        }
    }
}

/// Aggregated results of one policy across all episodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Cumulative reward of each episode
    pub cumulative_rewards: Vec<f64>,
    /// Mean reward at each step across episodes
    pub mean_per_step: Vec<f64>,
    /// Population standard deviation of the reward at each step across episodes
    pub std_per_step: Vec<f64>,
}

impl Summary {
    /// Summarize histories, considering only their first `len` steps
    fn new(histories: &[History], len: usize) -> Self {
        let n = histories.len() as f64;
        let (mean_per_step, std_per_step) = (0..len)
            .map(|t| {
                let mean = histories.iter().map(|h| h.rewards[t]).sum::<f64>() / n;
                let var = histories
                    .iter()
                    .map(|h| (h.rewards[t] - mean).powi(2))
                    .sum::<f64>()
                    / n;
                (mean, var.sqrt())
            })
            .unzip();

        Self {
            cumulative_rewards: histories.iter().map(|h| h.cumulative_reward).collect(),
            mean_per_step,
            std_per_step,
        }
    }

    pub fn mean_cumulative_reward(&self) -> f64 {
        self.cumulative_rewards.iter().sum::<f64>() / self.cumulative_rewards.len() as f64
    }
}

/// Results for both policies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub epsilon_greedy: Summary,
    pub softmax: Summary,
}

fn play<X: Exploration>(
    exploration: X,
    config: &BanditExperimentConfig,
    shape: Shape,
    world: &mut BanditWorld,
    rng: &mut StdRng,
) -> Result<History> {
    let agent_config = SampleAverageAgentConfig {
        exploration,
        steps: config.steps,
    };
    let mut agent = SampleAverageAgent::new(agent_config, shape)?;
    agent.go(world, rng)?;
    Ok(agent.into_history())
}

/// Run the comparison
///
/// Per-step statistics cover the steps every run has, so the softmax warm-up tail is cut.
///
/// **Errors** if any parameter is invalid, before any world is built
pub fn run(config: &BanditExperimentConfig) -> Result<Comparison> {
    if config.episodes == 0 {
        return Err(Error::InvalidConfiguration(
            "`episodes` must be at least 1".into(),
        ));
    }
    let shape = Shape::new(config.machines, config.levers)?;
    let epsilon_greedy = EpsilonGreedy::new(config.epsilon)?;
    let softmax = Softmax::new(config.temperature)?;
    validate_std_dev(config.std_dev)?;
    // validates the step budget before anything is sampled
    SampleAverageAgent::new(
        SampleAverageAgentConfig {
            exploration: epsilon_greedy,
            steps: config.steps,
        },
        shape,
    )?;

    let mut seeds = StdRng::seed_from_u64(config.seed);
    let mut eg_histories = Vec::with_capacity(config.episodes);
    let mut sm_histories = Vec::with_capacity(config.episodes);
    for episode in 0..config.episodes {
        let mut world = BanditWorld::new(shape, config.std_dev, StdRng::seed_from_u64(seeds.gen()))?;
        let mut rng = StdRng::seed_from_u64(seeds.gen());

        let eg = play(epsilon_greedy, config, shape, &mut world, &mut rng)?;
        let sm = play(softmax, config, shape, &mut world, &mut rng)?;
        debug!(
            "episode {episode}: epsilon greedy {:.2}, softmax {:.2}",
            eg.cumulative_reward, sm.cumulative_reward
        );
        eg_histories.push(eg);
        sm_histories.push(sm);
    }

    let len = eg_histories
        .iter()
        .chain(&sm_histories)
        .map(History::len)
        .min()
        .unwrap_or(0);
    let comparison = Comparison {
        epsilon_greedy: Summary::new(&eg_histories, len),
        softmax: Summary::new(&sm_histories, len),
    };
    info!(
        "{} episodes on {}x{} bandits: mean cumulative reward epsilon greedy {:.2}, softmax {:.2}",
        config.episodes,
        config.machines,
        config.levers,
        comparison.epsilon_greedy.mean_cumulative_reward(),
        comparison.softmax.mean_cumulative_reward()
    );
    Ok(comparison)
}
