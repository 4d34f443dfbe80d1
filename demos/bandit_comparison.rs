use std::error::Error;

use log::info;
use tabular_rl::experiment::{self, BanditExperimentConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BanditExperimentConfig::default();
    let comparison = experiment::run(&config)?;

    for (name, summary) in [
        ("epsilon greedy", &comparison.epsilon_greedy),
        ("softmax", &comparison.softmax),
    ] {
        let last = summary.mean_per_step.len() - 1;
        info!(
            "{name}: mean cumulative reward {:.2}, final step reward {:.2} ± {:.2}",
            summary.mean_cumulative_reward(),
            summary.mean_per_step[last],
            summary.std_per_step[last],
        );
    }

    Ok(())
}
