use std::error::Error;

use log::info;
use rand::{rngs::StdRng, SeedableRng};
use tabular_rl::{
    algo::tabular::monte_carlo_es::{MonteCarloES, MonteCarloESConfig},
    env::blackjack::{Action, BlackjackSpace},
    gym::InfiniteDeck,
};

const EPISODES: usize = 500_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut agent = MonteCarloES::new(MonteCarloESConfig::default());
    let mut deck = InfiniteDeck::new(StdRng::seed_from_u64(0));
    let mut rng = StdRng::seed_from_u64(1);
    let report = agent.train(EPISODES, &mut deck, &mut rng)?;

    let window = EPISODES / 10;
    info!(
        "policy changes: first {window} episodes {}, last {window} episodes {}",
        report.churn(0..window),
        report.churn(EPISODES - window..EPISODES)
    );

    // lowest total the learned policy stands on, per dealer card
    for usable_ace in [false, true] {
        let thresholds = (1..=10)
            .map(|dealer_card| {
                BlackjackSpace::states()
                    .filter(|s| s.dealer_card == dealer_card && s.usable_ace == usable_ace)
                    .find(|&s| agent.action(s) == Some(Action::Stand))
                    .map(|s| s.player_total)
            })
            .collect::<Vec<_>>();
        info!("usable ace {usable_ace}: stand from {thresholds:?}");
    }

    Ok(())
}
