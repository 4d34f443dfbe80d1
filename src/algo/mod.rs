pub mod tabular;

pub use tabular::{monte_carlo_es::MonteCarloES, sample_average::SampleAverageAgent};
