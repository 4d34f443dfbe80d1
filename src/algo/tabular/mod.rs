pub mod monte_carlo_es;
pub mod sample_average;
