use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::{
    ds::{Keyspace, ValueTable},
    error::{Error, Result},
};

use super::Exploration;

/// Softmax exploration policy (also known as Boltzmann exploration) with a fixed temperature
///
/// Every key is chosen with probability proportional to e<sup>Q/τ</sup>. A low temperature
/// approaches greedy selection, a high one approaches uniform selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Softmax {
    temperature: f64,
}

impl Default for Softmax {
    /// `temperature = 0.6`
    fn default() -> Self {
        Self { temperature: 0.6 }
    }
}

impl Softmax {
    /// **Errors** if `temperature` is not a positive finite number
    pub fn new(temperature: f64) -> Result<Self> {
        if !(temperature > 0.0 && temperature.is_finite()) {
            return Err(Error::InvalidConfiguration(format!(
                "Invalid value for `temperature`. Must be positive and finite, got {temperature}."
            )));
        }
        Ok(Self { temperature })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Selection probabilities for each value, in the same order
    ///
    /// Values are shifted by their maximum before exponentiation. If the weights still
    /// degenerate (zero or non-finite sum) the distribution falls back to uniform.
    pub fn probabilities(&self, values: &[f64]) -> Vec<f64> {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights = values
            .iter()
            .map(|v| ((v - max) / self.temperature).exp())
            .collect::<Vec<_>>();
        let sum: f64 = weights.iter().sum();

        if sum > 0.0 && sum.is_finite() {
            weights.into_iter().map(|w| w / sum).collect()
        } else {
            vec![1.0 / values.len() as f64; values.len()]
        }
    }
}

impl Exploration for Softmax {
    fn requires_warm_up(&self) -> bool {
        true
    }

    fn select<S, R>(&self, table: &ValueTable<S>, rng: &mut R) -> S::Key
    where
        S: Keyspace,
        R: Rng + ?Sized,
    {
        let values = table.values().collect::<Vec<_>>();
        let probs = self.probabilities(&values);
        let ix = match WeightedIndex::new(&probs) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..probs.len()),
        };
        table.space().key(ix)
    }
}
