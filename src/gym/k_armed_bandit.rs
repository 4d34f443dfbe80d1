use rand::{rngs::StdRng, Rng};
use rand_distr::{Distribution, Normal};

use crate::{
    ds::Keyspace,
    env::{ArmKey, RewardSource, Shape},
    error::{Error, Result},
};

/// Upper bound of the integer true means drawn for each arm
pub const MAX_MEAN: u32 = 1000;

pub(crate) fn validate_std_dev(std_dev: f64) -> Result<()> {
    if !(std_dev > 0.0 && std_dev.is_finite()) {
        return Err(Error::InvalidConfiguration(format!(
            "Invalid value for `std_dev`. Must be positive and finite, got {std_dev}."
        )));
    }
    Ok(())
}

/// Multi-machine bandit environment
///
/// A grid of `machines × levers` arms, each of which has a normal distribution of rewards
/// around a hidden true mean. Rewards are rounded to two decimals and never negative.
/// The goal is to learn which arm has the highest mean reward.
#[derive(Debug, Clone)]
pub struct BanditWorld<R = StdRng> {
    shape: Shape,
    arms: Vec<Normal<f64>>,
    rng: R,
}

impl<R: Rng> BanditWorld<R> {
    /// Initialize a new bandit with true means drawn uniformly from `0..=1000`
    ///
    /// **Errors** if `std_dev` is not a positive finite number
    pub fn new(shape: Shape, std_dev: f64, mut rng: R) -> Result<Self> {
        validate_std_dev(std_dev)?;
        let means = (0..shape.len())
            .map(|_| rng.gen_range(0..=MAX_MEAN) as f64)
            .collect();
        Self::with_means(shape, means, std_dev, rng)
    }

    /// Initialize a new bandit with the given true means in row-major order
    ///
    /// **Errors** if `std_dev` is not a positive finite number or `means` does not match `shape`
    pub fn with_means(shape: Shape, means: Vec<f64>, std_dev: f64, rng: R) -> Result<Self> {
        validate_std_dev(std_dev)?;
        if means.len() != shape.len() {
            return Err(Error::InvalidConfiguration(format!(
                "expected {} means for shape {shape:?}, got {}",
                shape.len(),
                means.len()
            )));
        }
        let arms = means
            .into_iter()
            .map(|mean| Normal::new(mean, std_dev))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
        Ok(Self { shape, arms, rng })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The hidden true means in row-major order
    pub fn true_means(&self) -> impl Iterator<Item = f64> + '_ {
        self.arms.iter().map(|arm| arm.mean())
    }
}

impl<R: Rng> RewardSource for BanditWorld<R> {
    type Key = ArmKey;

    fn reward(&mut self, key: ArmKey) -> Result<f64> {
        let ix = self
            .shape
            .offset(key)
            .ok_or_else(|| Error::out_of_range(key, self.shape))?;
        let reward = (self.arms[ix].sample(&mut self.rng) * 100.0).round() / 100.0;
        Ok(reward.max(0.0))
    }
}
