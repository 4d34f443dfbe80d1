use rand::Rng;

use crate::{
    ds::{Keyspace, ValueTable},
    ensure_interval,
    error::Result,
};

use super::{Choice, Exploration};

/// Epsilon greedy exploration policy with a fixed exploration rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl Default for EpsilonGreedy {
    /// `epsilon = 0.1`
    fn default() -> Self {
        Self { epsilon: 0.1 }
    }
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy with exploration probability `epsilon`
    ///
    /// **Errors** if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f64) -> Result<Self> {
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Decide between exploring and exploiting with a single uniform draw
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f64>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

impl Exploration for EpsilonGreedy {
    fn select<S, R>(&self, table: &ValueTable<S>, rng: &mut R) -> S::Key
    where
        S: Keyspace,
        R: Rng + ?Sized,
    {
        match self.choose(rng) {
            Choice::Explore => table.space().key(rng.gen_range(0..table.len())),
            Choice::Exploit => table.best(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    use super::*;
    use crate::env::{ArmKey, Shape};

    #[test]
    fn epsilon_validated() {
        assert!(EpsilonGreedy::new(-0.1).is_err());
        assert!(EpsilonGreedy::new(1.1).is_err());
        assert!(EpsilonGreedy::new(f64::NAN).is_err());
        assert!(EpsilonGreedy::new(0.0).is_ok());
        assert!(EpsilonGreedy::new(1.0).is_ok());
    }

    #[test]
    fn zero_epsilon_always_exploits() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut table = ValueTable::new(Shape::new(3, 3).unwrap());
        let policy = EpsilonGreedy::new(0.0).unwrap();

        assert!(
            (0..100).all(|_| policy.select(&table, &mut rng) == ArmKey { machine: 0, lever: 0 }),
            "cold table exploits the lowest key"
        );

        table.update(ArmKey { machine: 2, lever: 1 }, 3.0).unwrap();
        table.update(ArmKey { machine: 1, lever: 1 }, 1.0).unwrap();
        assert!(
            (0..1000).all(|_| policy.select(&table, &mut rng) == ArmKey { machine: 2, lever: 1 }),
            "always picks the best key"
        );
    }

    #[test]
    fn full_epsilon_is_uniform() {
        const TRIALS: usize = 60_000;
        let mut rng = StdRng::seed_from_u64(11);
        let mut table = ValueTable::new(Shape::new(2, 3).unwrap());
        table.update(ArmKey { machine: 0, lever: 2 }, 100.0).unwrap();
        let policy = EpsilonGreedy::new(1.0).unwrap();

        let mut counts = vec![0usize; table.len()];
        for _ in 0..TRIALS {
            let key = policy.select(&table, &mut rng);
            counts[table.space().offset(key).unwrap()] += 1;
        }

        let expected = TRIALS as f64 / counts.len() as f64;
        let chi2: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        let critical = ChiSquared::new((counts.len() - 1) as f64)
            .unwrap()
            .inverse_cdf(0.999);
        assert!(chi2 < critical, "chi2 {chi2} exceeds {critical}: {counts:?}");
    }
}
