use std::fmt::Debug;

use crate::error::{Error, Result};

/// A finite, totally ordered space of keys with a fixed row-major layout
///
/// Implementors must map keys to offsets `0..len()` such that offset order
/// equals the key's [`Ord`] order. [`ValueTable`] relies on this to break ties
/// deterministically in favor of the lowest key.
pub trait Keyspace: Debug {
    type Key: Copy + Ord + Debug;

    /// Number of keys in the space, always at least one
    fn len(&self) -> usize;

    /// Row-major offset of `key`, or `None` if it lies outside the space
    fn offset(&self, key: Self::Key) -> Option<usize>;

    /// Inverse of [`offset`](Keyspace::offset) for `offset < len()`
    fn key(&self, offset: usize) -> Self::Key;
}

/// A cell in the table
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    /// Running mean of all rewards applied to this cell
    pub value: f64,
    /// Number of rewards applied to this cell
    pub count: u32,
}

/// Fixed-shape table of sample-average action values
///
/// Every cell starts at zero with a count of zero. The values are updated using the rule:
///
/// Q<sub>n+1</sub> = Q<sub>n</sub> + (R<sub>n</sub> - Q<sub>n</sub>) / n
///
/// which keeps each value equal to the arithmetic mean of the rewards it has seen.
#[derive(Debug, Clone)]
pub struct ValueTable<S: Keyspace> {
    space: S,
    entries: Vec<Entry>,
}

impl<S: Keyspace> ValueTable<S> {
    /// Allocate a zeroed table covering `space`
    pub fn new(space: S) -> Self {
        let entries = vec![Entry::default(); space.len()];
        Self { space, entries }
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn offset(&self, key: S::Key) -> Result<usize> {
        self.space
            .offset(key)
            .ok_or_else(|| Error::out_of_range(key, &self.space))
    }

    /// Get the cell for `key`
    pub fn get(&self, key: S::Key) -> Result<Entry> {
        let ix = self.offset(key)?;
        Ok(self.entries[ix])
    }

    /// Apply a new reward sample to `key` and return the updated cell
    pub fn update(&mut self, key: S::Key, reward: f64) -> Result<Entry> {
        let ix = self.offset(key)?;
        let e = &mut self.entries[ix];
        e.count += 1;
        e.value += (reward - e.value) / e.count as f64;
        Ok(*e)
    }

    /// The key with the highest value in the whole table
    ///
    /// Ties go to the lowest key.
    pub fn best(&self) -> S::Key {
        let mut best = 0;
        for (ix, e) in self.entries.iter().enumerate().skip(1) {
            if e.value > self.entries[best].value {
                best = ix;
            }
        }
        self.space.key(best)
    }

    /// The key with the highest value among `keys`
    ///
    /// Ties go to the lowest key by [`Ord`], regardless of the order `keys` are yielded in.
    ///
    /// ### Returns
    /// - `Ok(None)` if `keys` is empty
    /// - `Err(KeyOutOfRange)` if any key lies outside the table
    pub fn best_among(&self, keys: impl IntoIterator<Item = S::Key>) -> Result<Option<S::Key>> {
        let mut best: Option<(S::Key, f64)> = None;
        for key in keys {
            let value = self.entries[self.offset(key)?].value;
            best = match best {
                Some((k, v)) if v > value || (v == value && k < key) => Some((k, v)),
                _ => Some((key, value)),
            };
        }
        Ok(best.map(|(k, _)| k))
    }

    /// All keys in row-major order
    pub fn keys(&self) -> impl Iterator<Item = S::Key> + '_ {
        (0..self.len()).map(|ix| self.space.key(ix))
    }

    /// All cells with their keys in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (S::Key, Entry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(ix, e)| (self.space.key(ix), *e))
    }

    /// All value estimates in row-major order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ArmKey, Shape};

    fn arm(machine: usize, lever: usize) -> ArmKey {
        ArmKey { machine, lever }
    }

    #[test]
    fn update_is_running_mean() {
        let mut table = ValueTable::new(Shape::new(2, 3).unwrap());
        let rewards = [3.0, -1.5, 10.25, 0.0, 7.0];
        for r in rewards {
            table.update(arm(1, 2), r).unwrap();
        }
        table.update(arm(0, 0), 4.0).unwrap();

        let e = table.get(arm(1, 2)).unwrap();
        let mean = rewards.iter().sum::<f64>() / rewards.len() as f64;
        assert_eq!(e.count, 5, "count matches number of updates");
        assert!((e.value - mean).abs() < 1e-12, "value is the arithmetic mean");
        assert_eq!(table.get(arm(0, 0)).unwrap().count, 1, "other cell counted separately");
        assert_eq!(table.get(arm(0, 1)).unwrap(), Entry::default(), "untouched cell stays zero");
    }

    #[test]
    fn out_of_range_keys_rejected() {
        let mut table = ValueTable::new(Shape::new(2, 3).unwrap());
        assert!(matches!(
            table.update(arm(2, 0), 1.0),
            Err(Error::KeyOutOfRange { .. })
        ));
        assert!(table.get(arm(0, 3)).is_err(), "lever out of range");
        assert!(
            table.best_among([arm(0, 0), arm(5, 5)]).is_err(),
            "subspace with foreign key"
        );
        assert!(table.iter().all(|(_, e)| e.count == 0), "table untouched");
    }

    #[test]
    fn best_breaks_ties_on_lowest_key() {
        let mut table = ValueTable::new(Shape::new(2, 2).unwrap());
        assert_eq!(table.best(), arm(0, 0), "cold table picks first key");

        table.update(arm(1, 0), 5.0).unwrap();
        table.update(arm(0, 1), 5.0).unwrap();
        assert_eq!(table.best(), arm(0, 1), "lowest of tied keys");

        table.update(arm(1, 1), 6.0).unwrap();
        assert_eq!(table.best(), arm(1, 1), "strict maximum wins");
    }

    #[test]
    fn best_among_ignores_iteration_order() {
        let mut table = ValueTable::new(Shape::new(3, 1).unwrap());
        table.update(arm(0, 0), 1.0).unwrap();
        table.update(arm(1, 0), 2.0).unwrap();
        table.update(arm(2, 0), 2.0).unwrap();

        let forward = table.best_among([arm(0, 0), arm(1, 0), arm(2, 0)]).unwrap();
        let reverse = table.best_among([arm(2, 0), arm(1, 0), arm(0, 0)]).unwrap();
        assert_eq!(forward, Some(arm(1, 0)));
        assert_eq!(reverse, Some(arm(1, 0)), "order independent");
        assert_eq!(table.best_among([arm(0, 0)]).unwrap(), Some(arm(0, 0)));
        assert_eq!(table.best_among([]).unwrap(), None, "empty subspace");
    }

    #[test]
    fn iteration_is_row_major() {
        let table = ValueTable::new(Shape::new(2, 2).unwrap());
        let keys = table.keys().collect::<Vec<_>>();
        assert_eq!(keys, [arm(0, 0), arm(0, 1), arm(1, 0), arm(1, 1)]);
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted, "offset order equals key order");
    }
}
