use std::{collections::HashSet, hash::Hash};

/// The decisions made during one episode and the outcome they led to
///
/// Trajectories are transient: they are built by an episode generator and
/// discarded once their return has been applied to a value table.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<S, A> {
    /// `(state, action)` pairs in the order they were taken
    pub steps: Vec<(S, A)>,
    /// The single terminal reward of the episode
    pub reward: f64,
}

impl<S, A> Trajectory<S, A> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            reward: 0.0,
        }
    }

    pub fn push(&mut self, state: S, action: A) {
        self.steps.push((state, action));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<S, A> Default for Trajectory<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Trajectory<S, A>
where
    S: Copy + Eq + Hash,
    A: Copy + Eq + Hash,
{
    /// Iterate over `(state, action)` pairs, yielding each only on its first occurrence
    pub fn first_visits(&self) -> impl Iterator<Item = (S, A)> + '_ {
        let mut seen = HashSet::with_capacity(self.steps.len());
        self.steps.iter().copied().filter(move |&step| seen.insert(step))
    }
}
