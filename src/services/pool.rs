use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;

/// Tracks which items a session has already been given
#[derive(Debug, Clone, Default)]
pub struct RecommendationPool {
    seen: HashSet<usize>,
}

/// Candidates for the next pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub candidates: Vec<usize>,
    /// Every item had been issued, so the pool started over
    pub reset: bool,
}

impl RecommendationPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items from `universe` not yet issued, in `universe` order
    ///
    /// When everything has been issued the pool is cleared and the whole
    /// universe is offered again with `reset` set. An empty universe yields
    /// no candidates and never resets.
    pub fn available<I>(&mut self, universe: I) -> Draw
    where
        I: IntoIterator<Item = usize>,
    {
        let universe: Vec<usize> = universe.into_iter().collect();
        let candidates: Vec<usize> = universe
            .iter()
            .copied()
            .filter(|i| !self.seen.contains(i))
            .collect();

        if candidates.is_empty() && !universe.is_empty() {
            tracing::debug!(size = universe.len(), "Recommendation pool exhausted, resetting");
            self.seen.clear();
            return Draw {
                candidates: universe,
                reset: true,
            };
        }

        Draw {
            candidates,
            reset: false,
        }
    }

    pub fn mark(&mut self, index: usize) {
        self.seen.insert(index);
    }

    pub fn is_seen(&self, index: usize) -> bool {
        self.seen.contains(&index)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Uniform random pick
pub fn choose<T: Copy, R: Rng + ?Sized>(candidates: &[T], rng: &mut R) -> Option<T> {
    candidates.choose(rng).copied()
}
