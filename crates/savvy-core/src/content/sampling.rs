//! Injectable randomness for "variety" picks.
//!
//! Several reply paths attach a random handful of catalog articles. They all
//! go through [`Shuffler`] so tests can pin the output.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::article::Article;

/// Picks `n` articles from a slice.
pub trait Shuffler: Send + Sync {
    fn sample(&self, articles: &[Article], n: usize) -> Vec<Article>;
}

/// Production shuffler backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn sample(&self, articles: &[Article], n: usize) -> Vec<Article> {
        let mut picked = articles.to_vec();
        picked.shuffle(&mut rand::thread_rng());
        picked.truncate(n);
        picked
    }
}

/// Deterministic shuffler seeded once; successive calls advance the RNG.
#[derive(Debug)]
pub struct SeededShuffler {
    rng: Mutex<StdRng>,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn sample(&self, articles: &[Article], n: usize) -> Vec<Article> {
        let mut picked = articles.to_vec();
        match self.rng.lock() {
            Ok(mut rng) => picked.shuffle(&mut *rng),
            Err(poisoned) => picked.shuffle(&mut *poisoned.into_inner()),
        }
        picked.truncate(n);
        picked
    }
}

/// Takes the first `n` articles without shuffling.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstN;

impl Shuffler for FirstN {
    fn sample(&self, articles: &[Article], n: usize) -> Vec<Article> {
        articles.iter().take(n).cloned().collect()
    }
}
