//! Per-agent random streams.
//!
//! Every randomized agent owns one [`RandomStream`]: a saved generator state.
//! A draw restores a working generator from that state, draws, and saves the
//! advanced state back. No other code touches the generator, so two agents'
//! draws never affect each other regardless of how their calls interleave,
//! and a stream seeded the same way replays the same draws.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Serializable snapshot of one agent's generator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomStream {
    state: ChaCha20Rng,
}

impl RandomStream {
    /// Seeded stream; equal seeds give equal draw sequences.
    pub fn from_seed(seed: u64) -> Self { Self { state: ChaCha20Rng::seed_from_u64(seed) } }

    /// Stream seeded from OS entropy.
    pub fn from_entropy() -> Self { Self { state: ChaCha20Rng::from_entropy() } }

    /// Run `f` against a generator restored from this stream, then save the
    /// generator's new state back.
    pub fn draw<T>(&mut self, f: impl FnOnce(&mut ChaCha20Rng) -> T) -> T {
        let mut rng = self.state.clone();
        let out = f(&mut rng);
        self.state = rng;
        out
    }

    /// Uniformly pick one element of a non-empty slice.
    pub fn choice<'a, T>(&mut self, seq: &'a [T]) -> Result<&'a T, AgentError> {
        const EMPTY: AgentError = AgentError::InvalidInput("cannot choose from an empty sequence");
        if seq.is_empty() {
            return Err(EMPTY);
        }
        self.draw(|rng| seq.choose(rng)).ok_or(EMPTY)
    }

    /// Uniformly permute `seq` in place.
    pub fn shuffle<T>(&mut self, seq: &mut [T]) {
        self.draw(|rng| seq.shuffle(rng));
    }

    /// Copy of the current state, for checkpointing or replay.
    pub fn snapshot(&self) -> RandomStream { self.clone() }

    /// Replace the current state with a previously taken snapshot.
    pub fn restore(&mut self, snapshot: RandomStream) { *self = snapshot; }
}
