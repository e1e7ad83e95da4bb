//! Seeded randomness.
//!
//! A session owns two ChaCha8 streams derived from one seed: [`Stream::Deal`]
//! for shuffles, backfill and enemy spawns, and [`Stream::Combat`] for hit
//! rolls. Keeping them apart means a missed attack never changes the next
//! deal, and a replayed command log reproduces both.
//!
//! ```
//! use golf_rpg::core::{GameRng, Stream};
//!
//! let mut deal = GameRng::stream(42, Stream::Deal);
//! let mut again = GameRng::stream(42, Stream::Deal);
//! let mut combat = GameRng::stream(42, Stream::Combat);
//!
//! let a: Vec<u32> = (0..8).map(|_| deal.below(1000)).collect();
//! let b: Vec<u32> = (0..8).map(|_| again.below(1000)).collect();
//! let c: Vec<u32> = (0..8).map(|_| combat.below(1000)).collect();
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! ```

use std::hash::Hasher;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Which of a session's streams to derive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    Deal,
    Combat,
}

impl Stream {
    const fn salt(self) -> u64 {
        match self {
            Stream::Deal => 0x6465_616c,
            Stream::Combat => 0x636f_6d62_6174,
        }
    }
}

/// A reproducible random stream.
///
/// Serializes as its seed and ChaCha word position, so snapshots stay small
/// no matter how many values were drawn.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// A stream seeded directly with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// One of a session's named streams.
    ///
    /// `FxHasher` is used for the derivation because its output does not
    /// change between toolchains.
    #[must_use]
    pub fn stream(session_seed: u64, stream: Stream) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write_u64(session_seed);
        hasher.write_u64(stream.salt());
        Self::new(hasher.finish())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[0, bound)`. Returns 0 for a zero bound.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.inner.gen_range(0..bound)
    }

    /// Percentile roll in `[0, 100)`.
    pub fn roll_percent(&mut self) -> u32 {
        self.below(100)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    /// Index picked in proportion to `weights`.
    ///
    /// Negative and NaN weights count as zero. `None` when nothing has
    /// positive weight.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let usable = |w: f32| if w > 0.0 { w } else { 0.0 };
        let total: f32 = weights.iter().copied().map(usable).sum();
        if total <= 0.0 {
            return None;
        }

        let mut remaining = self.inner.gen::<f32>() * total;
        let mut last = None;
        for (index, &weight) in weights.iter().enumerate() {
            let weight = usable(weight);
            if weight == 0.0 {
                continue;
            }
            last = Some(index);
            remaining -= weight;
            if remaining <= 0.0 {
                return last;
            }
        }
        // Rounding can leave a sliver; it belongs to the last weighted entry.
        last
    }

    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut rng = Self::new(state.seed);
        rng.inner.set_word_pos(state.word_pos);
        rng
    }
}

impl PartialEq for GameRng {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state()
    }
}

/// Wire form of a [`GameRng`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws(rng: &mut GameRng, n: usize) -> Vec<u32> {
        (0..n).map(|_| rng.below(1000)).collect()
    }

    #[test]
    fn test_stream_derivation_is_stable() {
        let a = GameRng::stream(5, Stream::Deal);
        let b = GameRng::stream(5, Stream::Deal);
        assert_eq!(a.seed(), b.seed());
        assert_ne!(a.seed(), GameRng::stream(5, Stream::Combat).seed());
        assert_ne!(a.seed(), GameRng::stream(6, Stream::Deal).seed());
    }

    #[test]
    fn test_below_bounds() {
        let mut rng = GameRng::new(7);
        assert_eq!(rng.below(0), 0);
        assert!((0..500).all(|_| rng.roll_percent() < 100));
        assert!((0..500).all(|_| rng.below(13) < 13));
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = GameRng::new(42);
        let ranks: Vec<u8> = (1..=13).collect();
        let mut dealt = ranks.clone();

        rng.shuffle(&mut dealt);
        assert_ne!(dealt, ranks);
        dealt.sort_unstable();
        assert_eq!(dealt, ranks);
    }

    #[test]
    fn test_choose_weighted_skips_dead_weights() {
        let mut rng = GameRng::new(42);
        for _ in 0..20 {
            assert_eq!(rng.choose_weighted(&[0.0, 3.0, -1.0, f32::NAN]), Some(1));
        }
        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, -2.0]), None);
    }

    #[test]
    fn test_choose_weighted_reaches_every_entry() {
        let mut rng = GameRng::new(11);
        let mut seen = [false; 3];
        for _ in 0..200 {
            if let Some(i) = rng.choose_weighted(&[1.0, 1.0, 1.0]) {
                seen[i] = true;
            }
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_restore_resumes_mid_stream() {
        let mut rng = GameRng::new(42);
        draws(&mut rng, 100);

        let saved = rng.state();
        let expected = draws(&mut rng, 10);
        assert_eq!(draws(&mut GameRng::from_state(&saved), 10), expected);
    }

    #[test]
    fn test_serde_resumes_stream() {
        let mut rng = GameRng::new(9);
        rng.below(10);

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, rng);
        assert_eq!(rng.below(1000), restored.below(1000));
    }
}
