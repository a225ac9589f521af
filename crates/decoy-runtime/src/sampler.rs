//! Rejection sampler for filtered negatives.
//!
//! Each round draws `2 * count` uniform entity ids, drops the ones that
//! are known-true for the conditioning key, and keeps the rest. Rounds
//! accumulate until `count` survivors exist; the result is truncated to
//! exactly `count`. Survivors may repeat.
//!
//! The round budget turns a pathological graph (a true set covering most
//! of the vocabulary) into [`DecoyError::SamplingExhausted`] instead of an
//! endless loop.

use decoy_core::error::{DecoyError, Result};
use decoy_core::index::{contains_sorted, TrueTripleIndex};
use decoy_core::types::{CorruptionMode, EntityId, Triple};
use rand::Rng;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Default round budget per sample call.
pub const DEFAULT_MAX_ROUNDS: usize = 1000;

/// Uniform negative sampler over `[0, nentity)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeSampler {
    nentity: usize,
    max_rounds: usize,
}

impl NegativeSampler {
    pub fn new(nentity: usize) -> Self {
        Self {
            nentity,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn nentity(&self) -> usize {
        self.nentity
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Round at which a slow call is reported, a quarter of the budget.
    pub fn warn_round(&self) -> usize {
        (self.max_rounds / 4).max(1)
    }

    /// Draw `count` ids that are not in `true_entities`.
    ///
    /// `true_entities` is treated as a set; order and duplicates don't matter.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        true_entities: &[EntityId],
        count: usize,
    ) -> Result<Vec<EntityId>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if self.nentity == 0 {
            return Err(DecoyError::SamplingExhausted {
                rounds: 0,
                collected: 0,
                requested: count,
            });
        }

        let true_entities = as_sorted_set(true_entities);
        let draws = count * 2;
        let mut negatives: Vec<EntityId> = Vec::with_capacity(draws);

        for round in 1..=self.max_rounds {
            negatives.extend(
                (0..draws)
                    .map(|_| rng.gen_range(0..self.nentity) as EntityId)
                    .filter(|e| !contains_sorted(&true_entities, *e)),
            );

            if negatives.len() >= count {
                negatives.truncate(count);
                if round > 1 {
                    debug!(round, count, "negative sampling needed extra rounds");
                }
                return Ok(negatives);
            }

            if round == self.warn_round() {
                warn!(
                    round,
                    collected = negatives.len(),
                    requested = count,
                    true_entities = true_entities.len(),
                    nentity = self.nentity,
                    "negative sampling is rejecting most draws"
                );
            }
        }

        Err(DecoyError::SamplingExhausted {
            rounds: self.max_rounds,
            collected: negatives.len(),
            requested: count,
        })
    }

    /// Negatives for `triple` with `mode`'s side corrupted, filtered by the
    /// true set of the uncorrupted side's key.
    pub fn sample_for<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        index: &TrueTripleIndex,
        mode: CorruptionMode,
        triple: &Triple,
        count: usize,
    ) -> Result<Vec<EntityId>> {
        self.sample(rng, index.true_entities(mode, triple), count)
    }

    /// Like [`sample_for`](Self::sample_for) with the mode given as a string
    /// (`head-batch` / `tail-batch`).
    pub fn sample_for_mode_str<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        index: &TrueTripleIndex,
        mode: &str,
        triple: &Triple,
        count: usize,
    ) -> Result<Vec<EntityId>> {
        let mode: CorruptionMode = mode.parse()?;
        self.sample_for(rng, index, mode, triple, count)
    }
}

/// Borrow `ids` if already strictly increasing, else a sorted deduplicated copy.
fn as_sorted_set(ids: &[EntityId]) -> Cow<'_, [EntityId]> {
    if ids.windows(2).all(|w| w[0] < w[1]) {
        Cow::Borrowed(ids)
    } else {
        let mut owned = ids.to_vec();
        owned.sort_unstable();
        owned.dedup();
        Cow::Owned(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn returns_exact_count_without_true_entities() {
        let sampler = NegativeSampler::new(50);
        let mut rng = StdRng::seed_from_u64(1);
        let truth = [3, 7, 11, 20];

        for count in [1, 5, 32, 257] {
            let negatives = sampler.sample(&mut rng, &truth, count).unwrap();
            assert_eq!(negatives.len(), count);
            assert!(negatives.iter().all(|e| !truth.contains(e)));
            assert!(negatives.iter().all(|&e| e < 50));
        }
    }

    #[test]
    fn unsorted_true_set_is_still_excluded() {
        let sampler = NegativeSampler::new(6);
        let mut rng = StdRng::seed_from_u64(1);
        let truth = [5, 1, 3, 1];

        let negatives = sampler.sample(&mut rng, &truth, 200).unwrap();
        assert_eq!(negatives.len(), 200);
        let leaked = negatives.iter().find(|e| truth.contains(e));
        assert!(leaked.is_none(), "true entity leaked: {:?}", leaked);
    }

    #[test]
    fn sorted_input_is_borrowed() {
        assert!(matches!(as_sorted_set(&[1, 4, 9]), Cow::Borrowed(_)));
        assert_eq!(as_sorted_set(&[9, 1, 4, 1]).as_ref(), &[1, 4, 9]);
    }

    #[test]
    fn warn_round_is_never_zero() {
        assert_eq!(NegativeSampler::new(10).warn_round(), 250);
        assert_eq!(NegativeSampler::new(10).with_max_rounds(8).warn_round(), 2);
        assert_eq!(NegativeSampler::new(10).with_max_rounds(3).warn_round(), 1);
        assert_eq!(NegativeSampler::new(10).with_max_rounds(1).warn_round(), 1);
    }

    #[test]
    fn zero_count_is_empty() {
        let sampler = NegativeSampler::new(5);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sampler.sample(&mut rng, &[], 0).unwrap().is_empty());
    }

    #[test]
    fn saturated_true_set_exhausts() {
        let sampler = NegativeSampler::new(4).with_max_rounds(8);
        let mut rng = StdRng::seed_from_u64(9);
        let err = sampler.sample(&mut rng, &[0, 1, 2, 3], 3).unwrap_err();
        assert_eq!(
            err,
            DecoyError::SamplingExhausted {
                rounds: 8,
                collected: 0,
                requested: 3
            }
        );
    }

    #[test]
    fn tiny_vocabulary_still_terminates() {
        // Only entity 2 is a valid negative
        let sampler = NegativeSampler::new(3);
        let mut rng = StdRng::seed_from_u64(4);
        let negatives = sampler.sample(&mut rng, &[0, 1], 10).unwrap();
        assert_eq!(negatives, vec![2; 10]);
    }

    #[test]
    fn string_mode_is_validated() {
        let triples = vec![Triple::new(0, 0, 1)];
        let index = TrueTripleIndex::build(&triples);
        let sampler = NegativeSampler::new(10);
        let mut rng = StdRng::seed_from_u64(2);

        let negatives = sampler
            .sample_for_mode_str(&mut rng, &index, "tail-batch", &triples[0], 4)
            .unwrap();
        assert!(negatives.iter().all(|&e| e != 1));

        let err = sampler
            .sample_for_mode_str(&mut rng, &index, "sideways", &triples[0], 4)
            .unwrap_err();
        assert_eq!(err, DecoyError::InvalidMode("sideways".into()));
    }

    #[test]
    fn same_seed_same_negatives() {
        let sampler = NegativeSampler::new(1000);
        let a = sampler.sample(&mut StdRng::seed_from_u64(5), &[1, 2], 16).unwrap();
        let b = sampler.sample(&mut StdRng::seed_from_u64(5), &[1, 2], 16).unwrap();
        assert_eq!(a, b);
    }
}
