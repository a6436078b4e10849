//! Quiz sampling from the question bank.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::QuestionBank;
use crate::error::Error;
use crate::model::Question;

/// Draw up to `k` distinct questions uniformly without replacement.
///
/// Returns the whole bank (shuffled) when it holds fewer than `k` questions.
/// Errors only when the bank is empty.
pub fn sample(bank: &QuestionBank, k: usize) -> Result<Vec<Question>, Error> {
    sample_with_rng(bank, k, &mut rand::thread_rng())
}

/// Same as [`sample`] but with a caller-supplied RNG, for deterministic tests.
pub fn sample_with_rng<R: Rng + ?Sized>(
    bank: &QuestionBank,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Question>, Error> {
    if bank.is_empty() {
        return Err(Error::InsufficientBank);
    }
    Ok(bank
        .questions()
        .choose_multiple(rng, k.min(bank.len()))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank_of(n: u32) -> QuestionBank {
        let questions = (1..=n)
            .map(|id| Question {
                id,
                category: String::new(),
                content: format!("question {id}"),
            })
            .collect();
        QuestionBank::new("test", "Test", questions)
    }

    #[test]
    fn returns_k_distinct_questions() {
        let bank = bank_of(20);
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = sample_with_rng(&bank, 5, &mut rng).unwrap();
        assert_eq!(sampled.len(), 5);
        let mut ids: Vec<u32> = sampled.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5, "sampled ids must be distinct");
    }

    #[test]
    fn small_bank_returns_everything() {
        let bank = bank_of(4);
        let mut rng = StdRng::seed_from_u64(1);
        let sampled = sample_with_rng(&bank, 5, &mut rng).unwrap();
        assert_eq!(sampled.len(), 4);
        let mut ids: Vec<u32> = sampled.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_bank_is_an_error() {
        let bank = bank_of(0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_with_rng(&bank, 5, &mut rng),
            Err(Error::InsufficientBank)
        ));
    }

    #[test]
    fn all_bank_sizes_yield_min_n_k() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..=12u32 {
            let bank = bank_of(n);
            let sampled = sample_with_rng(&bank, 5, &mut rng).unwrap();
            assert_eq!(sampled.len(), (n as usize).min(5));
        }
    }
}
