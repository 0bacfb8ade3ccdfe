use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::QuizError;
use crate::model::Question;

/// Every question available to a quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Draws up to `k` distinct questions using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyPool` if the pool has no questions.
    pub fn sample(&self, k: usize) -> Result<Vec<Question>, QuizError> {
        self.sample_with(k, &mut rand::rng())
    }

    /// Draws `min(k, len)` distinct questions, uniformly at random.
    ///
    /// The whole pool is shuffled (Fisher-Yates) and the prefix is kept, so
    /// every ordering is equally likely. The returned order is the
    /// presentation order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyPool` if the pool has no questions.
    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyPool);
        }

        let mut shuffled = self.questions.clone();
        shuffled.as_mut_slice().shuffle(rng);
        shuffled.truncate(k);
        Ok(shuffled)
    }
}

impl From<Vec<Question>> for QuestionPool {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn pool_of(n: u64) -> QuestionPool {
        QuestionPool::new(
            (1..=n)
                .map(|id| Question::text(QuestionId::new(id), format!("Q{id}"), "A"))
                .collect(),
        )
    }

    #[test]
    fn empty_pool_cannot_be_sampled() {
        let err = QuestionPool::default().sample(12).unwrap_err();
        assert_eq!(err, QuizError::EmptyPool);
    }

    #[test]
    fn sample_size_is_bounded_by_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=20 {
            let pool = pool_of(n);
            let sampled = pool.sample_with(12, &mut rng).unwrap();
            assert_eq!(sampled.len(), (n as usize).min(12));

            let ids: HashSet<_> = sampled.iter().map(Question::id).collect();
            assert_eq!(ids.len(), sampled.len(), "no duplicates");
            assert!(sampled.iter().all(|q| pool.questions().contains(q)));
        }
    }

    #[test]
    fn sample_does_not_reorder_the_pool() {
        let pool = pool_of(5);
        let before = pool.clone();
        let _ = pool.sample(3).unwrap();
        assert_eq!(pool, before);
    }

    #[test]
    fn every_question_can_lead_the_sample() {
        let pool = pool_of(4);
        let mut rng = StdRng::seed_from_u64(11);
        let mut leaders = HashSet::new();
        for _ in 0..400 {
            let sampled = pool.sample_with(1, &mut rng).unwrap();
            leaders.insert(sampled[0].id());
        }
        assert_eq!(leaders.len(), 4);
    }
}
