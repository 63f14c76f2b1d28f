use rand::Rng;
use rand::seq::SliceRandom;

use crate::bank::record::{OPTION_SLOTS, QuestionId, QuestionRecord};

/// A question with its options shuffled for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedQuestion {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    /// Slot holding the answer text; `None` when the record's answer matches no option.
    pub correct_index: Option<usize>,
}

impl PreparedQuestion {
    pub fn prepare<R: Rng + ?Sized>(record: &QuestionRecord, rng: &mut R) -> Self {
        let mut options = record.options.clone();
        options.shuffle(rng);
        if options.len() > OPTION_SLOTS {
            // Only the first slots are shown; keep the answer among them.
            if let Some(pos) = options.iter().position(|o| *o == record.answer) {
                if pos >= OPTION_SLOTS {
                    options.swap(pos, rng.gen_range(0..OPTION_SLOTS));
                }
            }
            options.truncate(OPTION_SLOTS);
        }
        let correct_index = options.iter().position(|o| *o == record.answer);
        Self {
            id: record.id.clone(),
            question: record.question.clone(),
            options,
            correct_index,
        }
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        self.correct_index == Some(selected)
    }
}

/// Shuffle a copy of `pool`, keep the first `n` and prepare each one.
/// A pool smaller than `n` yields a shorter quiz.
pub fn select_and_prepare<R: Rng + ?Sized>(
    pool: &[QuestionRecord],
    n: usize,
    rng: &mut R,
) -> Vec<PreparedQuestion> {
    let mut chosen: Vec<&QuestionRecord> = pool.iter().collect();
    chosen.shuffle(rng);
    chosen
        .into_iter()
        .take(n.min(pool.len()))
        .map(|record| PreparedQuestion::prepare(record, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn pool(size: u64) -> Vec<QuestionRecord> {
        (0..size)
            .map(|i| QuestionRecord {
                id: QuestionId::from(i),
                question: format!("Question {i}"),
                options: vec![
                    format!("right {i}"),
                    format!("wrong a{i}"),
                    format!("wrong b{i}"),
                    format!("wrong c{i}"),
                ],
                answer: format!("right {i}"),
            })
            .collect()
    }

    #[test]
    fn test_takes_min_of_n_and_pool() {
        let mut rng = SmallRng::seed_from_u64(1);
        for (size, n, expected) in [(20, 15, 15), (10, 15, 10), (15, 15, 15), (5, 0, 0)] {
            let prepared = select_and_prepare(&pool(size), n, &mut rng);
            assert_eq!(prepared.len(), expected, "pool {size}, n {n}");
        }
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let mut rng = SmallRng::seed_from_u64(2);
        assert!(select_and_prepare(&[], 15, &mut rng).is_empty());
    }

    #[test]
    fn test_correct_index_points_at_answer() {
        let source = pool(30);
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            for q in select_and_prepare(&source, 15, &mut rng) {
                let record = source.iter().find(|r| r.id == q.id).unwrap();
                let idx = q.correct_index.expect("answer present");
                assert_eq!(q.options[idx], record.answer);
                assert_eq!(q.options.len(), record.options.len());
            }
        }
    }

    #[test]
    fn test_selected_questions_are_distinct() {
        let mut rng = SmallRng::seed_from_u64(3);
        let prepared = select_and_prepare(&pool(20), 15, &mut rng);
        let ids: HashSet<String> = prepared.iter().map(|q| q.id.to_string()).collect();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_pool_is_not_mutated() {
        let source = pool(10);
        let before = source.clone();
        let mut rng = SmallRng::seed_from_u64(4);
        select_and_prepare(&source, 5, &mut rng);
        assert_eq!(source, before);
    }

    #[test]
    fn test_missing_answer_has_no_correct_index() {
        let record = QuestionRecord {
            id: QuestionId::from(1u64),
            question: "?".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            answer: "c".to_string(),
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let q = PreparedQuestion::prepare(&record, &mut rng);
        assert_eq!(q.correct_index, None);
        assert!(!q.is_correct(0));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn test_option_order_varies_across_draws() {
        let source = pool(1);
        let mut rng = SmallRng::seed_from_u64(6);
        let positions: HashSet<Option<usize>> = (0..50)
            .map(|_| PreparedQuestion::prepare(&source[0], &mut rng).correct_index)
            .collect();
        assert!(positions.len() > 1);
    }

    #[test]
    fn test_extra_options_are_cut_to_shown_slots() {
        let record = QuestionRecord {
            id: QuestionId::from(9u64),
            question: "Pick the vowel".to_string(),
            options: ["b", "c", "d", "f", "g", "a"].iter().map(|s| s.to_string()).collect(),
            answer: "a".to_string(),
        };
        let mut positions = HashSet::new();
        for seed in 0..40 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let q = PreparedQuestion::prepare(&record, &mut rng);
            assert_eq!(q.options.len(), OPTION_SLOTS);
            let idx = q.correct_index.expect("answer kept");
            assert_eq!(q.options[idx], "a");
            positions.insert(idx);
        }
        assert!(positions.len() > 1);
    }
}
