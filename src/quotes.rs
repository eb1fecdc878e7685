use crate::client::Quote;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Client-local rotation over a pool of quotations: random pick among the
/// ones not shown yet, `None` once the pool is exhausted. Nothing here is
/// persisted; a reload starts the rotation over.
#[derive(Debug, Default)]
pub struct QuoteRotation {
    shown: HashSet<String>,
}

impl QuoteRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a sentence as already shown (used for the quotation that arrived
    /// with the mood reading itself).
    pub fn mark_shown(&mut self, sentence: &str) {
        self.shown.insert(sentence.to_owned());
    }

    /// Pick a random not-yet-shown quote from `pool` and mark it shown.
    pub fn next<'a>(&mut self, pool: &'a [Quote]) -> Option<&'a Quote> {
        let unseen: Vec<&Quote> = pool
            .iter()
            .filter(|q| !self.shown.contains(&q.sentence))
            .collect();
        let picked = unseen.choose(&mut rand::thread_rng()).copied()?;
        self.shown.insert(picked.sentence.clone());
        Some(picked)
    }

    pub fn exhausted(&self, pool: &[Quote]) -> bool {
        pool.iter().all(|q| self.shown.contains(&q.sentence))
    }

    pub fn reset(&mut self) {
        self.shown.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<Quote> {
        ["하나", "둘", "셋"]
            .iter()
            .map(|s| Quote {
                sentence: (*s).to_owned(),
                title: String::new(),
                author: String::new(),
            })
            .collect()
    }

    #[test]
    fn every_quote_is_shown_exactly_once() {
        let pool = pool();
        let mut rotation = QuoteRotation::new();
        let mut seen = HashSet::new();

        for _ in 0..3 {
            let quote = rotation.next(&pool).expect("pool not exhausted yet");
            assert!(seen.insert(quote.sentence.clone()), "repeated quote");
        }
        assert!(rotation.exhausted(&pool));
        assert!(rotation.next(&pool).is_none());
    }

    #[test]
    fn mark_shown_excludes_the_initial_quotation() {
        let pool = pool();
        let mut rotation = QuoteRotation::new();
        rotation.mark_shown("하나");

        for _ in 0..2 {
            let quote = rotation.next(&pool).unwrap();
            assert_ne!(quote.sentence, "하나");
        }
        assert!(rotation.next(&pool).is_none());
    }

    #[test]
    fn reset_starts_the_rotation_over() {
        let pool = pool();
        let mut rotation = QuoteRotation::new();
        while rotation.next(&pool).is_some() {}
        assert!(rotation.exhausted(&pool));

        rotation.reset();
        assert!(!rotation.exhausted(&pool));
        assert!(rotation.next(&pool).is_some());
    }

    #[test]
    fn empty_pool_is_immediately_exhausted() {
        let mut rotation = QuoteRotation::new();
        assert!(rotation.next(&[]).is_none());
        assert!(rotation.exhausted(&[]));
    }
}
