//! Candidate words for spawning

use rand::Rng;

use crate::settings::{DEFAULT_WORDS, is_typeable};

/// Fixed list of words; duplicates raise the odds of a combo
#[derive(Debug, Clone, PartialEq)]
pub struct WordPool {
    words: Vec<String>,
}

impl Default for WordPool {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl WordPool {
    /// Words are lowercased and anything still not plain ASCII letters is
    /// dropped. An empty result falls back to the default words.
    pub fn new(words: Vec<String>) -> Self {
        let words = typeable_words(words);
        if words.is_empty() {
            return Self {
                words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            };
        }
        Self { words }
    }

    /// Pick a word uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let i = rng.random_range(0..self.words.len());
        &self.words[i]
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Length of the longest candidate
    pub fn longest(&self) -> usize {
        self.words.iter().map(String::len).max().unwrap_or(0)
    }
}

/// Lowercase every word and keep the ones a player can type
pub(crate) fn typeable_words(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.to_ascii_lowercase())
        .filter(|w| is_typeable(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_empty_pool_uses_defaults() {
        let pool = WordPool::new(Vec::new());
        assert_eq!(pool.len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_untypeable_words_dropped() {
        let pool = WordPool::new(vec!["".into(), "Hack".into(), "c0de".into(), "LOOP".into()]);
        assert_eq!(pool.words(), ["hack".to_string(), "loop".to_string()]);
        assert_eq!(pool.longest(), 4);

        let pool = WordPool::new(vec!["".into(), "two words".into()]);
        assert_eq!(pool.len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_pick_stays_in_pool() {
        let pool = WordPool::new(vec!["hack".into(), "code".into()]);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let w = pool.pick(&mut rng);
            assert!(w == "hack" || w == "code");
        }
    }

    #[test]
    fn test_pick_covers_pool() {
        let pool = WordPool::new(vec!["a".into(), "b".into(), "c".into()]);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..300 {
            match pool.pick(&mut rng) {
                "a" => seen[0] = true,
                "b" => seen[1] = true,
                _ => seen[2] = true,
            }
        }
        assert!(seen.iter().all(|s| *s));
    }
}
