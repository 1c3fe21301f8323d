//! Short-answer synthesis by stemmed keyword overlap.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::Stemmer;

use crate::types::StemLanguage;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

/// Picks the source sentences that share the most stems with a question.
///
/// Deterministic: the same inputs always give the same answer.
pub struct AnswerSynthesizer {
    stemmer: Stemmer,
    language: StemLanguage,
}

impl AnswerSynthesizer {
    pub fn new(language: StemLanguage) -> Self {
        Self {
            stemmer: Stemmer::create(language.algorithm()),
            language,
        }
    }

    pub fn language(&self) -> StemLanguage {
        self.language
    }

    /// Distinct stems of the question's words longer than two characters.
    pub fn keywords(&self, question: &str) -> HashSet<String> {
        let lowered = question.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| word.chars().count() > 2)
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect()
    }

    fn stems(&self, sentence: &str) -> HashSet<String> {
        let lowered = sentence.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| self.stemmer.stem(m.as_str()).into_owned())
            .collect()
    }

    /// Split at `.`, `!` or `?` followed by whitespace.
    ///
    /// Punctuation stays with the preceding sentence; the whitespace is
    /// dropped. Empty text yields a single empty sentence.
    pub fn split_sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in SENTENCE_BOUNDARY.find_iter(text) {
            // punctuation is a single ASCII byte
            sentences.push(&text[start..boundary.start() + 1]);
            start = boundary.end();
        }
        sentences.push(&text[start..]);

        sentences
    }

    /// Up to `max_sentences` best-scoring sentences of `source`, joined by a
    /// space, or its first two sentences when nothing overlaps.
    ///
    /// Ties keep source order.
    pub fn synthesize(&self, question: &str, source: &str, max_sentences: usize) -> String {
        let keywords = self.keywords(question);
        let sentences = Self::split_sentences(source);

        let mut scored: Vec<(usize, &str)> = sentences
            .iter()
            .map(|sentence| {
                let stems = self.stems(sentence);
                (keywords.iter().filter(|k| stems.contains(*k)).count(), *sentence)
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        if scored.is_empty() {
            return sentences.iter().take(2).copied().collect::<Vec<_>>().join(" ");
        }

        // sort_by is stable
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(max_sentences)
            .map(|(_, sentence)| sentence)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for AnswerSynthesizer {
    fn default() -> Self {
        Self::new(StemLanguage::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "Мрак ушёл в лес. Олег остался у костра! Таргитай играл на дудочке? \
                          Потом все трое пошли к реке.";

    #[test]
    fn test_split_sentences() {
        let sentences = AnswerSynthesizer::split_sentences(SOURCE);
        assert_eq!(
            sentences,
            vec![
                "Мрак ушёл в лес.",
                "Олег остался у костра!",
                "Таргитай играл на дудочке?",
                "Потом все трое пошли к реке."
            ]
        );
        assert_eq!(AnswerSynthesizer::split_sentences(""), vec![""]);
    }

    #[test]
    fn test_keywords_skip_short_words_and_dedupe() {
        let synth = AnswerSynthesizer::default();
        let keywords = synth.keywords("Кто и где играл, играл на дудочке?");
        assert!(keywords.contains(&synth.stemmer.stem("дудочке").into_owned()));
        assert!(keywords.contains(&synth.stemmer.stem("играл").into_owned()));
        assert!(!keywords.iter().any(|k| k == "и" || k == "на"));
        assert_eq!(keywords.len(), 4);
    }

    #[test]
    fn test_picks_overlapping_sentence() {
        let synth = AnswerSynthesizer::default();
        let answer = synth.synthesize("На чём играл Таргитай?", SOURCE, 3);
        assert_eq!(answer, "Таргитай играл на дудочке?");
    }

    #[test]
    fn test_higher_score_first_ties_in_order() {
        let synth = AnswerSynthesizer::new(StemLanguage::English);
        let source = "The fox ran. The dog slept. The fox chased the dog. Rain fell.";
        let answer = synth.synthesize("Did the fox chase the dog?", source, 2);
        assert_eq!(answer, "The fox chased the dog. The fox ran.");
    }

    #[test]
    fn test_fallback_to_first_two_sentences() {
        let synth = AnswerSynthesizer::default();
        let answer = synth.synthesize("Сколько стоит билет?", SOURCE, 3);
        assert_eq!(answer, "Мрак ушёл в лес. Олег остался у костра!");

        assert_eq!(synth.synthesize("Сколько?", "", 3), "");
    }

    #[test]
    fn test_deterministic() {
        let synth = AnswerSynthesizer::default();
        let first = synth.synthesize("Куда пошли трое?", SOURCE, 3);
        let second = synth.synthesize("Куда пошли трое?", SOURCE, 3);
        assert_eq!(first, second);
    }
}
