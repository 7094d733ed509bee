//! Lexical scoring over static word lists.
//!
//! All matching is case-insensitive substring containment: `"issue"` matches
//! the escalation keyword `"sue"`. Each word counts at most once per text.

use std::sync::LazyLock;

use regex::Regex;

use supportdesk_shared::{KeywordConfig, TicketMetadata};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").expect("phone regex"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9]|[$-_@.&+]|[!*(),]|%[0-9a-fA-F]{2})+").expect("url regex")
});

/// Sentiment and escalation word lists, normalized to lowercase.
#[derive(Debug, Clone)]
pub struct Lexicon {
    escalation: Vec<String>,
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Lexicon {
    pub fn new(keywords: &KeywordConfig) -> Self {
        Self {
            escalation: lowercase_all(&keywords.escalation),
            positive: lowercase_all(&keywords.positive),
            negative: lowercase_all(&keywords.negative),
        }
    }

    /// Score in `[-1.0, 1.0]`: `(positive - negative) / (positive + negative)`.
    ///
    /// Returns exactly `0.0` when no sentiment word is present.
    pub fn sentiment_score(&self, text: &str) -> f64 {
        let text = text.to_lowercase();
        let positive = count_present(&self.positive, &text);
        let negative = count_present(&self.negative, &text);

        let total = positive + negative;
        if total == 0 {
            return 0.0;
        }

        (positive as f64 - negative as f64) / total as f64
    }

    /// Escalation keywords present in `text`, in keyword-list order, each at most once.
    pub fn find_escalation_keywords(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let mut found: Vec<String> = Vec::new();
        for keyword in &self.escalation {
            if text.contains(keyword.as_str()) && !found.contains(keyword) {
                found.push(keyword.clone());
            }
        }
        found
    }

    /// Compute the metadata attached to a ticket at creation.
    pub fn extract_metadata(&self, text: &str) -> TicketMetadata {
        TicketMetadata {
            word_count: text.split_whitespace().count(),
            has_email: EMAIL_RE.is_match(text),
            has_phone: PHONE_RE.is_match(text),
            has_url: URL_RE.is_match(text),
            escalation_keywords_found: self.find_escalation_keywords(text),
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(&KeywordConfig::default())
    }
}

/// Lowercase every entry of a word list.
pub(crate) fn lowercase_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

/// Number of words from `words` that occur in `text` (already lowercased).
fn count_present(words: &[String], text: &str) -> usize {
    words.iter().filter(|w| text.contains(w.as_str())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_scores_zero() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.sentiment_score(""), 0.0);
        assert_eq!(lexicon.sentiment_score("My order number is 1234."), 0.0);
    }

    #[test]
    fn sentiment_is_ratio_of_word_counts() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.sentiment_score("I LOVE it"), 1.0);
        assert_eq!(lexicon.sentiment_score("awful, just awful"), -1.0);
        // thank + great vs. bad → (2 - 1) / 3
        let score = lexicon.sentiment_score("Thanks, great app, bad docs");
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_word_counts_once() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.sentiment_score("love love love, but hate"), 0.0);
    }

    #[test]
    fn sentiment_stays_in_range() {
        let lexicon = Lexicon::default();
        let samples = [
            "terrible terrible angry frustrated",
            "thank you, excellent and great, I appreciate it, very happy and satisfied",
            "bad but great",
            "poor awful hate love",
            "",
        ];
        for text in samples {
            let score = lexicon.sentiment_score(text);
            assert!((-1.0..=1.0).contains(&score), "{text}: {score}");
        }
    }

    #[test]
    fn escalation_keywords_follow_list_order_without_duplicates() {
        let lexicon = Lexicon::default();
        let found = lexicon
            .find_escalation_keywords("Immediately! This is URGENT, urgent, an emergency, urgent");
        assert_eq!(found, vec!["urgent", "emergency", "immediately"]);
    }

    #[test]
    fn escalation_keywords_use_substring_match() {
        let lexicon = Lexicon::default();
        // "issue" contains "sue"
        assert_eq!(lexicon.find_escalation_keywords("an issue"), vec!["sue"]);
        assert!(lexicon.find_escalation_keywords("").is_empty());
    }

    #[test]
    fn duplicate_config_entries_are_reported_once() {
        let config = KeywordConfig {
            escalation: vec!["Legal".into(), "legal".into()],
            ..KeywordConfig::default()
        };
        let lexicon = Lexicon::new(&config);
        assert_eq!(lexicon.find_escalation_keywords("legal team"), vec!["legal"]);
    }

    #[test]
    fn metadata_detects_contact_details() {
        let lexicon = Lexicon::default();
        let meta = lexicon.extract_metadata(
            "Reach me at jane.doe@example.com or 555-123-4567, see https://example.com/a?b=1",
        );
        assert!(meta.has_email);
        assert!(meta.has_phone);
        assert!(meta.has_url);
        assert_eq!(meta.word_count, 8);
        assert!(meta.escalation_keywords_found.is_empty());

        let meta = lexicon.extract_metadata("plain words only");
        assert!(!meta.has_email && !meta.has_phone && !meta.has_url);
        assert_eq!(meta.word_count, 3);
    }
}
