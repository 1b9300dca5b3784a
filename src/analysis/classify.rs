//! Keyword-driven content classification, titling and quote extraction.
//!
//! The category rules live in one ordered table; the first rule whose
//! keyword set matches wins, and anything unmatched is an insight.

use crate::transcript::TranscriptEntry;

use super::{Category, Segment, SegmentSource};

pub struct CategoryRule {
    pub category: Category,
    pub intensity: u8,
    pub keywords: &'static [&'static str],
}

/// Ordered classification table. Order matters: emotional language wins
/// over conflict language, which wins over revelations, which win over
/// generic key-moment markers.
pub static CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Emotional,
        intensity: 8,
        keywords: &[
            "feel", "emotion", "heart", "love", "fear", "angry", "sad", "happy", "pain",
            "hurt", "cry", "tears",
        ],
    },
    CategoryRule {
        category: Category::Conflict,
        intensity: 7,
        keywords: &[
            "problem", "issue", "challenge", "difficult", "struggle", "fight", "argue",
            "disagree", "conflict",
        ],
    },
    CategoryRule {
        category: Category::Revelation,
        intensity: 9,
        keywords: &[
            "realize", "understand", "discover", "found out", "learned", "truth", "secret",
            "hidden",
        ],
    },
    CategoryRule {
        category: Category::KeyMoment,
        intensity: 8,
        keywords: &[
            "important", "significant", "crucial", "turning point", "moment", "decision",
            "change",
        ],
    },
];

/// Category and intensity used when no rule matches.
pub const DEFAULT_CATEGORY: Category = Category::Insight;
pub const DEFAULT_INTENSITY: u8 = 6;

const TITLE_WORD_LIMIT: usize = 6;
const TITLE_MIN_WORDS: usize = 3;
const TITLE_MIN_SENTENCE_CHARS: usize = 10;
const QUOTE_MIN_SENTENCE_CHARS: usize = 15;
const MAX_KEY_QUOTES: usize = 3;

/// Classify lowercased text against the rule table.
pub fn classify(lower_text: &str) -> (Category, u8) {
    for rule in CATEGORY_RULES {
        if rule.keywords.iter().any(|kw| lower_text.contains(kw)) {
            return (rule.category, rule.intensity);
        }
    }
    (DEFAULT_CATEGORY, DEFAULT_INTENSITY)
}

/// Build a classified segment from a group of consecutive entries.
pub fn build_segment(entries: &[&TranscriptEntry]) -> Option<Segment> {
    let first = entries.first()?;
    let last = entries.last()?;

    let content = entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let speakers = distinct_speakers(entries.iter().map(|e| e.speaker.as_str()));

    let (category, intensity) = classify(&content.to_lowercase());

    Some(Segment {
        title: generate_title(&content, category),
        description: generate_description(&content, category),
        start_ms: first.start_ms,
        end_ms: last.end_ms,
        category,
        intensity,
        key_quotes: extract_key_quotes(&content),
        speakers,
        content,
        entry_count: entries.len(),
        source: SegmentSource::Heuristic,
    })
}

/// Distinct speaker labels in first-appearance order.
pub fn distinct_speakers<'a>(speakers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for speaker in speakers {
        if !out.iter().any(|s| s == speaker) {
            out.push(speaker.to_string());
        }
    }
    out
}

/// Split text into sentences on terminal punctuation.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Title = first 6 words of the first substantial sentence, stripped of
/// punctuation; falls back to a category-keyed stock title.
pub fn generate_title(text: &str, category: Category) -> String {
    let first_sentence = sentences(text)
        .find(|s| s.chars().count() > TITLE_MIN_SENTENCE_CHARS);

    if let Some(sentence) = first_sentence {
        let words: Vec<&str> = sentence.split_whitespace().take(TITLE_WORD_LIMIT).collect();
        if words.len() >= TITLE_MIN_WORDS {
            let title: String = words
                .join(" ")
                .chars()
                .filter(|c| c.is_alphanumeric() || c.is_whitespace())
                .collect();
            return title.trim().to_string();
        }
    }

    fallback_title(category).to_string()
}

pub fn fallback_title(category: Category) -> &'static str {
    match category {
        Category::Emotional => "Personal Reflection",
        Category::Conflict => "Facing Challenges",
        Category::Revelation => "Key Discovery",
        Category::KeyMoment => "Pivotal Moment",
        Category::Insight => "Important Discussion",
        Category::Context => "Documentary Segment",
    }
}

/// Category-keyed description template interpolating word and sentence
/// counts.
pub fn generate_description(text: &str, category: Category) -> String {
    let word_count = text.split_whitespace().count();
    let sentence_count = sentences(text)
        .filter(|s| s.chars().count() > TITLE_MIN_SENTENCE_CHARS)
        .count();

    match category {
        Category::Emotional => format!(
            "A deeply personal moment revealing authentic emotions and human experience. Contains {word_count} words across {sentence_count} key statements."
        ),
        Category::Conflict => format!(
            "A challenging situation that highlights important tensions and difficulties. Features {word_count} words of crucial dialogue."
        ),
        Category::Revelation => format!(
            "A moment of discovery or realization that advances the narrative. Captures {word_count} words of significant insight."
        ),
        Category::KeyMoment => format!(
            "A pivotal point in the story that shapes the overall narrative. Documents {word_count} words of essential content."
        ),
        Category::Insight => format!(
            "An important discussion that provides valuable perspective. Features {word_count} words of meaningful dialogue."
        ),
        Category::Context => format!(
            "A significant segment containing {word_count} words of important content."
        ),
    }
}

/// First and last substantial sentences, capped at three quotes.
pub fn extract_key_quotes(text: &str) -> Vec<String> {
    let candidates: Vec<&str> = sentences(text)
        .filter(|s| s.chars().count() > QUOTE_MIN_SENTENCE_CHARS)
        .collect();

    let mut quotes = Vec::new();
    if let Some(first) = candidates.first() {
        quotes.push(format!("{first}."));
    }
    if candidates.len() > 1 {
        if let Some(last) = candidates.last() {
            quotes.push(format!("{last}."));
        }
    }

    quotes.truncate(MAX_KEY_QUOTES);
    quotes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_gives_emotional_precedence() {
        // "fear" (emotional) and "secret" (revelation) both occur; the
        // emotional rule is checked first.
        let (category, intensity) = classify("the fear of that secret stayed with me");
        assert_eq!(category, Category::Emotional);
        assert_eq!(intensity, 8);
    }

    #[test]
    fn secret_without_earlier_matches_is_a_revelation() {
        let (category, intensity) = classify("nobody knew about the secret account");
        assert_eq!(category, Category::Revelation);
        assert_eq!(intensity, 9);
    }

    #[test]
    fn unmatched_text_defaults_to_insight() {
        let (category, intensity) = classify("we walked along the river and talked");
        assert_eq!(category, Category::Insight);
        assert_eq!(intensity, 6);
    }

    #[test]
    fn title_uses_first_six_words_without_punctuation() {
        let title = generate_title(
            "Well, the archive wasn't what we expected to find there. More text follows.",
            Category::Insight,
        );
        assert_eq!(title, "Well the archive wasnt what we");
    }

    #[test]
    fn title_falls_back_per_category_when_no_sentence_qualifies() {
        assert_eq!(generate_title("too short", Category::Emotional), "Personal Reflection");
        assert_eq!(generate_title("too short", Category::Revelation), "Key Discovery");
        assert_eq!(generate_title("", Category::Context), "Documentary Segment");
    }

    #[test]
    fn description_interpolates_counts() {
        let description = generate_description(
            "This sentence has a few words. And this one has some more words.",
            Category::Insight,
        );
        assert!(description.contains("13 words"));
    }

    #[test]
    fn key_quotes_take_first_and_last_sentences() {
        let quotes = extract_key_quotes(
            "The first sentence is long enough. A middle one sits here quietly. The final sentence closes the thought.",
        );
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0], "The first sentence is long enough.");
        assert_eq!(quotes[1], "The final sentence closes the thought.");
    }

    #[test]
    fn key_quotes_skip_short_fragments() {
        let quotes = extract_key_quotes("Too short. Tiny. Also small.");
        assert!(quotes.is_empty());
    }

    #[test]
    fn build_segment_joins_text_and_collects_speakers() {
        let entries = vec![
            TranscriptEntry {
                start_ms: 0,
                end_ms: 2_000,
                text: "We had a problem with the generator.".to_string(),
                speaker: "Anna".to_string(),
                index: 0,
            },
            TranscriptEntry {
                start_ms: 2_000,
                end_ms: 4_000,
                text: "It failed on the coldest night.".to_string(),
                speaker: "Ben".to_string(),
                index: 1,
            },
            TranscriptEntry {
                start_ms: 4_000,
                end_ms: 6_000,
                text: "Nobody slept until it was fixed.".to_string(),
                speaker: "Anna".to_string(),
                index: 2,
            },
        ];
        let refs: Vec<&TranscriptEntry> = entries.iter().collect();
        let segment = build_segment(&refs).unwrap();

        assert_eq!(segment.start_ms, 0);
        assert_eq!(segment.end_ms, 6_000);
        assert_eq!(segment.category, Category::Conflict);
        assert_eq!(segment.intensity, 7);
        assert_eq!(segment.speakers, vec!["Anna".to_string(), "Ben".to_string()]);
        assert_eq!(segment.entry_count, 3);
        assert!(segment.content.contains("generator"));
    }
}
