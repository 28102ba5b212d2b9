use std::str::FromStr;

use chrono::NaiveDate;
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use crate::core::LexineError;

pub type WordId = Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Phrase,
    #[default]
    Other,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Phrase => "phrase",
            PartOfSpeech::Other => "other",
        }
    }
}

impl FromStr for PartOfSpeech {
    type Err = LexineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noun" => Ok(PartOfSpeech::Noun),
            "verb" => Ok(PartOfSpeech::Verb),
            "adjective" | "adj" => Ok(PartOfSpeech::Adjective),
            "adverb" | "adv" => Ok(PartOfSpeech::Adverb),
            "pronoun" => Ok(PartOfSpeech::Pronoun),
            "preposition" => Ok(PartOfSpeech::Preposition),
            "conjunction" => Ok(PartOfSpeech::Conjunction),
            "interjection" => Ok(PartOfSpeech::Interjection),
            "phrase" => Ok(PartOfSpeech::Phrase),
            "other" => Ok(PartOfSpeech::Other),
            other => Err(LexineError::Custom(format!("unknown part of speech: {other}"))),
        }
    }
}

/// One entry in the learner's collection. `interval` is the current spacing
/// in days; `next_review` is the date the item becomes due again (today
/// counts as due). Only the scheduler rewrites the schedule fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: WordId,
    pub term: String,
    pub translation: String,
    #[serde(default)]
    pub part_of_speech: PartOfSpeech,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub interval: u32,
    pub next_review: NaiveDate,
}

impl VocabularyItem {
    /// New items start immediately due.
    pub fn new(term: &str, translation: &str, part_of_speech: PartOfSpeech, today: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            term: term.to_string(),
            translation: translation.to_string(),
            part_of_speech,
            context: None,
            interval: 0,
            next_review: today,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }
}

/// Example content for the card being displayed. Transient; discarded when
/// the session advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub original: String,
    pub translation: String,
    pub context: String,
}

/// The learner's language pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub known: String,
    pub learning: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self { known: "English".to_string(), learning: "Polish".to_string() }
    }
}
