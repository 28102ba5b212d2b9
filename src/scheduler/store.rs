use chrono::NaiveDate;
use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::{
        LexineError,
        VocabularyItem,
        WordId,
    },
    persistence::{
        load_json_or_default,
        save_json,
    },
};

pub const WORDS_FILE: &str = "words.json";

/// The backing collection of vocabulary items. Deleting an item here is
/// permanent for the process lifetime; queues already built from the store
/// are not retroactively shrunk.
#[derive(Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordStore {
    words: Vec<VocabularyItem>,
}

impl WordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(words: Vec<VocabularyItem>) -> Self {
        Self { words }
    }

    pub fn load() -> Self {
        load_json_or_default(WORDS_FILE)
    }

    pub fn save(&self) -> Result<(), LexineError> {
        save_json(self, WORDS_FILE)
    }

    pub fn add(&mut self, item: VocabularyItem) -> WordId {
        let id = item.id;
        self.words.push(item);
        id
    }

    pub fn get(&self, id: WordId) -> Option<&VocabularyItem> {
        self.words.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: WordId) -> Option<&mut VocabularyItem> {
        self.words.iter_mut().find(|item| item.id == id)
    }

    pub fn delete(&mut self, id: WordId) -> bool {
        let before = self.words.len();
        self.words.retain(|item| item.id != id);

        let removed = self.words.len() != before;
        if removed {
            debug!("deleted word {}", id);
        }
        removed
    }

    pub fn find_by_term(&self, term: &str) -> Option<&VocabularyItem> {
        self.words.iter().find(|item| item.term.eq_ignore_ascii_case(term))
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.words
    }

    pub fn due_count(&self, today: NaiveDate) -> usize {
        self.words.iter().filter(|item| item.is_due(today)).count()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
